//! Per-target debounce state machine.
//!
//! Each watched target owns one `Debounce`. Every change event arms (or
//! re-arms) a deadline one quiet period in the future; the pipeline runs
//! only when the deadline passes with no further events. Cancel-and-replace:
//! a burst of N rapid events produces exactly one run.

use std::time::{Duration, Instant};

/// Quiet period before a change event fires the pipeline.
pub const QUIET_MS: u64 = 200;

/// Deadline tracker for one watched target.
#[derive(Debug)]
pub struct Debounce {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new() -> Self {
        Self::with_quiet(Duration::from_millis(QUIET_MS))
    }

    pub fn with_quiet(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Record a change event at `now`, replacing any pending deadline.
    pub fn note_event(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// True and disarmed when the quiet period has elapsed at `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time remaining until the pending deadline, if any.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|deadline| {
            deadline
                .checked_duration_since(now)
                .unwrap_or(Duration::ZERO)
        })
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> Duration {
        Duration::from_millis(QUIET_MS)
    }

    #[test]
    fn test_idle_never_fires() {
        let mut d = Debounce::new();
        assert!(!d.fire_if_due(Instant::now()));
        assert!(!d.is_armed());
    }

    #[test]
    fn test_fires_after_quiet_period() {
        let start = Instant::now();
        let mut d = Debounce::new();
        d.note_event(start);

        assert!(!d.fire_if_due(start + quiet() - Duration::from_millis(1)));
        assert!(d.fire_if_due(start + quiet()));
        // Disarmed after firing.
        assert!(!d.fire_if_due(start + quiet() * 2));
    }

    #[test]
    fn test_burst_of_events_fires_once() {
        let start = Instant::now();
        let mut d = Debounce::new();

        // Ten rapid events, 10ms apart, each inside the previous quiet window.
        let mut last = start;
        for i in 0..10 {
            last = start + Duration::from_millis(i * 10);
            d.note_event(last);
            assert!(!d.fire_if_due(last));
        }

        // Still quiet relative to the LAST event, not the first.
        assert!(!d.fire_if_due(start + quiet()));

        let mut fires = 0;
        for i in 0..10 {
            if d.fire_if_due(last + quiet() + Duration::from_millis(i)) {
                fires += 1;
            }
        }
        assert_eq!(fires, 1);
    }

    #[test]
    fn test_event_after_fire_rearms() {
        let start = Instant::now();
        let mut d = Debounce::new();

        d.note_event(start);
        assert!(d.fire_if_due(start + quiet()));

        d.note_event(start + quiet() * 2);
        assert!(d.is_armed());
        assert!(d.fire_if_due(start + quiet() * 3));
    }

    #[test]
    fn test_time_until_due() {
        let start = Instant::now();
        let mut d = Debounce::new();
        assert_eq!(d.time_until_due(start), None);

        d.note_event(start);
        assert_eq!(d.time_until_due(start), Some(quiet()));
        assert_eq!(
            d.time_until_due(start + Duration::from_millis(150)),
            Some(Duration::from_millis(50))
        );
        // Past the deadline, remaining time clamps to zero.
        assert_eq!(d.time_until_due(start + quiet() * 2), Some(Duration::ZERO));
    }
}
