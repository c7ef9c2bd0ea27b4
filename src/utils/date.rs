//! UTC time snapshots without timezone dependencies.
//!
//! A `Snapshot` is the single instant a pipeline run is evaluated against:
//! every time macro in one run renders from the same snapshot so multiple
//! macros in one document agree.

use std::time::{SystemTime, UNIX_EPOCH};

/// One UTC instant, broken down into civil fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Milliseconds since the Unix epoch (embedded in the date_diff script).
    pub epoch_ms: u64,
}

impl Snapshot {
    /// Capture the current instant.
    pub fn now() -> Self {
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self::from_epoch_ms(ms)
    }

    /// Build a snapshot from epoch milliseconds.
    pub fn from_epoch_ms(epoch_ms: u64) -> Self {
        let secs = epoch_ms / 1000;
        let days = (secs / 86400) as i64;
        let rem = secs % 86400;
        let (year, month, day) = civil_from_days(days);

        Self {
            year: year as u16,
            month,
            day,
            hour: (rem / 3600) as u8,
            minute: ((rem / 60) % 60) as u8,
            second: (rem % 60) as u8,
            epoch_ms,
        }
    }
}

/// Days since 1970-01-01 to (year, month, day).
///
/// Howard Hinnant's civil-from-days algorithm; valid for the full range
/// a u64 epoch can express.
fn civil_from_days(z: i64) -> (i64, u8, u8) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    (if m <= 2 { y + 1 } else { y }, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_start() {
        let s = Snapshot::from_epoch_ms(0);
        assert_eq!((s.year, s.month, s.day), (1970, 1, 1));
        assert_eq!((s.hour, s.minute, s.second), (0, 0, 0));
    }

    #[test]
    fn test_known_instant() {
        // 2024-06-15T14:30:45Z
        let s = Snapshot::from_epoch_ms(1_718_461_845_000);
        assert_eq!((s.year, s.month, s.day), (2024, 6, 15));
        assert_eq!((s.hour, s.minute, s.second), (14, 30, 45));
    }

    #[test]
    fn test_leap_day() {
        // 2024-02-29T00:00:00Z
        let s = Snapshot::from_epoch_ms(1_709_164_800_000);
        assert_eq!((s.year, s.month, s.day), (2024, 2, 29));
    }

    #[test]
    fn test_millis_preserved() {
        let s = Snapshot::from_epoch_ms(1234);
        assert_eq!(s.epoch_ms, 1234);
        assert_eq!(s.second, 1);
    }
}
