//! Relative-time macro expansion.
//!
//! `{{! date_diff }}` becomes an inline script that embeds the pipeline
//! run's timestamp and, on page load, writes a human-readable "time since
//! generation" string entirely client-side. `humanize` is the Rust twin of
//! the embedded script's thresholds; the two must stay in sync (it also
//! backs the preview server's listing page).

use crate::utils::date::Snapshot;
use regex::Regex;
use std::sync::LazyLock;

static DATE_DIFF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{\{!\s*date_diff\s*\}\}").expect("date_diff pattern"));

const MINUTE: u64 = 60;
const HOUR: u64 = 3_600;
const DAY: u64 = 86_400;
const MONTH: u64 = 2_592_000; // 30 days
const YEAR: u64 = 31_536_000; // 365 days

/// Replace every `{{! date_diff }}` with the self-updating script.
pub fn expand(text: &str, snapshot: &Snapshot) -> String {
    if !DATE_DIFF.is_match(text) {
        return text.to_string();
    }
    let script = diff_script(snapshot.epoch_ms);
    DATE_DIFF
        .replace_all(text, regex::NoExpand(&script))
        .into_owned()
}

/// Human-readable "time since" for a second count.
///
/// Thresholds: <60s "just now"; then minutes, hours, days (30-day months,
/// 365-day years), with singular wording at exactly one unit.
pub fn humanize(seconds: u64) -> String {
    if seconds < MINUTE {
        return "just now".to_string();
    }

    let (qty, unit) = match seconds {
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < MONTH => (s / DAY, "day"),
        s if s < YEAR => (s / MONTH, "month"),
        s => (s / YEAR, "year"),
    };

    if qty == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{qty} {unit}s ago")
    }
}

/// Build the inline script for a generation timestamp (epoch millis).
fn diff_script(epoch_ms: u64) -> String {
    format!(
        "<script>(function(){{var g={epoch_ms};\
var s=Math.floor((Date.now()-g)/1e3);var t;\
if(s<{MINUTE}){{t=\"just now\";}}\
else if(s<{HOUR}){{var m=Math.floor(s/{MINUTE});t=m===1?\"1 minute ago\":m+\" minutes ago\";}}\
else if(s<{DAY}){{var h=Math.floor(s/{HOUR});t=h===1?\"1 hour ago\":h+\" hours ago\";}}\
else if(s<{MONTH}){{var d=Math.floor(s/{DAY});t=d===1?\"1 day ago\":d+\" days ago\";}}\
else if(s<{YEAR}){{var n=Math.floor(s/{MONTH});t=n===1?\"1 month ago\":n+\" months ago\";}}\
else{{var y=Math.floor(s/{YEAR});t=y===1?\"1 year ago\":y+\" years ago\";}}\
document.write(t);}})();</script>"
    )
}
