//! Literal date/time macro expansion.
//!
//! `{{! date }}` / `{{! date('FORMAT') }}` and `{{! time }}` /
//! `{{! time('FORMAT') }}` render the pipeline run's snapshot instant.
//! Every macro in one run renders from the same snapshot, so a document
//! with many macros agrees with itself.

use crate::utils::date::Snapshot;
use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const DEFAULT_DATE_FORMAT: &str = "DD-MM-YYYY";
pub const DEFAULT_TIME_FORMAT: &str = "24h";

static DATE_MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\{\{!\s*date(?:\s*\(\s*'([^']*)'\s*\))?\s*\}\}").expect("date pattern")
});

static TIME_MACRO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\{\{!\s*time(?:\s*\(\s*'([^']*)'\s*\))?\s*\}\}").expect("time pattern")
});

/// Render a date format string against a snapshot.
///
/// Tokens: `YYYY` `YY` `MM` `DD` (zero padded) and `M` `D` (bare). Token
/// replacement is longest-first; replaced digits never re-match since tokens
/// are alphabetic.
pub fn format_date(s: &Snapshot, format: &str) -> String {
    format
        .replace("YYYY", &s.year.to_string())
        .replace("YY", &format!("{:02}", s.year % 100))
        .replace("MM", &format!("{:02}", s.month))
        .replace("DD", &format!("{:02}", s.day))
        .replace('M', &s.month.to_string())
        .replace('D', &s.day.to_string())
}

/// Render a time format string against a snapshot.
///
/// `'12h'` and `'24h'` are fixed layouts; anything else is a token string:
/// `HH H` (24-hour), `hh h` (12-hour), `mm m`, `ss s`, `a A` (am/pm).
pub fn format_time(s: &Snapshot, format: &str) -> String {
    let h24 = s.hour;
    let h12 = match h24 % 12 {
        0 => 12,
        h => h,
    };

    match format {
        "12h" => {
            let period = if h24 >= 12 { "PM" } else { "AM" };
            format!("{}:{:02}:{:02} {}", h12, s.minute, s.second, period)
        }
        "24h" => format!("{:02}:{:02}:{:02}", h24, s.minute, s.second),
        _ => format
            .replace("HH", &format!("{h24:02}"))
            .replace('H', &h24.to_string())
            .replace("hh", &format!("{h12:02}"))
            .replace('h', &h12.to_string())
            .replace("mm", &format!("{:02}", s.minute))
            .replace('m', &s.minute.to_string())
            .replace("ss", &format!("{:02}", s.second))
            .replace('s', &s.second.to_string())
            .replace('a', if h24 >= 12 { "pm" } else { "am" })
            .replace('A', if h24 >= 12 { "PM" } else { "AM" }),
    }
}

/// Expand all date/time macros in `text` against one snapshot.
///
/// Macro names other than `date`/`time` (and `date_diff`, handled by the
/// relative expander) never match and are left unexpanded.
pub fn expand(text: &str, snapshot: &Snapshot) -> String {
    let text = DATE_MACRO.replace_all(text, |caps: &Captures| {
        let format = caps.get(1).map_or(DEFAULT_DATE_FORMAT, |m| m.as_str());
        format_date(snapshot, format)
    });

    TIME_MACRO
        .replace_all(&text, |caps: &Captures| {
            let format = caps.get(1).map_or(DEFAULT_TIME_FORMAT, |m| m.as_str());
            format_time(snapshot, format)
        })
        .into_owned()
}

/// Seed a tag map with default-format `date`/`time` values from the same
/// snapshot, so the legacy spelling `<!-- [BLOGGY::date] -->` is
/// byte-identical to `{{! date }}` within one run.
pub fn seed_default_values(values: &mut super::TagMap, snapshot: &Snapshot) {
    values.insert("date", format_date(snapshot, DEFAULT_DATE_FORMAT));
    values.insert("time", format_time(snapshot, DEFAULT_TIME_FORMAT));
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-06-05T08:07:09Z
    fn snapshot() -> Snapshot {
        Snapshot::from_epoch_ms(1_717_574_829_000)
    }

    #[test]
    fn test_default_date_format() {
        assert_eq!(format_date(&snapshot(), DEFAULT_DATE_FORMAT), "05-06-2024");
    }

    #[test]
    fn test_date_tokens() {
        let s = snapshot();
        assert_eq!(format_date(&s, "YYYY/MM/DD"), "2024/06/05");
        assert_eq!(format_date(&s, "D.M.YY"), "5.6.24");
    }

    #[test]
    fn test_time_fixed_layouts() {
        let s = snapshot();
        assert_eq!(format_time(&s, "24h"), "08:07:09");
        assert_eq!(format_time(&s, "12h"), "8:07:09 AM");
    }

    #[test]
    fn test_time_tokens() {
        let s = snapshot();
        assert_eq!(format_time(&s, "HH:mm"), "08:07");
        assert_eq!(format_time(&s, "h:mm A"), "8:07 AM");
    }

    #[test]
    fn test_time_pm_wraparound() {
        // 2024-06-05T12:00:00Z and 2024-06-05T13:30:00Z
        let noon = Snapshot::from_epoch_ms(1_717_588_800_000);
        assert_eq!(format_time(&noon, "12h"), "12:00:00 PM");
        let s = Snapshot::from_epoch_ms(1_717_594_200_000);
        assert_eq!(format_time(&s, "h a"), "1 pm");
    }

    #[test]
    fn test_expand_macros() {
        let out = expand("on {{! date('YYYY-MM-DD') }} at {{! time }}", &snapshot());
        assert_eq!(out, "on 2024-06-05 at 08:07:09");
    }

    #[test]
    fn test_expand_without_format_uses_default() {
        assert_eq!(expand("{{! date }}", &snapshot()), "05-06-2024");
        assert_eq!(expand("{{!date}}", &snapshot()), "05-06-2024");
    }

    #[test]
    fn test_unrecognized_macro_left_unexpanded() {
        let text = "{{! datetime }} {{! clock('x') }}";
        assert_eq!(expand(text, &snapshot()), text);
    }

    #[test]
    fn test_all_macros_share_one_snapshot() {
        let s = snapshot();
        let out = expand("{{! time }} / {{! time }}", &s);
        assert_eq!(out, "08:07:09 / 08:07:09");
    }
}
