//! Rule-based markdown lint checks.
//!
//! Each rule is an independent regex scan over the raw body; rules share no
//! state and a failing rule never stops the conversion. Errors flag content
//! that will render broken, warnings flag bad practice.

use crate::config::RulesConfig;
use owo_colors::OwoColorize;
use regex::Regex;
use std::sync::LazyLock;

/// Lint findings for one document.
#[derive(Debug, Default, Clone)]
pub struct LintReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

static EMPTY_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(\s*\)").unwrap());
static CONSECUTIVE_HEADERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6} .+\n#{1,6} .+").unwrap());
static IMAGE_WITHOUT_ALT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\s*\]\([^)]+\)").unwrap());
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<([a-z][a-z0-9]*)[^>]*>").unwrap());
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:[-*+]|\d+\.)\s+.+").unwrap());
static SPACED_LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:[-*+]|\d+\.)\s+.+\n\n").unwrap());
static TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|[^|\n]+\|").unwrap());
// Only same-line whitespace: \s would match the newline between two
// adjacent rows and count `|\n|` as a separator.
static TABLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|[ \t\-:]+\|").unwrap());

/// Inline HTML elements that are fine inside markdown prose.
const ALLOWED_HTML_TAGS: &[&str] = &["code", "pre", "kbd", "br", "hr"];

/// Run all enabled rules over a markdown body.
pub fn validate(body: &str, rules: &RulesConfig) -> LintReport {
    let mut report = LintReport::default();

    for cap in EMPTY_LINK.captures_iter(body) {
        report.errors.push(format!(
            "empty link target for \"[{}]()\", missing a url",
            &cap[1]
        ));
    }

    if !rules.allow_consecutive_headers {
        let count = CONSECUTIVE_HEADERS.find_iter(body).count();
        if count > 0 {
            report.warnings.push(format!(
                "found {count} consecutive headers without content between them"
            ));
        }
    }

    if rules.max_header_depth < 6 {
        let deep = Regex::new(&format!(r"(?m)^#{{{},6}} ", rules.max_header_depth + 1))
            .expect("header depth pattern");
        if deep.is_match(body) {
            report.warnings.push(format!(
                "using headers deeper than h{}, consider restructuring",
                rules.max_header_depth
            ));
        }
    }

    let long = body
        .split("\n\n")
        .filter(|p| p.len() > rules.max_paragraph_length)
        .count();
    if long > 0 {
        report.warnings.push(format!(
            "found {long} very long paragraphs (>{} chars), consider breaking them up",
            rules.max_paragraph_length
        ));
    }

    if !rules.allow_raw_html {
        let tags: Vec<&str> = HTML_TAG
            .captures_iter(body)
            .filter(|cap| {
                let name = cap.get(1).map_or("", |m| m.as_str()).to_ascii_lowercase();
                !ALLOWED_HTML_TAGS.contains(&name.as_str())
            })
            .map(|cap| cap.get(0).map_or("", |m| m.as_str()))
            .collect();
        if !tags.is_empty() {
            let shown = tags.iter().take(3).copied().collect::<Vec<_>>().join(", ");
            let ellipsis = if tags.len() > 3 { "..." } else { "" };
            report
                .warnings
                .push(format!("found raw html tags in markdown: {shown}{ellipsis}"));
        }
    }

    if rules.require_image_alts {
        let count = IMAGE_WITHOUT_ALT.find_iter(body).count();
        if count > 0 {
            report.warnings.push(format!(
                "found {count} images without alt text (important for accessibility)"
            ));
        }
    }

    if rules.require_list_spacing {
        let items = LIST_ITEM.find_iter(body).count();
        let spaced = SPACED_LIST_ITEM.find_iter(body).count();
        if items > 0 && spaced == items {
            report.warnings.push(
                "list items appear to be separated by blank lines, this breaks list formatting"
                    .into(),
            );
        }
    }

    if rules.require_table_separators {
        let rows = TABLE_ROW.find_iter(body).count();
        let separators = TABLE_SEPARATOR.find_iter(body).count();
        if rows > 0 && separators == 0 {
            report
                .errors
                .push("table appears to be malformed, missing separator row with dashes".into());
        }
    }

    report
}

/// Print lint results with colored headers.
pub fn print_results(report: &LintReport, show_errors: bool, show_warns: bool) {
    if show_errors && !report.errors.is_empty() {
        println!("{}", "lint errors:".red().bold());
        for error in &report.errors {
            println!("  {} {}", "•".red(), error.red());
        }
    }

    if show_warns && !report.warnings.is_empty() {
        println!("{}", "lint warnings:".yellow().bold());
        for warning in &report.warnings {
            println!("  {} {}", "•".yellow(), warning.yellow());
        }
    }
}
