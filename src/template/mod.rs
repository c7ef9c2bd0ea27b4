//! Template resolution pipeline.
//!
//! Fixed composition order, each stage consuming the previous stage's
//! output:
//!
//! 1. component inclusion (skipped entirely when no template dir is known)
//! 2. time macro expansion (literal date/time, then the relative-time
//!    script)
//! 3. tag substitution, last, so included fragments and expanded time text
//!    are themselves eligible for placeholder replacement
//!
//! Every stage is a pure `&str -> String` pass over the text; the only
//! state crossing stages is the accumulated include diagnostics.

pub mod include;
pub mod relative;
pub mod tags;
pub mod time;

pub use tags::TagMap;

use crate::utils::date::Snapshot;
use std::path::Path;

/// Final text plus diagnostics from one pipeline run.
#[derive(Debug)]
pub struct Resolved {
    pub text: String,
    /// Fragment paths spliced successfully, in scan order.
    pub included: Vec<String>,
    pub errors: Vec<include::IncludeError>,
}

/// Run the full pipeline over a raw template.
///
/// `snapshot` is captured once by the caller per run; all time macros (and
/// the seeded default `date`/`time` tags) render from it.
pub fn resolve(
    template: &str,
    values: &TagMap,
    template_dir: Option<&Path>,
    snapshot: &Snapshot,
) -> Resolved {
    let (text, report) = match template_dir {
        Some(dir) => include::expand(template, dir),
        None => (template.to_string(), include::IncludeReport::default()),
    };

    let text = time::expand(&text, snapshot);
    let text = relative::expand(&text, snapshot);
    let text = tags::substitute(&text, values);

    Resolved {
        text,
        included: report.included,
        errors: report.errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn snapshot() -> Snapshot {
        // 2024-06-05T08:07:09Z
        Snapshot::from_epoch_ms(1_717_574_829_000)
    }

    fn values(pairs: &[(&str, &str)]) -> TagMap {
        let mut m = TagMap::new();
        for (k, v) in pairs {
            m.insert(*k, *v);
        }
        m
    }

    #[test]
    fn test_content_marker_removed_before_closing_body() {
        let template = "<!doctype html><html><body><!-- [BLOGGY::CONTENT] --></body></html>";
        let out = resolve(
            template,
            &values(&[("CONTENT", "<p>hi</p>")]),
            None,
            &snapshot(),
        );
        assert_eq!(
            out.text,
            "<!doctype html><html><body><p>hi</p></body></html>"
        );
    }

    #[test]
    fn test_both_spellings_resolve_to_same_value() {
        let template = "{{! title }}|<!-- [BLOGGY::title] -->";
        let out = resolve(template, &values(&[("title", "One")]), None, &snapshot());
        assert_eq!(out.text, "One|One");
    }

    #[test]
    fn test_included_fragment_gets_substitution_and_time() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("footer.html"),
            "<footer>{{! title }} · {{! date('YYYY') }}</footer>",
        )
        .unwrap();

        let out = resolve(
            "{{! include('footer.html') }}",
            &values(&[("title", "Post")]),
            Some(dir.path()),
            &snapshot(),
        );
        assert_eq!(out.text, "<footer>Post · 2024</footer>");
        assert_eq!(out.included, vec!["footer.html"]);
    }

    #[test]
    fn test_missing_include_still_produces_output() {
        let dir = TempDir::new().unwrap();
        let out = resolve(
            "<body>{{! include('missing.html') }}</body>",
            &TagMap::new(),
            Some(dir.path()),
            &snapshot(),
        );
        assert!(out.text.contains("missing.html"));
        assert!(out.text.starts_with("<body><!-- ERROR:"));
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].path, "missing.html");
    }

    #[test]
    fn test_includes_skipped_without_template_dir() {
        let template = "{{! include('x.html') }}";
        let out = resolve(template, &TagMap::new(), None, &snapshot());
        assert_eq!(out.text, template);
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_legacy_date_tag_matches_brace_macro() {
        let mut map = TagMap::new();
        let snap = snapshot();
        time::seed_default_values(&mut map, &snap);

        let out = resolve("<!-- [BLOGGY::date] -->|{{! date }}", &map, None, &snap);
        let (legacy, braced) = out.text.split_once('|').unwrap();
        assert_eq!(legacy, braced);
        assert_eq!(legacy, "05-06-2024");
    }

    #[test]
    fn test_macro_expansion_runs_before_substitution() {
        // A substituted value containing a macro token stays literal: tags
        // run last, so nothing re-expands it.
        let out = resolve(
            "{{! note }}",
            &values(&[("note", "literal {{! date }}")]),
            None,
            &snapshot(),
        );
        assert_eq!(out.text, "literal {{! date }}");
    }
}
