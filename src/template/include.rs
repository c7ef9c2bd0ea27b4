//! Component inclusion.
//!
//! `{{! include('relative/path') }}` splices an external fragment file into
//! the template. One pass over the original template: a fragment containing
//! its own include directive is NOT expanded further (deliberate, keeps
//! resolution bounded). Each directive resolves independently; a missing
//! fragment becomes an inline diagnostic comment and a reported error while
//! the rest of the template proceeds.

use regex::{Captures, Regex};
use std::{fs, path::Path, sync::LazyLock};

static INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\{\{!\s*include\s*\(\s*'([^']+)'\s*\)\s*\}\}").expect("include pattern")
});

/// A fragment that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeError {
    /// Path as written in the directive.
    pub path: String,
    pub message: String,
}

/// Result of include expansion: transformed text plus diagnostics.
#[derive(Debug, Default)]
pub struct IncludeReport {
    /// Fragment paths spliced successfully, in scan order.
    pub included: Vec<String>,
    pub errors: Vec<IncludeError>,
}

/// Expand all include directives against `template_dir`.
pub fn expand(text: &str, template_dir: &Path) -> (String, IncludeReport) {
    let mut report = IncludeReport::default();

    let result = INCLUDE.replace_all(text, |caps: &Captures| {
        let rel = &caps[1];
        let full = template_dir.join(rel);

        match fs::read_to_string(&full) {
            Ok(content) => {
                report.included.push(rel.to_string());
                content
            }
            Err(err) => {
                let message = if full.exists() {
                    err.to_string()
                } else {
                    format!("file not found: {}", full.display())
                };
                report.errors.push(IncludeError {
                    path: rel.to_string(),
                    message: message.clone(),
                });
                format!("<!-- ERROR: failed to include '{rel}': {message} -->")
            }
        }
    });

    (result.into_owned(), report)
}
