//! Build command: one markdown document in, one HTML file out.
//!
//! The document's frontmatter supplies placeholder values (falling back to
//! `[post]` config defaults), the rendered body becomes the `content` tag,
//! and the configured template is resolved through the full pipeline.

use crate::config::Config;
use crate::document::{frontmatter, markdown, validate};
use crate::template::{self, TagMap, time};
use crate::utils::date::Snapshot;
use crate::{debug, log};
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

use super::args::BuildArgs;

/// Per-run build settings, resolved from CLI flags.
///
/// Flags only narrow what the `[validation]` config enables; they never
/// force linting on when the config disabled it.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub no_validate: bool,
    pub no_errors: bool,
    pub no_warns: bool,
}

impl BuildOptions {
    pub fn from_args(args: &BuildArgs) -> Self {
        Self {
            no_validate: args.no_validate,
            no_errors: args.no_errors,
            no_warns: args.no_warns,
        }
    }
}

/// Run one pipeline execution: read, lint, render, resolve, write.
///
/// Returns the path of the written output file.
pub fn generate(input: &Path, config: &Config, options: &BuildOptions) -> Result<PathBuf> {
    if input.extension().and_then(|e| e.to_str()) != Some("md") {
        bail!("expected a markdown (.md) document, got '{}'", input.display());
    }

    let content = fs::read_to_string(input)
        .with_context(|| format!("failed to read document '{}'", input.display()))?;
    let document = frontmatter::parse(&content);

    if config.validation.enabled && !options.no_validate {
        let report = validate::validate(&document.body, &config.rules);
        validate::print_results(
            &report,
            config.validation.errors && !options.no_errors,
            config.validation.warns && !options.no_warns,
        );
    }

    let body = markdown::render(&document.body);
    let snapshot = Snapshot::now();
    let values = build_values(&document.attributes, &body, config, &snapshot);

    let template_path = &config.paths.template;
    let template = fs::read_to_string(template_path)
        .with_context(|| format!("failed to read template '{}'", template_path.display()))?;

    let template_dir = config.paths.template_dir();
    let resolved = template::resolve(&template, &values, Some(&template_dir), &snapshot);

    for included in &resolved.included {
        debug!("build"; "included fragment '{}'", included);
    }
    for error in &resolved.errors {
        log!("build"; "include '{}' failed: {}", error.path, error.message);
    }

    let output_path = output_path_for(input, config)?;
    let output_dir = output_path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory '{}'", output_dir.display()))?;
    fs::write(&output_path, &resolved.text)
        .with_context(|| format!("failed to write '{}'", output_path.display()))?;

    log!(
        "build";
        "{} -> {} ({} bytes)",
        input.display(),
        output_path.display(),
        resolved.text.len()
    );
    Ok(output_path)
}

/// Output file: `<output_dir>/<document stem>.html`.
fn output_path_for(input: &Path, config: &Config) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("document '{}' has no usable file name", input.display()))?;
    Ok(config.paths.output_dir.join(format!("{stem}.html")))
}

/// Assemble the value mapping for one run.
///
/// Every frontmatter key becomes a placeholder value. The conventional keys
/// (title, description, color) fall back to `[post]` config defaults, the
/// rendered body is exposed as `content`, and the default-format date/time
/// tags are seeded from the same snapshot the macros use.
fn build_values(
    attributes: &std::collections::BTreeMap<String, String>,
    body: &str,
    config: &Config,
    snapshot: &Snapshot,
) -> TagMap {
    let mut values = TagMap::new();
    time::seed_default_values(&mut values, snapshot);

    values.insert("title", config.post.title.clone());
    values.insert("description", config.post.description.clone());
    values.insert("color", config.post.color.clone());

    for (key, value) in attributes {
        values.insert(key, value.clone());
    }

    values.insert("content", body);
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_project(dir: &TempDir) -> (PathBuf, Config) {
        let root = dir.path();
        std::fs::create_dir_all(root.join("templates")).unwrap();
        std::fs::write(
            root.join("templates/template.html"),
            "<html><head><title>{{! title }}</title></head>\
             <body><!-- [BLOGGY::CONTENT] --></body></html>",
        )
        .unwrap();
        std::fs::write(
            root.join("post.md"),
            "---\ntitle: First Post\n---\n\n# Hello\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.paths.template = root.join("templates/template.html");
        config.paths.output_dir = root.join("dist");
        (root.join("post.md"), config)
    }

    #[test]
    fn test_generate_writes_named_output() {
        let dir = TempDir::new().unwrap();
        let (input, config) = write_project(&dir);

        let output = generate(&input, &config, &BuildOptions::default()).unwrap();
        assert!(output.ends_with("dist/post.html"));

        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("<title>First Post</title>"));
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(!html.contains("BLOGGY::CONTENT"));
    }

    #[test]
    fn test_frontmatter_overrides_config_defaults() {
        let dir = TempDir::new().unwrap();
        let (input, config) = write_project(&dir);

        let output = generate(&input, &config, &BuildOptions::default()).unwrap();
        let html = std::fs::read_to_string(output).unwrap();
        assert!(html.contains("First Post"));
        assert!(!html.contains("Unnamed Post"));
    }

    #[test]
    fn test_non_markdown_input_rejected() {
        let config = Config::default();
        let err = generate(Path::new("notes.txt"), &config, &BuildOptions::default());
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_template_is_error() {
        let dir = TempDir::new().unwrap();
        let (input, mut config) = write_project(&dir);
        config.paths.template = dir.path().join("gone.html");

        let err = generate(&input, &config, &BuildOptions::default()).unwrap_err();
        assert!(err.to_string().contains("gone.html"));
    }

    #[test]
    fn test_config_defaults_fill_missing_frontmatter() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("templates")).unwrap();
        std::fs::write(
            root.join("templates/template.html"),
            "{{! title }}|{{! color }}",
        )
        .unwrap();
        std::fs::write(root.join("bare.md"), "no frontmatter here\n").unwrap();

        let mut config = Config::default();
        config.paths.template = root.join("templates/template.html");
        config.paths.output_dir = root.join("dist");

        let output = generate(&root.join("bare.md"), &config, &BuildOptions::default()).unwrap();
        let html = std::fs::read_to_string(output).unwrap();
        assert_eq!(html, "Unnamed Post|#72d572");
    }
}
