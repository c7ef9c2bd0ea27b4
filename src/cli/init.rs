//! Project initialization.
//!
//! Scaffolds a working project: a sample post, a template demonstrating
//! both placeholder spellings plus includes and time macros, and a default
//! config. Existing files are never overwritten.

use crate::embed::init as assets;
use crate::log;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Create the project structure under `root`.
pub fn new_project(root: &Path) -> Result<()> {
    for dir in ["markdown", "templates", "dist"] {
        fs::create_dir_all(root.join(dir))
            .with_context(|| format!("failed to create directory '{dir}'"))?;
    }

    let files: [(&str, &str); 5] = [
        ("bloggy.toml", assets::CONFIG_TOML),
        ("templates/template.html", assets::TEMPLATE_HTML),
        ("templates/header.html", assets::HEADER_HTML),
        ("templates/footer.html", assets::FOOTER_HTML),
        ("markdown/hello-world.md", assets::SAMPLE_POST_MD),
    ];

    let mut written = 0usize;
    for (rel, content) in files {
        let path = root.join(rel);
        if path.exists() {
            log!("init"; "'{}' already exists, keeping it", rel);
            continue;
        }
        fs::write(&path, content).with_context(|| format!("failed to write '{rel}'"))?;
        written += 1;
    }

    log!("init"; "project initialized in '{}' ({} files written)", root.display(), written);
    log!("init"; "next: bloggy watch markdown/hello-world.md");
    Ok(())
}
