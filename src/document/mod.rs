//! Source document handling: frontmatter, markdown rendering, lint checks.

pub mod frontmatter;
pub mod markdown;
pub mod validate;
