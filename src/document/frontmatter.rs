//! Frontmatter extraction.
//!
//! A document may start with a metadata block of `key: value` lines between
//! two `---` separator lines. Everything after the closing separator is the
//! body handed to the markdown renderer.

use std::collections::BTreeMap;

/// Parsed document: metadata attributes plus the remaining body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub attributes: BTreeMap<String, String>,
    pub body: String,
}

/// Split a document into frontmatter attributes and body.
///
/// Without a leading separator the whole content is the body. Lines inside
/// the block that carry no `:` are skipped; values keep any further colons
/// (`url: https://...`).
pub fn parse(content: &str) -> Document {
    let Some(rest) = strip_separator(content) else {
        return Document {
            attributes: BTreeMap::new(),
            body: content.to_string(),
        };
    };

    let Some(end) = find_closing_separator(rest) else {
        return Document {
            attributes: BTreeMap::new(),
            body: content.to_string(),
        };
    };

    let (block, body) = rest.split_at(end.block_len);
    let mut attributes = BTreeMap::new();

    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        attributes.insert(key.to_string(), value.trim().to_string());
    }

    Document {
        attributes,
        body: body[end.sep_len..].to_string(),
    }
}

struct Closing {
    block_len: usize,
    sep_len: usize,
}

/// Strip the opening `---` line, tolerating a trailing `\r`.
fn strip_separator(content: &str) -> Option<&str> {
    content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
}

/// Locate the closing `---` line within the remainder.
fn find_closing_separator(rest: &str) -> Option<Closing> {
    for sep in ["\n---\n", "\n---\r\n"] {
        if let Some(pos) = rest.find(sep) {
            return Some(Closing {
                block_len: pos,
                sep_len: sep.len(),
            });
        }
    }
    None
}
