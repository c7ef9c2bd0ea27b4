//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

/// Resolve a request URL to a file under `serve_root`.
///
/// Extensionless paths are tried as a directory with an `index.html` and
/// as the path with `.html` appended. Traversal out of the serve root is
/// rejected, including via symlinks.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);

    if clean.contains("..") {
        return None;
    }

    let local = serve_root.join(&clean);

    if let Some(found) = verify(&local, serve_root) {
        return Some(found);
    }

    // Extensionless path: try "<path>.html"
    if local.extension().is_none() && !clean.is_empty() {
        let with_ext = local.with_extension("html");
        if let Some(found) = verify(&with_ext, serve_root)
            && found.is_file()
        {
            return Some(found);
        }
    }

    None
}

/// Canonicalize and confirm the path stays under the serve root; directories
/// resolve to their index.html.
fn verify(local: &Path, serve_root: &Path) -> Option<PathBuf> {
    let canonical = local.canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

/// Normalize URL: decode, strip query string, trim slashes.
fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;
    let decoded = percent_decode_str(url)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    let path = decoded.split('?').next().unwrap_or(&decoded);
    path.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("post.html"), "<html></html>").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/index.html"), "<html></html>").unwrap();
        dir
    }

    #[test]
    fn test_direct_file() {
        let dir = setup();
        let found = resolve_path("/post.html", dir.path()).unwrap();
        assert!(found.ends_with("post.html"));
    }

    #[test]
    fn test_extensionless_resolves_to_html() {
        let dir = setup();
        let found = resolve_path("/post", dir.path()).unwrap();
        assert!(found.ends_with("post.html"));
    }

    #[test]
    fn test_directory_resolves_to_index() {
        let dir = setup();
        let found = resolve_path("/sub/", dir.path()).unwrap();
        assert!(found.ends_with("sub/index.html"));
    }

    #[test]
    fn test_query_string_stripped() {
        let dir = setup();
        assert!(resolve_path("/post.html?v=2", dir.path()).is_some());
    }

    #[test]
    fn test_traversal_rejected() {
        let dir = setup();
        assert!(resolve_path("/../etc/passwd", dir.path()).is_none());
        assert!(resolve_path("/%2e%2e/secret", dir.path()).is_none());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = setup();
        assert!(resolve_path("/nope.html", dir.path()).is_none());
    }
}
