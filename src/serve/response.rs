//! HTTP response building for the preview server.
//!
//! Handlers build a `Payload` first (all fallible work happens here), and
//! the request is answered exactly once afterwards. A builder failure is
//! turned into the themed 500 page by the caller; a missing asset is the
//! themed 404 page, not an error.

use crate::embed::serve::{
    ERROR_HTML, ErrorVars, HOME_HTML, HomeVars, LIVERELOAD_JS, LIVERELOAD_SNIPPET, LiveReloadVars,
    NOT_FOUND_HTML, NotFoundVars,
};
use crate::logger::now_hms;
use crate::template::relative::humanize;
use crate::utils::html::escape;
use crate::utils::mime::{self, types};
use anyhow::{Context, Result};
use std::{fs, path::Path, time::SystemTime};
use tiny_http::{Header, Request, Response, StatusCode};

/// A fully built response, ready to transmit.
pub struct Payload {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// A static file, with the reload client injected into HTML.
pub fn file_payload(path: &Path) -> Result<Payload> {
    let content_type = mime::from_path(path);
    let body = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Payload {
        status: 200,
        content_type,
        body: maybe_inject_livereload(body, content_type),
    })
}

/// The synthesized listing page for `/`.
pub fn home_payload(output_dir: &Path, port: u16) -> Payload {
    let links = page_links(output_dir);
    let body = HOME_HTML.render(&HomeVars {
        port,
        page_links: &links,
    });
    Payload {
        status: 200,
        content_type: types::HTML,
        body: maybe_inject_livereload(body.into_bytes(), types::HTML),
    }
}

/// The themed 404 page, carrying the offending path and time.
pub fn not_found_payload(request_path: &str) -> Payload {
    let body = NOT_FOUND_HTML.render(&NotFoundVars {
        request_path: &escape(request_path),
        time: &now_hms(),
    });
    Payload {
        status: 404,
        content_type: types::HTML,
        body: maybe_inject_livereload(body.into_bytes(), types::HTML),
    }
}

/// The themed 500 page for a handler-level failure.
pub fn error_payload(request_path: &str, error: &anyhow::Error) -> Payload {
    let body = ERROR_HTML.render(&ErrorVars {
        message: &escape(&format!("{error:#}")),
        request_path: &escape(request_path),
        time: &now_hms(),
    });
    Payload {
        status: 500,
        content_type: types::HTML,
        body: maybe_inject_livereload(body.into_bytes(), types::HTML),
    }
}

/// The live-reload client script, served from memory.
pub fn livereload_js_payload(ws_port: u16) -> Payload {
    let body = LIVERELOAD_JS.render(&LiveReloadVars { ws_port });
    Payload {
        status: 200,
        content_type: types::JAVASCRIPT,
        body: body.into_bytes(),
    }
}

/// 503 Service Unavailable (server shutting down).
pub fn unavailable_payload() -> Payload {
    Payload {
        status: 503,
        content_type: types::PLAIN,
        body: b"503 Service Unavailable".to_vec(),
    }
}

/// Transmit a payload.
pub fn send(request: Request, payload: Payload) -> Result<()> {
    let response = Response::from_data(payload.body)
        .with_status_code(StatusCode(payload.status))
        .with_header(
            Header::from_bytes("Content-Type", payload.content_type).expect("static header"),
        );
    request.respond(response)?;
    Ok(())
}

/// Inject the reload client script tag into HTML responses, immediately
/// before the closing body tag, or at the end when no closing tag exists.
pub fn maybe_inject_livereload(body: Vec<u8>, content_type: &'static str) -> Vec<u8> {
    if content_type != types::HTML {
        return body;
    }
    inject_livereload(body)
}

fn inject_livereload(mut body: Vec<u8>) -> Vec<u8> {
    match rfind_close_body(&body) {
        Some(pos) => {
            let mut out = Vec::with_capacity(body.len() + LIVERELOAD_SNIPPET.len());
            out.extend_from_slice(&body[..pos]);
            out.extend_from_slice(LIVERELOAD_SNIPPET.as_bytes());
            out.extend_from_slice(&body[pos..]);
            out
        }
        None => {
            body.extend_from_slice(LIVERELOAD_SNIPPET.as_bytes());
            body
        }
    }
}

/// Last case-insensitive occurrence of `</body>`.
fn rfind_close_body(body: &[u8]) -> Option<usize> {
    const NEEDLE: &[u8] = b"</body>";
    body.windows(NEEDLE.len())
        .rposition(|w| w.eq_ignore_ascii_case(NEEDLE))
}

/// Build `<li>` entries for every generated page in the output directory.
fn page_links(output_dir: &Path) -> String {
    let Ok(entries) = fs::read_dir(output_dir) else {
        return "<li>no generated pages yet</li>".to_string();
    };

    let mut pages: Vec<(String, Option<u64>)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(".html") {
                return None;
            }
            let age_secs = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .and_then(|mtime| SystemTime::now().duration_since(mtime).ok())
                .map(|d| d.as_secs());
            Some((name, age_secs))
        })
        .collect();
    pages.sort();

    if pages.is_empty() {
        return "<li>no generated pages yet</li>".to_string();
    }

    pages
        .iter()
        .map(|(name, age)| {
            let age_label = age
                .map(|secs| format!(" <span class=\"age\">generated {}</span>", humanize(secs)))
                .unwrap_or_default();
            format!(
                "<li><a href=\"/{name}\">{}</a>{age_label}</li>",
                escape(name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}
