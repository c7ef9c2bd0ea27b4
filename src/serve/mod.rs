//! Preview server with live reload.
//!
//! Serves the output directory over HTTP, synthesizes a listing page for
//! `/`, injects the reload client into HTML responses, and keeps a
//! WebSocket push channel to connected browsers. Request handling is
//! stateless and concurrent; the only shared state is the client registry
//! used for broadcast.

mod message;
mod path;
mod response;
mod ws;

pub use ws::{ClientRegistry, DEFAULT_WS_PORT};

use crate::config::Config;
use crate::{core, debug, log};
use anyhow::Result;
use std::net::{IpAddr, SocketAddr, TcpListener};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Maximum HTTP port retry attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Running preview server handle.
pub struct Preview {
    pub addr: SocketAddr,
    pub clients: Arc<ClientRegistry>,
}

/// Bind the HTTP listener and the WebSocket acceptor, then serve requests
/// on a background thread pool. Returns immediately with a handle the
/// orchestrator uses for reload broadcasts.
pub fn start(config: &Config, port_override: Option<u16>) -> Result<Preview> {
    let port = port_override.unwrap_or(config.serve.port);
    let (server, addr) = bind_with_retry(config.serve.interface, port)?;
    let server = Arc::new(server);

    let clients = Arc::new(ClientRegistry::new());
    let ws_port = ws::start_ws_server(DEFAULT_WS_PORT, Arc::clone(&clients))?;
    debug!("reload"; "ws://localhost:{}", ws_port);

    core::register_server_for_shutdown(Arc::clone(&server));
    log!("serve"; "http://{}", addr);

    let output_dir = config.paths.output_dir.clone();
    let http_port = addr.port();
    std::thread::spawn(move || {
        run_request_loop(&server, output_dir, http_port, ws_port);
    });

    Ok(Preview { addr, clients })
}

/// Bind the HTTP server, retrying on the next ports when taken.
fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        // Bind with std first so we get a typed error instead of
        // tiny_http's boxed one.
        match TcpListener::bind(addr) {
            Ok(listener) => {
                let addr = listener.local_addr()?;
                let server = Server::from_listener(listener, None)
                    .map_err(|e| anyhow::anyhow!("failed to start http server: {e}"))?;
                if offset > 0 {
                    log!("serve"; "port {} was taken, using {}", base_port, addr.port());
                }
                return Ok((server, addr));
            }
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    Err(anyhow::anyhow!(
        "failed to bind http server after {} attempts: {}",
        MAX_PORT_RETRIES,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

fn run_request_loop(server: &Server, output_dir: PathBuf, http_port: u16, ws_port: u16) {
    // Small pool so one slow disk read never blocks other requests
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .expect("failed to create request thread pool");

    for request in server.incoming_requests() {
        let output_dir = output_dir.clone();
        pool.spawn(move || {
            handle_request(request, &output_dir, http_port, ws_port);
        });
    }
}

/// Handle one request. All fallible work happens while building the
/// payload, so a failure still has the request available for the themed
/// 500 page; the request is answered exactly once.
fn handle_request(request: Request, output_dir: &Path, http_port: u16, ws_port: u16) {
    let url = request.url().to_string();
    debug!("serve"; "GET {}", url);

    let payload = if core::is_shutdown() {
        response::unavailable_payload()
    } else {
        route(&url, output_dir, http_port, ws_port).unwrap_or_else(|error| {
            log!("serve"; "request error on {}: {:#}", url, error);
            response::error_payload(&url, &error)
        })
    };

    if let Err(e) = response::send(request, payload) {
        debug!("serve"; "client hung up on {}: {}", url, e);
    }
}

/// Build the response payload for a URL.
fn route(
    url: &str,
    output_dir: &Path,
    http_port: u16,
    ws_port: u16,
) -> Result<response::Payload> {
    if url == crate::embed::serve::LIVERELOAD_PATH {
        return Ok(response::livereload_js_payload(ws_port));
    }

    if url == "/" || url.starts_with("/?") {
        return Ok(response::home_payload(output_dir, http_port));
    }

    match path::resolve_path(url, output_dir) {
        Some(file) => response::file_payload(&file),
        None => Ok(response::not_found_payload(url)),
    }
}
