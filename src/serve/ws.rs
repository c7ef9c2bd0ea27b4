//! WebSocket push channel for live reload.
//!
//! A `ClientRegistry` owns every connected preview client behind a mutex so
//! add/remove/broadcast are race-free. Broadcast is fire-and-forget and
//! at-most-once per client per call: a failed send drops the client from
//! the registry, nothing is retried.

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::message::ReloadMessage;

/// Maximum port retry attempts when the preferred port is taken.
const MAX_PORT_RETRIES: u16 = 10;

/// Default WebSocket port for live reload.
pub const DEFAULT_WS_PORT: u16 = 35729;

/// Set of currently connected preview clients.
#[derive(Default)]
pub struct ClientRegistry {
    clients: Mutex<Vec<WebSocket<TcpStream>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Perform the WebSocket handshake and register the client.
    fn add_client(&self, stream: TcpStream) {
        match tungstenite::accept(stream) {
            Ok(mut ws) => {
                let hello = ReloadMessage::connected();
                if let Err(e) = ws.send(Message::Text(hello.to_json().into())) {
                    crate::log!("reload"; "failed to send connected message: {}", e);
                    return;
                }

                let mut clients = self.clients.lock();
                crate::debug!("reload"; "client connected (total: {})", clients.len() + 1);
                clients.push(ws);
            }
            Err(e) => {
                crate::log!("reload"; "handshake failed: {}", e);
            }
        }
    }

    /// Broadcast a reload signal to every connected client.
    ///
    /// No acknowledgment, no retry; clients whose send fails are removed.
    pub fn broadcast_reload(&self, reason: &str) {
        let msg = Message::Text(ReloadMessage::reload_with_reason(reason).to_json().into());

        let mut clients = self.clients.lock();
        if clients.is_empty() {
            crate::debug!("reload"; "no clients connected");
            return;
        }

        let count = clients.len();
        clients.retain_mut(|ws| match ws.send(msg.clone()) {
            Ok(_) => true,
            Err(e) => {
                crate::debug!("reload"; "client disconnected: {}", e);
                false
            }
        });
        crate::debug!("reload"; "broadcast reload to {} clients", count);
    }

    /// Number of currently connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }
}

/// Start the WebSocket acceptor.
///
/// Binds `base_port` (retrying on the next ports when taken), then accepts
/// connections on a background thread, handing each one to the registry.
/// Returns the port actually bound.
pub fn start_ws_server(base_port: u16, registry: Arc<ClientRegistry>) -> Result<u16> {
    let (listener, actual_port) = try_bind_port(base_port, MAX_PORT_RETRIES)?;

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            if crate::core::is_shutdown() {
                break;
            }
            match stream {
                Ok(stream) => registry.add_client(stream),
                Err(e) => {
                    crate::log!("reload"; "accept error: {}", e);
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
        }
    });

    Ok(actual_port)
}

/// Try binding to port, retry with incremented port if in use.
fn try_bind_port(base_port: u16, max_retries: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(format!("127.0.0.1:{port}")) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    Err(anyhow::anyhow!(
        "failed to bind WebSocket server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}
