//! Process-wide shutdown state for watch mode.
//!
//! - `SHUTDOWN`: has Ctrl+C been received?
//! - `SERVER`: HTTP server reference so the handler can unblock its
//!   accept loop
//! - `SHUTDOWN_TX`: channel to the watch orchestrator loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Shutdown signal sender for the watch orchestrator
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Check if shutdown has been requested.
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

/// Setup the global Ctrl+C handler. Call once at program start.
///
/// Before a server/orchestrator is registered the process simply exits;
/// afterwards the handler unblocks the HTTP accept loop and notifies the
/// watch loop so both wind down cleanly.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        let registered = SHUTDOWN_TX.get().is_some() || SERVER.get().is_some();

        if let Some(tx) = SHUTDOWN_TX.get() {
            let _ = tx.send(());
        }

        if let Some(server) = SERVER.get() {
            crate::log!("serve"; "shutting down...");
            server.unblock();
        }

        if !registered {
            // Nothing to gracefully shut down yet
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the HTTP server for graceful shutdown.
pub fn register_server_for_shutdown(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

/// Register the watch orchestrator's shutdown channel.
pub fn register_shutdown_channel(tx: crossbeam::channel::Sender<()>) {
    let _ = SHUTDOWN_TX.set(tx);
}
