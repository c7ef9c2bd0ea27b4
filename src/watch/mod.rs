//! Watch orchestrator.
//!
//! Wires one change watcher per target (document, template, configuration)
//! to debounced pipeline re-runs and preview reload broadcasts:
//!
//! ```text
//! notify event → debounce → config reload → regenerate → write → broadcast
//! ```
//!
//! Each target moves Idle → Scheduled → Running → Idle independently; a
//! failed run reports the error and returns to Idle without taking down the
//! watch loop. An interrupt signal is the only terminal transition.

mod debounce;


pub use debounce::{Debounce, QUIET_MS};

use crate::cli::build::{self, BuildOptions};
use crate::config::{self, Config};
use crate::serve::Preview;
use crate::{core, debug, log, logger};
use anyhow::{Context, Result};
use crossbeam::channel::{Receiver, Sender, unbounded};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Poll interval while every debounce is idle.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// One watched resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Document,
    Template,
    Config,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Config, Target::Document, Target::Template];

    pub fn label(self) -> &'static str {
        match self {
            Target::Document => "document",
            Target::Template => "template",
            Target::Config => "config",
        }
    }

    fn index(self) -> usize {
        match self {
            Target::Document => 0,
            Target::Template => 1,
            Target::Config => 2,
        }
    }
}

/// Parameters for one watch session.
pub struct WatchOptions {
    pub input: PathBuf,
    pub port: Option<u16>,
    pub no_server: bool,
    pub build: BuildOptions,
}

/// Run watch mode until interrupted.
///
/// Builds once up front, starts the preview server (unless disabled), then
/// loops on debounced change events. The document watch is mandatory; the
/// template and configuration watches are best-effort.
pub fn run(options: WatchOptions) -> Result<()> {
    let cfg = config::cfg();

    // Initial build. A failure is reported but does not abort: the point of
    // watch mode is to keep going while the author fixes the file.
    match build::generate(&options.input, &cfg, &options.build) {
        Ok(output) => log!("watch"; "generated {}", output.display()),
        Err(e) => logger::status_error("initial build failed", &format!("{e:#}")),
    }

    let preview = if options.no_server {
        None
    } else {
        Some(crate::serve::start(&cfg, options.port)?)
    };

    let (tx, rx) = unbounded::<Target>();
    let (shutdown_tx, shutdown_rx) = unbounded::<()>();
    core::register_shutdown_channel(shutdown_tx);

    // Watcher handles must stay alive for the whole session.
    let _watchers = setup_watchers(&options.input, &cfg, &tx)?;

    log!("watch"; "watching {} (Ctrl+C to stop)", options.input.display());
    event_loop(&rx, &shutdown_rx, &options, preview.as_ref());

    log!("watch"; "shutting down");
    Ok(())
}

/// Attach one watcher per target. The document watch is required; template
/// and configuration watches degrade to a warning when they cannot be
/// established (e.g. the path does not exist yet).
fn setup_watchers(
    input: &Path,
    cfg: &Config,
    tx: &Sender<Target>,
) -> Result<Vec<RecommendedWatcher>> {
    let mut watchers = Vec::with_capacity(3);

    // Editors often save via rename-and-replace, so watch the parent
    // directory and filter on the file name instead of watching the file
    // inode directly.
    let document_dir = parent_dir(input);
    let watcher = watch_path(
        &document_dir,
        RecursiveMode::NonRecursive,
        Target::Document,
        Some(input.to_path_buf()),
        tx.clone(),
    )
    .with_context(|| format!("failed to watch document {}", input.display()))?;
    watchers.push(watcher);

    let template_dir = cfg.paths.template_dir();
    match watch_path(
        &template_dir,
        RecursiveMode::Recursive,
        Target::Template,
        None,
        tx.clone(),
    ) {
        Ok(watcher) => watchers.push(watcher),
        Err(e) => {
            logger::status_warning(&format!(
                "template watch unavailable for {}: {e}",
                template_dir.display()
            ));
        }
    }

    let config_path = &cfg.config_path;
    match watch_path(
        &parent_dir(config_path),
        RecursiveMode::NonRecursive,
        Target::Config,
        Some(config_path.clone()),
        tx.clone(),
    ) {
        Ok(watcher) => watchers.push(watcher),
        Err(e) => {
            logger::status_warning(&format!(
                "config watch unavailable for {}: {e}",
                config_path.display()
            ));
        }
    }

    Ok(watchers)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Attach a single notify watcher that forwards relevant events as `target`.
fn watch_path(
    path: &Path,
    mode: RecursiveMode,
    target: Target,
    only_file: Option<PathBuf>,
    tx: Sender<Target>,
) -> notify::Result<RecommendedWatcher> {
    let only_name = only_file.and_then(|p| p.file_name().map(std::ffi::OsString::from));

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) => {
                if !is_content_change(&event) {
                    return;
                }
                if let Some(name) = &only_name
                    && !event.paths.iter().any(|p| p.file_name() == Some(name))
                {
                    return;
                }
                let _ = tx.send(target);
            }
            Err(e) => crate::log!("watch"; "notify error: {}", e),
        }
    })?;

    watcher.watch(path, mode)?;
    Ok(watcher)
}

/// True for events that can change file content. Metadata-only touches
/// (permissions, atime) would otherwise trigger spurious rebuilds.
fn is_content_change(event: &notify::Event) -> bool {
    match &event.kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(modify) => !matches!(modify, notify::event::ModifyKind::Metadata(_)),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => false,
    }
}

/// Main loop: collect events into per-target debounces, fire due targets.
fn event_loop(
    rx: &Receiver<Target>,
    shutdown_rx: &Receiver<()>,
    options: &WatchOptions,
    preview: Option<&Preview>,
) {
    let mut debounces = [Debounce::new(), Debounce::new(), Debounce::new()];

    loop {
        let timeout = next_deadline(&debounces, Instant::now()).unwrap_or(IDLE_POLL);

        crossbeam::select! {
            recv(rx) -> msg => match msg {
                Ok(target) => {
                    debug!("watch"; "{} changed", target.label());
                    debounces[target.index()].note_event(Instant::now());
                }
                Err(_) => break,
            },
            recv(shutdown_rx) -> _ => break,
            default(timeout) => {}
        }

        if core::is_shutdown() {
            break;
        }

        let now = Instant::now();
        for target in Target::ALL {
            if debounces[target.index()].fire_if_due(now) {
                handle_fire(target, options, preview);
            }
        }
    }
}

/// Shortest time until any armed debounce is due.
fn next_deadline(debounces: &[Debounce; 3], now: Instant) -> Option<Duration> {
    debounces
        .iter()
        .filter_map(|d| d.time_until_due(now))
        .min()
}

/// One Running transition for a fired target.
///
/// Configuration is reloaded on every fire, even for document-only changes,
/// since it may have changed paths or rules since the last run. A config
/// fire by itself reloads and logs but does not re-run the pipeline.
fn handle_fire(target: Target, options: &WatchOptions, preview: Option<&Preview>) {
    match config::reload_config() {
        Ok(true) => log!("watch"; "configuration reloaded"),
        Ok(false) => {}
        Err(e) => logger::status_error("failed to reload configuration", &format!("{e:#}")),
    }

    if target == Target::Config {
        logger::status_success("configuration change applies on the next rebuild");
        return;
    }

    let cfg = config::cfg();
    match build::generate(&options.input, &cfg, &options.build) {
        Ok(output) => {
            if let Some(preview) = preview {
                preview
                    .clients
                    .broadcast_reload(&format!("{} changed", target.label()));
            }
            logger::status_success(&format!(
                "{} changed, regenerated {}",
                target.label(),
                output.display()
            ));
        }
        Err(e) => {
            logger::status_error(
                &format!("rebuild failed after {} change", target.label()),
                &format!("{e:#}"),
            );
        }
    }
}
