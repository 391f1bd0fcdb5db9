//! Signal handling, config reload and settings persistence.

use crate::config::ConfigLoader;
use crate::config::file::GuardConfig;
use crate::state::AppState;
use loginguard_core::MemoryStore;
use loginguard_core::store::file::write_snapshot;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Creates a future that completes when a shutdown signal is received.
///
/// Listens for SIGTERM and SIGINT (Ctrl+C).
pub async fn shutdown_signal() {
    let (mut sigterm, mut sigint) =
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!("Failed to install signal handlers, falling back to Ctrl+C: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
    }
}

/// Spawns a task that listens for SIGHUP and reloads the configuration.
///
/// Only the admin secret takes effect without a restart; changes to the
/// `[guard]` section are reported and otherwise ignored.
///
/// Returns a Notify that can be used to signal when shutdown is complete.
pub fn spawn_config_reload_handler(
    state: AppState,
    config_loader: Arc<ConfigLoader>,
    running_guard: GuardConfig,
) -> Arc<Notify> {
    let shutdown_notify = Arc::new(Notify::new());
    let shutdown_notify_clone = shutdown_notify.clone();

    tokio::spawn(async move {
        let mut sighup = match signal(SignalKind::hangup()) {
            Ok(sighup) => sighup,
            Err(e) => {
                tracing::error!("Failed to install SIGHUP handler, config reload disabled: {}", e);
                return;
            }
        };

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    tracing::info!("Received SIGHUP, reloading configuration");
                    match config_loader.reload() {
                        Ok(loaded_config) => {
                            state.update_admin(loaded_config.admin).await;
                            if loaded_config.guard != running_guard {
                                tracing::warn!(
                                    "The [guard] section changed; restart the server to apply it"
                                );
                            }
                            tracing::info!("Configuration reloaded successfully");
                        }
                        Err(e) => {
                            tracing::error!("Failed to reload configuration: {}", e);
                        }
                    }
                }
                _ = shutdown_notify_clone.notified() => {
                    tracing::debug!("Config reload handler shutting down");
                    break;
                }
            }
        }
    });

    shutdown_notify
}

/// Spawns a task that writes the store to `path` after every change.
///
/// Notifying the returned `Notify` makes the task flush once more and exit;
/// await the handle to know the final snapshot is on disk.
pub fn spawn_snapshot_writer(store: MemoryStore, path: PathBuf) -> (Arc<Notify>, JoinHandle<()>) {
    let shutdown_notify = Arc::new(Notify::new());
    let shutdown_notify_clone = shutdown_notify.clone();

    let handle = tokio::spawn(async move {
        let mut watcher = store.subscribe();
        let mut written = store.version();

        loop {
            tokio::select! {
                changed = watcher.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    written = persist(&store, &path, written).await;
                }
                _ = shutdown_notify_clone.notified() => {
                    tracing::debug!("Snapshot writer shutting down");
                    break;
                }
            }
        }
        persist(&store, &path, written).await;
    });

    (shutdown_notify, handle)
}

/// Write the store if it changed since version `written`. Returns the
/// version now on disk.
async fn persist(store: &MemoryStore, path: &Path, written: u64) -> u64 {
    let version = store.version();
    if version == written {
        return written;
    }
    let snapshot = store.snapshot().await;
    match write_snapshot(path, &snapshot).await {
        Ok(()) => {
            tracing::debug!(version, path = %path.display(), "Settings written");
            version
        }
        Err(e) => {
            tracing::error!(path = %path.display(), "Failed to write settings: {}", e);
            written
        }
    }
}
