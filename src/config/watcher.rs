//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::store::RouterStore;
use crate::observability::metrics;
use crate::routing::Router;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<Router>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for rebuilt routers.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Router>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Rebuild the router from disk and queue it for publication.
    /// A file that fails to load is logged and dropped.
    pub fn reload(&self) {
        reload_into(&self.path, &self.update_tx);
    }

    /// Start watching the file. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Config file change detected, reloading...");
                        reload_into(&path, &tx);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

fn reload_into(path: &Path, tx: &mpsc::UnboundedSender<Router>) {
    match load_config(path) {
        Ok(router) => {
            let _ = tx.send(router);
        }
        Err(e) => {
            metrics::record_reload(false);
            tracing::error!(
                "Failed to reload config: {}. Keeping current configuration.",
                e
            );
        }
    }
}

/// Publish every rebuilt router into `store` until the sender side closes.
pub async fn apply_updates(store: Arc<RouterStore>, mut updates: mpsc::UnboundedReceiver<Router>) {
    while let Some(router) = updates.recv().await {
        store.replace(router);
        metrics::record_reload(true);
    }
    tracing::debug!("Config update channel closed");
}
