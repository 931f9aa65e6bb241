// src/core/tasks/catalog_refresh.rs

//! A background task that re-reads the catalog and reconciles it with the one
//! clients currently see. It runs on a fixed interval, and immediately whenever
//! a watched source file changes.

use crate::core::catalog::{CatalogSource, CatalogWatcher, Reconciliation};
use crate::core::state::ServerState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub struct CatalogRefreshTask {
    state: Arc<ServerState>,
    source: Arc<dyn CatalogSource>,
    interval: Duration,
}

impl CatalogRefreshTask {
    pub fn new(state: Arc<ServerState>, source: Arc<dyn CatalogSource>) -> Self {
        let interval = state.config.catalog.refresh_interval;
        Self {
            state,
            source,
            interval,
        }
    }

    /// Runs one refresh cycle. The fetch happens outside the deck lock; a
    /// failed fetch leaves the current catalog in place.
    pub async fn refresh_once(&self) -> Option<Reconciliation> {
        match self.state.refresh_catalog(self.source.as_ref()).await {
            Ok(outcome) => {
                debug!("Catalog refresh from {}: {:?}.", self.source.describe(), outcome);
                Some(outcome)
            }
            Err(e) => {
                warn!(
                    "Catalog refresh from {} failed, keeping the current catalog: {}",
                    self.source.describe(),
                    e
                );
                None
            }
        }
    }

    /// The main run loop. The first periodic cycle runs one interval after
    /// startup, since the server loads the catalog once before accepting clients.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!(
            "Catalog refresh task started (every {:?}).",
            self.interval
        );
        let start = tokio::time::Instant::now() + self.interval;
        let mut interval = tokio::time::interval_at(start, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut watcher = self.start_watcher();

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.refresh_once().await;
                }
                changed = next_change(&mut watcher) => match changed {
                    Some(()) => {
                        debug!("{} changed on disk.", self.source.describe());
                        self.refresh_once().await;
                    }
                    None => {
                        warn!("Catalog file watcher stopped; relying on periodic refresh.");
                        watcher = None;
                    }
                },
                _ = shutdown_rx.recv() => {
                    info!("Catalog refresh task shutting down.");
                    return;
                }
            }
        }
    }

    fn start_watcher(&self) -> Option<CatalogWatcher> {
        let path = self.source.watch_path()?;
        match CatalogWatcher::new(path) {
            Ok(watcher) => {
                info!("Watching '{}' for catalog changes.", path.display());
                Some(watcher)
            }
            Err(e) => {
                warn!(
                    "Cannot watch '{}', relying on periodic refresh: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }
}

/// Resolves on the next watched change. Never resolves without a watcher.
async fn next_change(watcher: &mut Option<CatalogWatcher>) -> Option<()> {
    match watcher {
        Some(watcher) => watcher.changed().await,
        None => std::future::pending().await,
    }
}
