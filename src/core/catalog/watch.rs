// src/core/catalog/watch.rs

//! Turns filesystem events on a catalog file into refresh triggers.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

/// Events arriving within this window after the first one collapse into a single trigger.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Watches a single catalog file for changes.
pub struct CatalogWatcher {
    // Event delivery stops when the watcher is dropped.
    _watcher: RecommendedWatcher,
    events_rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    file_name: OsString,
}

impl CatalogWatcher {
    /// Watches the directory containing `path`, so a file replaced by rename
    /// is noticed as well as one written in place.
    pub fn new(path: &Path) -> notify::Result<Self> {
        let file_name = path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| notify::Error::generic("catalog path has no file name"))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = events_tx.send(res);
        })?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            events_rx,
            file_name,
        })
    }

    /// Waits until the file changes. Returns `None` once the watcher has stopped.
    pub async fn changed(&mut self) -> Option<()> {
        loop {
            match self.events_rx.recv().await? {
                Ok(event) if self.concerns_file(&event) => break,
                Ok(_) => {}
                Err(e) => warn!("Catalog file watcher error: {}", e),
            }
        }

        tokio::time::sleep(DEBOUNCE).await;
        while self.events_rx.try_recv().is_ok() {}
        Some(())
    }

    fn concerns_file(&self, event: &Event) -> bool {
        !matches!(event.kind, EventKind::Access(_))
            && event
                .paths
                .iter()
                .any(|p| p.file_name() == Some(self.file_name.as_os_str()))
    }
}
