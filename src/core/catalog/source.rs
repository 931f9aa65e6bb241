// src/core/catalog/source.rs

//! Catalog sources deliver the complete, ordered clip list on every refresh cycle.

use super::ClipSpec;
use crate::core::DeckError;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Something that can produce the full clip list of the playout engine.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Returns the complete replacement list, in display order.
    async fn fetch(&self) -> Result<Vec<ClipSpec>, DeckError>;

    /// A short description for logging.
    fn describe(&self) -> String;

    /// A file whose changes should trigger an immediate refresh, if any.
    fn watch_path(&self) -> Option<&Path> {
        None
    }
}

/// A fixed list, typically taken from the configuration file.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    clips: Vec<ClipSpec>,
}

impl StaticSource {
    pub fn new(clips: Vec<ClipSpec>) -> Self {
        Self { clips }
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<ClipSpec>, DeckError> {
        Ok(self.clips.clone())
    }

    fn describe(&self) -> String {
        format!("static list ({} clips)", self.clips.len())
    }
}

/// The on-disk manifest layout: `{ "clips": [ { "name": ..., "frames": ..., "frame_rate": ... } ] }`.
#[derive(Deserialize)]
struct Manifest {
    #[serde(default)]
    clips: Vec<ClipSpec>,
}

/// A JSON manifest file that is re-read on every refresh, so edits to it reach
/// clients through the normal reconciliation path. The refresh task also
/// watches the file and refreshes as soon as it changes.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for ManifestSource {
    async fn fetch(&self) -> Result<Vec<ClipSpec>, DeckError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DeckError::CatalogSource(format!(
                "failed to read manifest '{}': {e}",
                self.path.display()
            ))
        })?;
        let manifest: Manifest = serde_json::from_str(&contents)?;
        debug!(
            "Read {} clips from manifest '{}'.",
            manifest.clips.len(),
            self.path.display()
        );
        Ok(manifest.clips)
    }

    fn describe(&self) -> String {
        format!("manifest file '{}'", self.path.display())
    }

    fn watch_path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}
