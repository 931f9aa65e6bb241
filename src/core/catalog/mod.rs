// src/core/catalog/mod.rs

//! The ordered set of playable clips exposed to clients.
//!
//! A `Catalog` is immutable once built. A refresh builds a complete new
//! generation with fresh ids `1..=N` and the deck swaps it in wholesale, so
//! handlers only ever observe a consistent snapshot.

use crate::core::timecode;
use serde::{Deserialize, Serialize};

pub mod source;
pub mod watch;

pub use source::{CatalogSource, ManifestSource, StaticSource};
pub use watch::CatalogWatcher;

/// A clip as delivered by a catalog source, before the server assigns an id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClipSpec {
    pub name: String,
    #[serde(default)]
    pub frames: u64,
    #[serde(default)]
    pub frame_rate: f64,
}

impl ClipSpec {
    pub fn new(name: impl Into<String>, frames: u64, frame_rate: f64) -> Self {
        Self {
            name: name.into(),
            frames,
            frame_rate,
        }
    }
}

/// One playable catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    /// Position-derived id, valid for the current catalog generation only.
    pub id: u32,
    pub name: String,
    pub frame_count: u64,
    pub frame_rate: f64,
}

impl Clip {
    /// The clip's duration as timecode at its own frame rate.
    pub fn duration_timecode(&self) -> String {
        timecode::format(
            i64::try_from(self.frame_count).unwrap_or(i64::MAX),
            timecode::nominal_rate(self.frame_rate),
        )
    }

    /// The `clips get` listing value: name, start timecode and duration.
    pub fn listing(&self) -> String {
        format!(
            "{} {} {}",
            self.name,
            timecode::format(0, timecode::nominal_rate(self.frame_rate)),
            self.duration_timecode()
        )
    }

    /// Duration in seconds, falling back to `default_rate` when the clip has no rate.
    pub fn duration_seconds(&self, default_rate: f64) -> f64 {
        let rate = if self.frame_rate > 0.0 {
            self.frame_rate
        } else {
            default_rate
        };
        if rate > 0.0 {
            self.frame_count as f64 / rate
        } else {
            0.0
        }
    }
}

/// Outcome of offering a new generation to the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Same length and names in the same order; the previous generation was kept.
    Unchanged,
    /// The new generation replaced the old one. Clients must resynchronize.
    Replaced,
}

/// An immutable, ordered catalog generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    clips: Vec<Clip>,
}

impl Catalog {
    /// Builds a generation, assigning ids `1..=N` in source order.
    pub fn from_specs(specs: impl IntoIterator<Item = ClipSpec>) -> Self {
        let clips = specs
            .into_iter()
            .zip(1u32..)
            .map(|(spec, id)| Clip {
                id,
                name: spec.name,
                frame_count: spec.frames,
                frame_rate: spec.frame_rate,
            })
            .collect();
        Self { clips }
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Index of the clip with `id`, if any.
    pub fn position(&self, id: u32) -> Option<usize> {
        self.clips.iter().position(|c| c.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.name == name)
    }

    /// True when `other` would be observable as a different catalog by clients:
    /// the lengths differ, or a name differs at any shared position.
    pub fn differs_from(&self, other: &Catalog) -> bool {
        self.len() != other.len()
            || self
                .clips
                .iter()
                .zip(other.clips.iter())
                .any(|(a, b)| a.name != b.name)
    }

    /// Resolves a `goto` target against this generation.
    /// `current` is the index of the currently selected clip, if any.
    pub fn resolve(&self, target: Navigation, current: Option<usize>) -> Option<&Clip> {
        match target {
            Navigation::Forward(count) => self.forward(current, count),
            Navigation::Backward(count) => self.backward(current, count),
            Navigation::Absolute(id) => self.absolute(id),
        }
    }

    fn forward(&self, current: Option<usize>, count: usize) -> Option<&Clip> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        match current {
            None if count >= 1 && len >= count => self.clips.get(count - 1),
            None => None,
            Some(index) => self.clips.get((index + count % len) % len),
        }
    }

    fn backward(&self, current: Option<usize>, count: usize) -> Option<&Clip> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        match current {
            None if len > count => self.clips.get(len - count - 1),
            None => None,
            Some(index) => self.clips.get((index + len - count % len) % len),
        }
    }

    /// The single clip with `id`. Zero or several matches both count as not found.
    fn absolute(&self, id: i64) -> Option<&Clip> {
        let mut matches = self.clips.iter().filter(|c| i64::from(c.id) == id);
        match (matches.next(), matches.next()) {
            (Some(clip), None) => Some(clip),
            _ => None,
        }
    }
}

/// A `goto` clip target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// `+n`: n clips forward, wrapping around the end.
    Forward(usize),
    /// `-n`: n clips backward, wrapping around the start.
    Backward(usize),
    /// A plain clip id.
    Absolute(i64),
}
