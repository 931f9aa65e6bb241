// src/core/state/deck.rs

//! The deck: the catalog generation, the transport record and the engine adapter.
//!
//! All access goes through the `ServerState::deck` mutex. Every event source
//! (client commands, catalog refreshes, engine feedback) runs its handler to
//! completion while holding it, which gives the same ordering as a single
//! control thread.

use crate::core::adapter::{PlaybackControl, TransportStatus, VideoFormat};
use crate::core::catalog::{Catalog, Clip, Navigation, Reconciliation};
use crate::core::feedback::{EngineOutcome, Telemetry, clip_name_from_file};
use crate::core::protocol::{Response, ResponseCode};
use crate::core::timecode;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The only slot this deck exposes.
pub const DEFAULT_SLOT_ID: u32 = 1;

/// What the deck currently believes the engine is doing.
#[derive(Debug, Clone, PartialEq)]
pub struct Transport {
    pub status: TransportStatus,
    pub current: Option<Clip>,
    pub position_seconds: f64,
    pub speed: i32,
    pub looping: bool,
    pub frame_rate: f64,
}

impl Transport {
    pub fn new(frame_rate: f64) -> Self {
        Self {
            status: TransportStatus::Stopped,
            current: None,
            position_seconds: 0.0,
            speed: 0,
            looping: false,
            frame_rate,
        }
    }

    pub fn timecode(&self) -> String {
        timecode::format_seconds(self.position_seconds, self.frame_rate)
    }
}

pub struct DeckState {
    catalog: Arc<Catalog>,
    pub transport: Transport,
    /// The active slot. Clip queries report nothing for any other slot.
    pub slot_id: u32,
    engine: Box<dyn PlaybackControl>,
}

impl std::fmt::Debug for DeckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckState")
            .field("catalog_len", &self.catalog.len())
            .field("transport", &self.transport)
            .field("slot_id", &self.slot_id)
            .finish_non_exhaustive()
    }
}

impl DeckState {
    pub fn new(engine: Box<dyn PlaybackControl>, frame_rate: f64) -> Self {
        Self {
            catalog: Arc::new(Catalog::default()),
            transport: Transport::new(frame_rate),
            slot_id: DEFAULT_SLOT_ID,
            engine,
        }
    }

    /// The current catalog generation.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn video_format(&self) -> VideoFormat {
        self.engine.video_format()
    }

    /// Index of the current clip within the current generation.
    pub fn current_index(&self) -> Option<usize> {
        self.transport
            .current
            .as_ref()
            .and_then(|clip| self.catalog.position(clip.id))
    }

    /// Resolves `target` and asks the engine to load it.
    ///
    /// The current clip is not changed here; it follows once the engine reports
    /// `EngineOutcome::Loaded`. Returns the clip that was requested.
    pub fn navigate(&mut self, target: Navigation) -> Option<Clip> {
        let clip = self
            .catalog
            .resolve(target, self.current_index())?
            .clone();
        debug!("Navigating to clip {} '{}'.", clip.id, clip.name);
        self.engine.load(&clip);
        Some(clip)
    }

    pub fn play(&mut self) -> bool {
        let current = self.transport.current.clone();
        self.engine.play(current.as_ref())
    }

    pub fn stop(&mut self) -> bool {
        self.engine.stop()
    }

    pub fn set_speed(&mut self, speed: i32) -> bool {
        let accepted = self.engine.set_speed(speed);
        if accepted {
            self.transport.speed = speed;
        }
        accepted
    }

    pub fn set_loop(&mut self, enabled: bool) -> bool {
        let accepted = self.engine.set_loop(enabled);
        if accepted {
            self.transport.looping = enabled;
        }
        accepted
    }

    /// Offers a freshly built generation.
    ///
    /// An equivalent generation (same length, same names in the same order) is
    /// discarded so ids do not churn. Otherwise it replaces the current one and
    /// the current clip is looked up again by name.
    pub fn replace_catalog(&mut self, next: Catalog) -> Reconciliation {
        if !self.catalog.differs_from(&next) {
            return Reconciliation::Unchanged;
        }

        info!(
            "Catalog changed: {} -> {} clips.",
            self.catalog.len(),
            next.len()
        );
        self.transport.current = self
            .transport
            .current
            .take()
            .and_then(|clip| next.find_by_name(&clip.name).cloned());
        self.catalog = Arc::new(next);
        Reconciliation::Replaced
    }

    /// Applies the settlement of an earlier engine call.
    pub fn apply_engine(&mut self, outcome: EngineOutcome) {
        match outcome {
            EngineOutcome::Loaded(clip) => match self.settled_clip(&clip) {
                Some(found) => self.transport.current = Some(found),
                None => warn!(
                    "Loaded clip '{}' is no longer in the catalog; keeping the previous selection.",
                    clip.name
                ),
            },
            EngineOutcome::LoadFailed { clip, reason } => {
                warn!("Engine failed to load clip '{}': {}", clip.name, reason);
            }
            EngineOutcome::Played => self.transport.status = TransportStatus::Play,
            EngineOutcome::PlayFailed(reason) => warn!("Engine failed to play: {}", reason),
            EngineOutcome::Stopped => {
                self.transport.status = TransportStatus::Stopped;
                self.transport.position_seconds = 0.0;
            }
            EngineOutcome::StopFailed(reason) => warn!("Engine failed to stop: {}", reason),
        }
    }

    /// Finds the entry a load settlement refers to. The id wins while it still
    /// names the same clip; after a catalog swap only the name is meaningful.
    fn settled_clip(&self, clip: &Clip) -> Option<Clip> {
        self.catalog
            .position(clip.id)
            .map(|index| &self.catalog.clips()[index])
            .filter(|entry| entry.name == clip.name)
            .or_else(|| self.catalog.find_by_name(&clip.name))
            .cloned()
    }

    /// Applies engine telemetry. Returns true when transport subscribers must be notified.
    pub fn apply_telemetry(&mut self, telemetry: Telemetry) -> bool {
        match telemetry {
            Telemetry::FrameRate(rate) => {
                if rate.is_finite() && rate > 0.0 {
                    self.transport.frame_rate = rate;
                }
                false
            }
            Telemetry::Position(seconds) => {
                // Only whole-second changes are recorded and announced.
                if seconds.is_finite()
                    && self.transport.position_seconds.floor() != seconds.floor()
                {
                    self.transport.position_seconds = seconds;
                    true
                } else {
                    false
                }
            }
            Telemetry::NowPlaying(file) => {
                let name = clip_name_from_file(&file);
                // With duplicate names the selected entry already matches.
                if self.transport.current.as_ref().is_some_and(|c| c.name == name) {
                    return false;
                }
                let Some(clip) = self.catalog.find_by_name(name) else {
                    return false;
                };
                if self.transport.current.as_ref().map(|c| c.id) == Some(clip.id) {
                    return false;
                }
                self.transport.current = Some(clip.clone());
                true
            }
            Telemetry::ProducerEmpty => {
                self.transport.status = TransportStatus::Stopped;
                self.transport.current = None;
                false
            }
            Telemetry::ProducerActive => {
                if self.transport.position_seconds > 0.0 {
                    self.transport.status = TransportStatus::Play;
                }
                false
            }
        }
    }

    /// The `transport info` body (code 208).
    pub fn transport_info(&self) -> Response {
        let timecode = self.transport.timecode();
        let clip_id = self.transport.current.as_ref().map_or(0, |c| c.id);
        let status: &'static str = self.transport.status.into();
        let format: &'static str = self.video_format().into();

        Response::with_fields(ResponseCode::TransportInfo)
            .field("status", status)
            .field("speed", self.transport.speed.to_string())
            .field("slot id", self.slot_id.to_string())
            .field("display timecode", timecode.clone())
            .field("timecode", timecode)
            .field("clip id", clip_id.to_string())
            .field("video format", format)
            .field("loop", self.transport.looping.to_string())
    }
}
