// src/engine/simulated.rs

//! A self-contained playout engine that plays clips on a timer.
//!
//! It behaves like a remote engine as far as the server can tell: every call is
//! accepted immediately and its result arrives later on the feedback channel,
//! followed by position telemetry while a clip is running.

use crate::config::Config;
use crate::core::DeckError;
use crate::core::adapter::{PlaybackControl, VideoFormat};
use crate::core::catalog::Clip;
use crate::core::feedback::{EngineOutcome, FeedbackEvent, FeedbackSender, Telemetry};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// File extension the simulated engine reports for playing clips.
const MEDIA_EXTENSION: &str = "mov";

pub struct SimulatedEngine {
    feedback_tx: FeedbackSender,
    video_format: VideoFormat,
    load_enabled: bool,
    frame_rate: f64,
    tick_interval: Duration,
    loaded: Option<Clip>,
    /// Percent of normal speed; 0 plays at normal speed.
    speed: Arc<AtomicI32>,
    looping: Arc<AtomicBool>,
    playback: Option<CancellationToken>,
}

impl SimulatedEngine {
    pub fn new(
        feedback_tx: FeedbackSender,
        video_format: VideoFormat,
        load_enabled: bool,
        frame_rate: f64,
        tick_interval: Duration,
    ) -> Self {
        let engine = Self {
            feedback_tx,
            video_format,
            load_enabled,
            frame_rate,
            tick_interval,
            loaded: None,
            speed: Arc::new(AtomicI32::new(0)),
            looping: Arc::new(AtomicBool::new(false)),
            playback: None,
        };
        engine.emit(Telemetry::FrameRate(frame_rate));
        engine
    }

    /// Builds the engine from the `[engine]` and `[device]` sections.
    pub fn from_config(config: &Config, feedback_tx: FeedbackSender) -> Result<Self, DeckError> {
        let video_format = config
            .video_format()
            .map_err(|e| DeckError::Engine(e.to_string()))?;
        Ok(Self::new(
            feedback_tx,
            video_format,
            config.engine.load_enabled,
            config.engine.frame_rate,
            config.engine.tick_interval,
        ))
    }

    pub fn is_playing(&self) -> bool {
        self.playback.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    fn emit(&self, event: impl Into<FeedbackEvent>) {
        if self.feedback_tx.send(event.into()).is_err() {
            debug!("Feedback receiver dropped; event discarded.");
        }
    }

    fn cancel_playback(&mut self) {
        if let Some(token) = self.playback.take() {
            token.cancel();
        }
    }

    /// Spawns the task that advances the play head of `clip`.
    fn start_playback(&mut self, clip: Clip, handle: &Handle) {
        self.cancel_playback();
        let token = CancellationToken::new();
        let playhead = Playhead {
            feedback_tx: self.feedback_tx.clone(),
            duration: clip.duration_seconds(self.frame_rate),
            file: format!("{}.{MEDIA_EXTENSION}", clip.name),
            tick_interval: self.tick_interval,
            speed: self.speed.clone(),
            looping: self.looping.clone(),
        };
        handle.spawn(playhead.run(token.clone()));
        self.playback = Some(token);
    }
}

impl Drop for SimulatedEngine {
    fn drop(&mut self) {
        self.cancel_playback();
    }
}

impl PlaybackControl for SimulatedEngine {
    fn video_format(&self) -> VideoFormat {
        self.video_format
    }

    fn set_speed(&mut self, speed: i32) -> bool {
        self.speed.store(speed, Ordering::Relaxed);
        true
    }

    fn set_loop(&mut self, enabled: bool) -> bool {
        self.looping.store(enabled, Ordering::Relaxed);
        true
    }

    fn play(&mut self, current: Option<&Clip>) -> bool {
        let Some(clip) = self.loaded.clone().or_else(|| current.cloned()) else {
            self.emit(EngineOutcome::PlayFailed("no clip is loaded".into()));
            return true;
        };
        let Ok(handle) = Handle::try_current() else {
            warn!("Simulated engine cannot play outside a Tokio runtime.");
            return false;
        };
        if !self.is_playing() {
            self.start_playback(clip, &handle);
        }
        self.emit(EngineOutcome::Played);
        true
    }

    fn stop(&mut self) -> bool {
        self.cancel_playback();
        self.emit(EngineOutcome::Stopped);
        true
    }

    fn load(&mut self, clip: &Clip) {
        if !self.load_enabled {
            info!("LOAD command disabled by configuration.");
            return;
        }
        if clip.frame_count == 0 {
            self.emit(EngineOutcome::LoadFailed {
                clip: clip.clone(),
                reason: "clip has no frames".into(),
            });
            return;
        }
        self.cancel_playback();
        self.loaded = Some(clip.clone());
        self.emit(EngineOutcome::Loaded(clip.clone()));
    }
}

/// The running half of a playback, owned by its timer task.
struct Playhead {
    feedback_tx: FeedbackSender,
    duration: f64,
    file: String,
    tick_interval: Duration,
    speed: Arc<AtomicI32>,
    looping: Arc<AtomicBool>,
}

impl Playhead {
    fn emit(&self, event: impl Into<FeedbackEvent>) -> bool {
        self.feedback_tx.send(event.into()).is_ok()
    }

    async fn run(self, cancel: CancellationToken) {
        debug!("Simulated playback of '{}' started.", self.file);
        self.emit(Telemetry::NowPlaying(self.file.clone()));
        self.emit(Telemetry::ProducerActive);

        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        ticker.tick().await;

        let mut position = 0.0_f64;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Simulated playback of '{}' cancelled.", self.file);
                    return;
                }
                _ = ticker.tick() => {
                    position += self.tick_interval.as_secs_f64() * self.rate();
                    if position < 0.0 {
                        position = 0.0;
                    }
                    if position >= self.duration {
                        if self.looping.load(Ordering::Relaxed) && self.duration > 0.0 {
                            position %= self.duration;
                        } else {
                            self.emit(Telemetry::Position(self.duration));
                            self.emit(Telemetry::ProducerEmpty);
                            debug!("Simulated playback of '{}' reached the end.", self.file);
                            cancel.cancel();
                            return;
                        }
                    }
                    if !self.emit(Telemetry::Position(position)) {
                        return;
                    }
                }
            }
        }
    }

    fn rate(&self) -> f64 {
        match self.speed.load(Ordering::Relaxed) {
            0 => 1.0,
            percent => f64::from(percent) / 100.0,
        }
    }
}
