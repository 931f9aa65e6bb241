// src/core/feedback.rs

//! Events flowing from the playout engine back into the server: settlements of
//! earlier fire-and-forget engine calls, and raw telemetry.

use crate::core::catalog::Clip;
use tokio::sync::mpsc;

/// The result of an engine call that was accepted earlier.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    Loaded(Clip),
    LoadFailed { clip: Clip, reason: String },
    Played,
    PlayFailed(String),
    Stopped,
    StopFailed(String),
}

/// Telemetry reported by the engine independently of any request.
#[derive(Debug, Clone, PartialEq)]
pub enum Telemetry {
    /// The channel frame rate.
    FrameRate(f64),
    /// Playback position of the foreground item, in seconds.
    Position(f64),
    /// File name of the item now on air, usually with an extension.
    NowPlaying(String),
    /// The foreground producer became empty.
    ProducerEmpty,
    /// The foreground producer holds something.
    ProducerActive,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackEvent {
    Engine(EngineOutcome),
    Telemetry(Telemetry),
}

impl From<EngineOutcome> for FeedbackEvent {
    fn from(outcome: EngineOutcome) -> Self {
        FeedbackEvent::Engine(outcome)
    }
}

impl From<Telemetry> for FeedbackEvent {
    fn from(telemetry: Telemetry) -> Self {
        FeedbackEvent::Telemetry(telemetry)
    }
}

pub type FeedbackSender = mpsc::UnboundedSender<FeedbackEvent>;
pub type FeedbackReceiver = mpsc::UnboundedReceiver<FeedbackEvent>;

pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    mpsc::unbounded_channel()
}

/// Strips the extension from a reported file name (`intro.mov` -> `intro`).
/// Names without an extension are returned unchanged.
pub fn clip_name_from_file(file: &str) -> &str {
    match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    }
}
