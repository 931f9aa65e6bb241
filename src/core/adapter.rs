// src/core/adapter.rs

//! The Playback Control Contract: the capability interface a playout engine
//! integration implements so the protocol server can drive it.
//!
//! Every method is fire-and-forget from the server's point of view. The return
//! value only says whether the request was accepted; the engine reports the
//! actual result later through a `FeedbackEvent` (see `core::feedback`).

use crate::core::catalog::Clip;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Transport phase as reported by `transport info`.
///
/// Only `Stopped` and `Play` are driven by the server; the other states exist so
/// an engine can report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum TransportStatus {
    Preview,
    #[default]
    Stopped,
    Play,
    Forward,
    Rewind,
    Jog,
    Shuttle,
    Record,
}

/// Video format labels understood by deck clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr, EnumIter)]
pub enum VideoFormat {
    #[strum(serialize = "NTSC")]
    Ntsc,
    #[strum(serialize = "PAL")]
    Pal,
    #[strum(serialize = "NTSCp")]
    NtscProgressive,
    #[strum(serialize = "PALp")]
    PalProgressive,
    #[strum(serialize = "720p50")]
    Hd720p50,
    #[strum(serialize = "720p5994")]
    Hd720p5994,
    #[strum(serialize = "720p60")]
    Hd720p60,
    #[strum(serialize = "1080p23976")]
    Hd1080p23976,
    #[strum(serialize = "1080p24")]
    Hd1080p24,
    #[strum(serialize = "1080p25")]
    Hd1080p25,
    #[strum(serialize = "1080p2997")]
    Hd1080p2997,
    #[strum(serialize = "1080p30")]
    Hd1080p30,
    #[strum(serialize = "1080i50")]
    Hd1080i50,
    #[strum(serialize = "1080i5994")]
    Hd1080i5994,
    #[strum(serialize = "1080i60")]
    Hd1080i60,
    #[strum(serialize = "4Kp23976")]
    Uhd4Kp23976,
    #[strum(serialize = "4Kp24")]
    Uhd4Kp24,
    #[strum(serialize = "4Kp25")]
    Uhd4Kp25,
    #[strum(serialize = "4Kp2997")]
    Uhd4Kp2997,
    #[strum(serialize = "4Kp30")]
    Uhd4Kp30,
    #[strum(serialize = "4Kp50")]
    Uhd4Kp50,
    #[strum(serialize = "4Kp5994")]
    Uhd4Kp5994,
    #[strum(serialize = "4Kp60")]
    Uhd4Kp60,
}

/// The capability interface an engine-specific adapter must implement.
///
/// Transport queries (status, current clip, position, speed, loop, frame rate)
/// are answered from the deck's `Transport` record, which the engine keeps up to
/// date through feedback events.
pub trait PlaybackControl: Send {
    /// The video format the engine's output channel runs at.
    fn video_format(&self) -> VideoFormat;

    /// Sets the playback speed in percent. Returns false if unsupported.
    fn set_speed(&mut self, speed: i32) -> bool;

    /// Enables or disables looping. Returns false if unsupported.
    fn set_loop(&mut self, enabled: bool) -> bool;

    /// Starts playback of whatever is loaded, or of `current` if the engine
    /// needs to be told what to play.
    fn play(&mut self, current: Option<&Clip>) -> bool;

    fn stop(&mut self) -> bool;

    /// Cues `clip`. Settles with `EngineOutcome::Loaded` or `LoadFailed`.
    fn load(&mut self, clip: &Clip);
}
