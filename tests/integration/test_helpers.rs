// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests

#![allow(dead_code)]

use deckbridge::config::Config;
use deckbridge::core::adapter::{PlaybackControl, VideoFormat};
use deckbridge::core::catalog::{Clip, ClipSpec};
use deckbridge::core::commands::HandlerOutcome;
use deckbridge::core::feedback::FeedbackEvent;
use deckbridge::core::handler::Router;
use deckbridge::core::protocol::{Command, Response};
use deckbridge::core::state::{ClientChannels, ServerState};
use deckbridge::core::tasks::feedback::FeedbackTask;
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// A call the deck made on the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    SetSpeed(i32),
    SetLoop(bool),
    /// The id of the clip handed to `play`, if any.
    Play(Option<u32>),
    Stop,
    Load(String),
}

/// An engine that records every call and accepts or refuses them as configured.
/// It never produces feedback on its own; tests inject settlements explicitly.
#[derive(Clone)]
pub struct RecordingEngine {
    pub calls: Arc<Mutex<Vec<EngineCall>>>,
    pub accept_speed: bool,
    pub accept_loop: bool,
    pub accept_play: bool,
    pub accept_stop: bool,
    pub video_format: VideoFormat,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            accept_speed: true,
            accept_loop: true,
            accept_play: true,
            accept_stop: true,
            video_format: VideoFormat::Hd720p50,
        }
    }
}

impl RecordingEngine {
    pub fn refusing_everything() -> Self {
        Self {
            accept_speed: false,
            accept_loop: false,
            accept_play: false,
            accept_stop: false,
            ..Self::default()
        }
    }
}

impl PlaybackControl for RecordingEngine {
    fn video_format(&self) -> VideoFormat {
        self.video_format
    }

    fn set_speed(&mut self, speed: i32) -> bool {
        self.calls.lock().push(EngineCall::SetSpeed(speed));
        self.accept_speed
    }

    fn set_loop(&mut self, enabled: bool) -> bool {
        self.calls.lock().push(EngineCall::SetLoop(enabled));
        self.accept_loop
    }

    fn play(&mut self, current: Option<&Clip>) -> bool {
        self.calls.lock().push(EngineCall::Play(current.map(|c| c.id)));
        self.accept_play
    }

    fn stop(&mut self) -> bool {
        self.calls.lock().push(EngineCall::Stop);
        self.accept_stop
    }

    fn load(&mut self, clip: &Clip) {
        self.calls.lock().push(EngineCall::Load(clip.name.clone()));
    }
}

/// The catalog most tests start from.
pub fn default_clips() -> Vec<ClipSpec> {
    vec![
        ClipSpec::new("intro", 250, 25.0),
        ClipSpec::new("news", 1500, 50.0),
        ClipSpec::new("weather", 90_000, 29.97),
    ]
}

pub fn test_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 40000))
}

pub fn init_tracing() {
    // Initialize tracing (ignore error if already initialized)
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("warn"))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// TestContext provides a server state with a recording engine and one
/// registered client, and executes protocol lines as that client.
pub struct TestContext {
    pub state: Arc<ServerState>,
    pub engine: RecordingEngine,
    pub session_id: u64,
    pub channels: ClientChannels,
}

impl TestContext {
    /// A context with the default catalog loaded.
    pub fn new() -> Self {
        Self::with_engine(RecordingEngine::default(), default_clips())
    }

    pub fn with_clips(clips: Vec<ClipSpec>) -> Self {
        Self::with_engine(RecordingEngine::default(), clips)
    }

    pub fn with_engine(engine: RecordingEngine, clips: Vec<ClipSpec>) -> Self {
        Self::with_config(Config::default(), engine, clips)
    }

    pub fn with_config(config: Config, engine: RecordingEngine, clips: Vec<ClipSpec>) -> Self {
        init_tracing();
        let state = Arc::new(ServerState::new(
            Arc::new(config),
            Box::new(engine.clone()),
        ));
        state.apply_catalog(clips);
        let session_id = 1;
        let channels = state.register_client(session_id, test_addr());
        Self {
            state,
            engine,
            session_id,
            channels,
        }
    }

    /// Registers another client and returns its session id and channels.
    pub fn add_client(&self, session_id: u64) -> ClientChannels {
        self.state.register_client(session_id, test_addr())
    }

    /// Executes a protocol line as the context's own client.
    pub fn execute(&self, line: &str) -> HandlerOutcome {
        self.execute_as(self.session_id, line)
    }

    pub fn execute_as(&self, session_id: u64, line: &str) -> HandlerOutcome {
        Router::new(self.state.clone(), session_id, test_addr()).route(&Command::parse(line))
    }

    /// Executes a line and returns its reply, failing the test if there is none.
    pub fn reply(&self, line: &str) -> Response {
        match self.execute(line) {
            HandlerOutcome::Reply(response) => response,
            other => panic!("expected a reply to '{line}', got {other:?}"),
        }
    }

    /// Applies engine feedback the way the feedback task does.
    pub fn feed(&self, event: impl Into<FeedbackEvent>) -> usize {
        FeedbackTask::apply(&self.state, event.into())
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.engine.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.engine.calls.lock().clear();
    }

    /// The clip at `index` of the current catalog.
    pub fn clip(&self, index: usize) -> Clip {
        self.state.deck.lock().catalog().clips()[index].clone()
    }

    pub fn current_clip_id(&self) -> Option<u32> {
        self.state
            .deck
            .lock()
            .transport
            .current
            .as_ref()
            .map(|c| c.id)
    }

    /// Drains every queued push for the context's own client.
    pub fn drain_pushes(&mut self) -> Vec<Response> {
        let mut pushes = Vec::new();
        while let Ok(push) = self.channels.push_rx.try_recv() {
            pushes.push(push);
        }
        pushes
    }
}
