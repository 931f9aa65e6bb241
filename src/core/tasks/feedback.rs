// src/core/tasks/feedback.rs

//! Applies engine feedback to the deck and notifies subscribers.

use crate::core::feedback::{FeedbackEvent, FeedbackReceiver};
use crate::core::notifier;
use crate::core::state::{NotificationCategory, ServerState};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

pub struct FeedbackTask {
    state: Arc<ServerState>,
    feedback_rx: FeedbackReceiver,
}

impl FeedbackTask {
    pub fn new(state: Arc<ServerState>, feedback_rx: FeedbackReceiver) -> Self {
        Self { state, feedback_rx }
    }

    /// Applies one event under the deck lock. Returns how many clients were notified.
    pub fn apply(state: &ServerState, event: FeedbackEvent) -> usize {
        let mut deck = state.deck.lock();
        match event {
            FeedbackEvent::Engine(outcome) => {
                deck.apply_engine(outcome);
                0
            }
            FeedbackEvent::Telemetry(telemetry) => {
                if deck.apply_telemetry(telemetry) {
                    notifier::notify(state, &deck, NotificationCategory::Transport)
                } else {
                    0
                }
            }
        }
    }

    pub async fn run(mut self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!("Engine feedback task started.");
        loop {
            tokio::select! {
                event = self.feedback_rx.recv() => {
                    let Some(event) = event else {
                        info!("Engine feedback channel closed.");
                        return;
                    };
                    let notified = Self::apply(&self.state, event);
                    if notified > 0 {
                        debug!("Transport change pushed to {notified} client(s).");
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Engine feedback task shutting down.");
                    return;
                }
            }
        }
    }
}
