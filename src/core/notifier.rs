// src/core/notifier.rs

//! Fans unsolicited responses out to the connections subscribed to a category.

use crate::core::commands::slot::slot_info;
use crate::core::state::{DEFAULT_SLOT_ID, DeckState, NotificationCategory, ServerState};
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Pushes the current `category` snapshot to every subscribed connection.
///
/// Must be called with the deck lock held (the caller passes the guarded deck),
/// so the snapshot matches the state change that triggered it. Returns how many
/// connections the event was queued for.
pub fn notify(state: &ServerState, deck: &DeckState, category: NotificationCategory) -> usize {
    let response = match category {
        NotificationCategory::Transport => deck.transport_info().into_async(),
        NotificationCategory::Slot => {
            let slot_id = DEFAULT_SLOT_ID.to_string();
            slot_info(state, deck, Some(&slot_id), true).into_async()
        }
        NotificationCategory::Remote | NotificationCategory::Configuration => {
            let name: &'static str = category.into();
            debug!("No payload defined for {name} notifications; nothing sent.");
            return 0;
        }
    };

    let mut delivered = 0;
    for client in state.clients.iter() {
        if !client.notifications.is_enabled(category) {
            continue;
        }
        match client.push_tx.try_send(response.clone()) {
            Ok(()) => delivered += 1,
            Err(TrySendError::Full(_)) => warn!(
                "Push queue full for client {} ({}); dropping {} notification.",
                client.session_id, client.addr, response.code
            ),
            // The connection is shutting down; its guard removes the entry.
            Err(TrySendError::Closed(_)) => {}
        }
    }
    delivered
}
