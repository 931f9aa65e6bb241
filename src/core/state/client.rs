// src/core/state/client.rs

//! Contains state definitions related to client connections.

use crate::core::protocol::Response;
use dashmap::DashMap;
use std::net::SocketAddr;
use std::time::Instant;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};
use tokio::sync::{broadcast, mpsc};

/// Signals a connection task to close its socket.
pub type ShutdownSender = broadcast::Sender<()>;
/// Delivers unsolicited responses to a connection task.
pub type PushSender = mpsc::Sender<Response>;
pub type ClientMap = DashMap<u64, ClientInfo>;

/// Capacity of each connection's push queue. A client that falls this far
/// behind starts missing notifications.
pub const PUSH_QUEUE_CAPACITY: usize = 64;

/// A notification category a connection can subscribe to with `notify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationCategory {
    Transport,
    Slot,
    Remote,
    Configuration,
}

/// Per-connection opt-in flags. All categories start disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationFlags {
    pub transport: bool,
    pub slot: bool,
    pub remote: bool,
    pub configuration: bool,
}

impl NotificationFlags {
    pub fn is_enabled(&self, category: NotificationCategory) -> bool {
        match category {
            NotificationCategory::Transport => self.transport,
            NotificationCategory::Slot => self.slot,
            NotificationCategory::Remote => self.remote,
            NotificationCategory::Configuration => self.configuration,
        }
    }

    pub fn set(&mut self, category: NotificationCategory, enabled: bool) {
        match category {
            NotificationCategory::Transport => self.transport = enabled,
            NotificationCategory::Slot => self.slot = enabled,
            NotificationCategory::Remote => self.remote = enabled,
            NotificationCategory::Configuration => self.configuration = enabled,
        }
    }
}

/// Everything the server tracks about one connected client.
#[derive(Debug)]
pub struct ClientInfo {
    pub addr: SocketAddr,
    pub session_id: u64,
    pub created: Instant,
    pub notifications: NotificationFlags,
    pub push_tx: PushSender,
    pub kill_tx: ShutdownSender,
}

/// The receiving halves handed to a connection task when it registers.
#[derive(Debug)]
pub struct ClientChannels {
    pub push_rx: mpsc::Receiver<Response>,
    pub kill_rx: broadcast::Receiver<()>,
}
