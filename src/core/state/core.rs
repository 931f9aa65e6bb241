// src/core/state/core.rs

//! Defines the central `ServerState` struct, holding all shared server-wide state.

use super::client::*;
use super::deck::DeckState;
use crate::config::{CatalogSourceKind, Config};
use crate::core::DeckError;
use crate::core::adapter::PlaybackControl;
use crate::core::catalog::{
    Catalog, CatalogSource, ClipSpec, ManifestSource, Reconciliation, StaticSource,
};
use crate::core::feedback::{FeedbackReceiver, FeedbackSender, feedback_channel};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

/// Contains all initialized components required to spawn the server's background tasks.
/// This struct is created once during server initialization and then consumed by the spawner.
pub struct ServerInit {
    /// The fully initialized, shared server state.
    pub state: Arc<ServerState>,
    /// Receives settlements and telemetry from the engine adapter.
    pub feedback_rx: FeedbackReceiver,
    /// Where the catalog refresh task reads the clip list from.
    pub catalog_source: Arc<dyn CatalogSource>,
}

/// The central struct holding all shared, server-wide state.
///
/// Lock order: `deck` first, then any entry of `clients`. Nothing awaits while
/// the deck lock is held.
#[derive(Debug)]
pub struct ServerState {
    /// The configuration the server was started with.
    pub config: Arc<Config>,
    /// A map of all active client connections, keyed by a unique session ID.
    pub clients: ClientMap,
    /// The catalog, transport record and engine adapter.
    pub deck: Mutex<DeckState>,
}

impl ServerState {
    pub fn new(config: Arc<Config>, engine: Box<dyn PlaybackControl>) -> Self {
        let deck = DeckState::new(engine, config.engine.frame_rate);
        Self {
            config,
            clients: ClientMap::new(),
            deck: Mutex::new(deck),
        }
    }

    /// Builds the shared state and the channels the background tasks consume.
    ///
    /// `make_engine` receives the feedback sender the adapter must report through.
    pub fn initialize<F>(config: Config, make_engine: F) -> Result<ServerInit, DeckError>
    where
        F: FnOnce(&Config, FeedbackSender) -> Result<Box<dyn PlaybackControl>, DeckError>,
    {
        let (feedback_tx, feedback_rx) = feedback_channel();
        let engine = make_engine(&config, feedback_tx)?;

        let catalog_source: Arc<dyn CatalogSource> = match config.catalog.source {
            CatalogSourceKind::Static => Arc::new(StaticSource::new(config.catalog.clips.clone())),
            CatalogSourceKind::Manifest => {
                let path = config.catalog.manifest_path.clone().ok_or_else(|| {
                    DeckError::Internal("catalog.manifest_path is required".into())
                })?;
                Arc::new(ManifestSource::new(path))
            }
        };
        info!("Catalog source: {}.", catalog_source.describe());

        let state = Arc::new(Self::new(Arc::new(config), engine));
        Ok(ServerInit {
            state,
            feedback_rx,
            catalog_source,
        })
    }

    /// Offers a freshly fetched clip list to the deck.
    ///
    /// When the catalog actually changes every client is disconnected, since ids
    /// they hold refer to the previous generation. The swap and the disconnects
    /// happen under the deck lock so no command observes the new catalog on a
    /// stale connection.
    pub fn apply_catalog(&self, specs: Vec<ClipSpec>) -> Reconciliation {
        let mut deck = self.deck.lock();
        let outcome = deck.replace_catalog(Catalog::from_specs(specs));
        if outcome == Reconciliation::Replaced {
            let dropped = self.disconnect_all();
            if dropped > 0 {
                warn!("Catalog replaced; disconnected {dropped} client(s) to resynchronize.");
            }
        }
        outcome
    }

    /// Fetches from `source` and applies the result. A failed fetch keeps the current catalog.
    pub async fn refresh_catalog(&self, source: &dyn CatalogSource) -> Result<Reconciliation, DeckError> {
        let specs = source.fetch().await?;
        Ok(self.apply_catalog(specs))
    }

    /// Adds a connection to the client map with all notifications disabled.
    pub fn register_client(&self, session_id: u64, addr: SocketAddr) -> ClientChannels {
        let (push_tx, push_rx) = mpsc::channel(PUSH_QUEUE_CAPACITY);
        let (kill_tx, kill_rx) = broadcast::channel(1);
        self.clients.insert(
            session_id,
            ClientInfo {
                addr,
                session_id,
                created: Instant::now(),
                notifications: NotificationFlags::default(),
                push_tx,
                kill_tx,
            },
        );
        ClientChannels { push_rx, kill_rx }
    }

    /// Signals every connection task to close. Returns how many were signalled.
    pub fn disconnect_all(&self) -> usize {
        self.clients
            .iter()
            .filter(|entry| entry.value().kill_tx.send(()).is_ok())
            .count()
    }

    /// Updates the notification flags of one connection.
    pub fn set_notifications(&self, session_id: u64, flags: NotificationFlags) {
        if let Some(mut client) = self.clients.get_mut(&session_id) {
            client.notifications = flags;
        }
    }

    pub fn notifications(&self, session_id: u64) -> NotificationFlags {
        self.clients
            .get(&session_id)
            .map(|client| client.notifications)
            .unwrap_or_default()
    }
}
