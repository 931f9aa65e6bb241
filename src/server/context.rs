// src/server/context.rs

use crate::core::catalog::CatalogSource;
use crate::core::feedback::FeedbackReceiver;
use crate::core::state::ServerState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{Semaphore, broadcast};
use tokio::task::JoinSet;

/// Holds all the initialized state required to run the server's main loop.
pub struct ServerContext {
    pub state: Arc<ServerState>,
    pub listener: TcpListener,
    pub shutdown_tx: broadcast::Sender<()>,
    pub background_tasks: JoinSet<Result<(), anyhow::Error>>,
    /// Bounds the number of simultaneous clients to `max_clients`.
    pub connection_permits: Arc<Semaphore>,
    pub catalog_source: Arc<dyn CatalogSource>,
    /// Taken by the spawner when the feedback task starts.
    pub feedback_rx: Option<FeedbackReceiver>,
}
