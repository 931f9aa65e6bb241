// src/server/initialization.rs

//! Handles the complete server initialization process, from state setup to
//! the first catalog load and binding the listener.

use super::context::ServerContext;
use crate::config::Config;
use crate::core::adapter::PlaybackControl;
use crate::core::state::ServerState;
use crate::engine::SimulatedEngine;
use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{Semaphore, broadcast};
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Initializes all server components before starting the main loop.
pub async fn setup(config: Config) -> Result<ServerContext> {
    log_startup_info(&config);
    let (shutdown_tx, _) = broadcast::channel(1);

    let server_init = ServerState::initialize(config, |config, feedback_tx| {
        let engine = SimulatedEngine::from_config(config, feedback_tx)?;
        Ok(Box::new(engine) as Box<dyn PlaybackControl>)
    })?;
    let state = server_init.state;
    info!("Server state initialized.");

    match state.refresh_catalog(server_init.catalog_source.as_ref()).await {
        Ok(_) => info!(
            "Initial catalog loaded: {} clips.",
            state.deck.lock().catalog().len()
        ),
        Err(e) => warn!("Initial catalog load failed, starting with an empty catalog: {e}"),
    }

    let listener = TcpListener::bind((state.config.host.as_str(), state.config.port)).await?;
    info!(
        "Deck server listening on {}",
        listener.local_addr()?
    );
    let connection_permits = Arc::new(Semaphore::new(state.config.max_clients));

    Ok(ServerContext {
        state,
        listener,
        shutdown_tx,
        background_tasks: JoinSet::new(),
        connection_permits,
        catalog_source: server_init.catalog_source,
        feedback_rx: Some(server_init.feedback_rx),
    })
}

fn log_startup_info(config: &Config) {
    info!("Starting deckbridge v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Device: model '{}', unique id '{}', protocol {}, video format {}.",
        config.device.model,
        config.device.unique_id,
        config.device.protocol_version,
        config.device.video_format
    );
    if !config.engine.load_enabled {
        warn!("Clip loading is disabled by configuration; goto will not change the on-air clip.");
    }
}
