// src/server/mod.rs

use crate::config::Config;
use anyhow::Result;
use std::future::Future;
use std::net::SocketAddr;
use tracing::error;

mod connection_loop;
mod context;
mod initialization;
mod spawner;

use context::ServerContext;

/// A fully initialized server that has bound its listener but not yet started
/// accepting connections.
pub struct Server {
    ctx: ServerContext,
}

impl Server {
    /// Initializes state, loads the catalog and binds the listener.
    pub async fn bind(config: Config) -> Result<Self> {
        let ctx = initialization::setup(config).await?;
        Ok(Self { ctx })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.ctx.listener.local_addr()?)
    }

    pub fn state(&self) -> std::sync::Arc<crate::core::state::ServerState> {
        self.ctx.state.clone()
    }

    /// Spawns the background tasks and serves clients until `shutdown` resolves.
    pub async fn run_until(mut self, shutdown: impl Future<Output = ()>) -> Result<()> {
        spawner::spawn_all(&mut self.ctx)?;
        connection_loop::run(self.ctx, shutdown).await;
        Ok(())
    }
}

/// The main server startup function, orchestrating all setup phases.
/// Runs until SIGINT or SIGTERM.
pub async fn run(config: Config) -> Result<()> {
    let server = Server::bind(config).await?;
    server.run_until(shutdown_signal()).await
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let (mut sigint, mut sigterm) = match (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) {
            (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
            (Err(e), _) | (_, Err(e)) => {
                error!("Failed to register signal handlers: {}. Falling back to Ctrl-C.", e);
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = sigint.recv() => tracing::info!("SIGINT received."),
            _ = sigterm.recv() => tracing::info!("SIGTERM received."),
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    }
}
