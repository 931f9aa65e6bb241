// src/server/connection_loop.rs

//! Contains the main server loop for accepting connections and handling graceful shutdown.

use super::context::ServerContext;
use crate::connection::ConnectionHandler;
use crate::core::protocol::{DeckCodec, Response, ResponseCode};
use futures::SinkExt;
use std::future::Future;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tokio_util::codec::Framed;
use tracing::{debug, error, info, warn};

/// The main server loop: accepts connections until `shutdown` resolves or a
/// background task fails, then closes every connection.
pub async fn run(mut ctx: ServerContext, shutdown: impl Future<Output = ()>) {
    let mut session_id_counter: u64 = 0;
    let mut client_tasks = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Shutdown requested, initiating graceful shutdown.");
                break;
            }

            Some(res) = ctx.background_tasks.join_next() => {
                match res {
                    Ok(Ok(())) => warn!("A background task finished unexpectedly without an error."),
                    Ok(Err(e)) => { error!("CRITICAL: Background task failed: {}. Shutting down.", e); break; }
                    Err(e) => { error!("CRITICAL: Background task panicked: {e:?}. Shutting down."); break; }
                }
            },

            res = ctx.listener.accept() => {
                let (socket, addr) = match res {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                        continue;
                    }
                };

                let Ok(permit) = ctx.connection_permits.clone().try_acquire_owned() else {
                    warn!("Rejecting connection from {}: max_clients reached.", addr);
                    client_tasks.spawn(reject(socket));
                    continue;
                };

                info!("Accepted new connection from: {}", addr);
                session_id_counter = session_id_counter.wrapping_add(1);
                let session_id = session_id_counter;
                let state = ctx.state.clone();
                let channels = state.register_client(session_id, addr);
                let global_shutdown_rx = ctx.shutdown_tx.subscribe();

                client_tasks.spawn(async move {
                    let _permit = permit;
                    let mut handler = ConnectionHandler::new(socket, addr, state, session_id, channels, global_shutdown_rx);
                    if let Err(e) = handler.run().await {
                        warn!("Connection from {} terminated unexpectedly: {}", addr, e);
                    }
                });
            },

            Some(res) = client_tasks.join_next() => {
                if let Err(e) = res
                    && e.is_panic()
                {
                    error!("A client handler panicked: {e:?}");
                }
            },
        }
    }

    info!("Shutting down. Sending signal to all tasks.");
    if ctx.shutdown_tx.send(()).is_err() {
        debug!("No task was listening for the shutdown signal.");
    }

    if tokio::time::timeout(Duration::from_secs(5), async {
        while client_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for client connections to close; aborting them.");
        client_tasks.shutdown().await;
    }
    info!("All client connections closed.");

    info!("Waiting for background tasks to finish...");
    if tokio::time::timeout(Duration::from_secs(10), async {
        while ctx.background_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for background tasks to finish cleanly.");
    };
    info!("Server shutdown complete.");
}

/// Tells a client over the limit why it is being turned away, then closes the socket.
async fn reject(socket: TcpStream) {
    let mut framed = Framed::new(socket, DeckCodec::new());
    if let Err(e) = framed.send(Response::from(ResponseCode::ConnectionRejected)).await {
        debug!("Failed to send rejection: {}", e);
    }
    let _ = framed.get_mut().shutdown().await;
}
