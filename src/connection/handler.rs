// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a client connection.

use super::guard::ConnectionGuard;
use crate::core::commands::HandlerOutcome;
use crate::core::commands::device::connection_info;
use crate::core::handler::Router;
use crate::core::protocol::{Command, DeckCodec, Response};
use crate::core::state::{ClientChannels, ServerState};
use crate::core::DeckError;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, mpsc};
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// The next step for the connection's main loop to take.
enum NextAction {
    Continue,
    ExitLoop,
}

/// Manages the full lifecycle of a client connection.
///
/// Generic over the transport so it can be driven by a `TcpStream` in the
/// server and by an in-memory duplex stream in tests.
pub struct ConnectionHandler<S> {
    framed: Framed<S, DeckCodec>,
    addr: SocketAddr,
    state: Arc<ServerState>,
    session_id: u64,
    push_rx: mpsc::Receiver<Response>,
    kill_rx: broadcast::Receiver<()>,
    global_shutdown_rx: broadcast::Receiver<()>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new `ConnectionHandler` for a client already registered in the client map.
    pub fn new(
        socket: S,
        addr: SocketAddr,
        state: Arc<ServerState>,
        session_id: u64,
        channels: ClientChannels,
        global_shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            framed: Framed::new(socket, DeckCodec::new()),
            addr,
            state,
            session_id,
            push_rx: channels.push_rx,
            kill_rx: channels.kill_rx,
            global_shutdown_rx,
        }
    }

    /// Runs the connection until the peer leaves, sends `quit`, or the server
    /// closes it. The socket is shut down on every exit path.
    pub async fn run(&mut self) -> Result<(), DeckError> {
        let _guard = ConnectionGuard::new(self.state.clone(), self.session_id, self.addr);
        let result = self.serve().await;
        if let Err(e) = self.framed.get_mut().shutdown().await {
            debug!("Shutdown of socket for {} failed: {}", self.addr, e);
        }
        result
    }

    async fn serve(&mut self) -> Result<(), DeckError> {
        self.framed
            .send(connection_info(&self.state.config))
            .await?;

        loop {
            tokio::select! {
                // Prioritize shutdown signals over other events.
                biased;
                _ = self.global_shutdown_rx.recv() => {
                    info!("Connection handler for {} received GLOBAL shutdown signal.", self.addr);
                    return Ok(());
                }
                _ = self.kill_rx.recv() => {
                    info!("Connection handler for {} received kill signal.", self.addr);
                    return Ok(());
                }
                Some(push) = self.push_rx.recv() => {
                    debug!("Session {}: Pushing {} {}", self.session_id, push.code, push.name);
                    self.framed.send(push).await?;
                }
                result = self.framed.next() => {
                    match result {
                        Some(Ok(command)) => {
                            if let NextAction::ExitLoop = self.process_command(command).await? {
                                return Ok(());
                            }
                        }
                        Some(Err(DeckError::LineTooLong(limit))) => {
                            warn!("Client {} sent a line longer than {} bytes; closing.", self.addr, limit);
                            return Ok(());
                        }
                        Some(Err(e)) => {
                            if e.is_normal_disconnect() {
                                debug!("Connection from {} closed by peer: {}", self.addr, e);
                                return Ok(());
                            }
                            warn!("Connection error for {}: {}", self.addr, e);
                            return Err(e);
                        }
                        None => {
                            debug!("Connection from {} closed by peer.", self.addr);
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Routes one decoded line and sends its response, if any.
    async fn process_command(&mut self, command: Command) -> Result<NextAction, DeckError> {
        debug!("Session {}: Received command: {}", self.session_id, command.raw);

        let router = Router::new(self.state.clone(), self.session_id, self.addr);
        match router.route(&command) {
            HandlerOutcome::Reply(response) => {
                debug!(
                    "Session {}: Sending response: {} {}",
                    self.session_id, response.code, response.name
                );
                self.framed.send(response).await?;
                Ok(NextAction::Continue)
            }
            HandlerOutcome::NoReply => Ok(NextAction::Continue),
            HandlerOutcome::CloseConnection => {
                info!("Client {} sent quit.", self.addr);
                Ok(NextAction::ExitLoop)
            }
        }
    }
}
