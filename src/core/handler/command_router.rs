// src/core/handler/command_router.rs

//! Routes decoded lines to their command implementations.
//!
//! The `Router` looks up the verb, takes the deck lock and runs the command to
//! completion under it. Command errors are turned into protocol responses here,
//! so a failing command never terminates its connection.

use crate::core::commands::{self, HandlerContext, HandlerOutcome, Verb};
use crate::core::protocol::{Command, Response, ResponseCode};
use crate::core::state::ServerState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info_span, warn};

/// The `Router` receives a decoded `Command` and directs it to its handler.
pub struct Router {
    state: Arc<ServerState>,
    session_id: u64,
    addr: SocketAddr,
}

impl Router {
    pub fn new(state: Arc<ServerState>, session_id: u64, addr: SocketAddr) -> Self {
        Self {
            state,
            session_id,
            addr,
        }
    }

    /// Executes one line and returns what the connection should do next.
    pub fn route(&self, command: &Command) -> HandlerOutcome {
        let Some(verb) = Verb::lookup(command) else {
            warn!("Unsupported request: {}", command.raw);
            return HandlerOutcome::Reply(Response::from(ResponseCode::Unsupported));
        };

        let span = info_span!(
            "command",
            session_id = self.session_id,
            addr = %self.addr,
            verb = %verb
        );
        let _entered = span.enter();

        let mut deck = self.state.deck.lock();
        let mut ctx = HandlerContext {
            state: &self.state,
            deck: &mut deck,
            session_id: self.session_id,
        };

        match commands::dispatch(verb, command, &mut ctx) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!("'{}' failed: {}", command.raw, e);
                HandlerOutcome::Reply(e.to_response())
            }
        }
    }
}
