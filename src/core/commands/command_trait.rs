// src/core/commands/command_trait.rs

//! The traits every deck command implements, and the context it executes in.

use crate::core::protocol::{Command, Response};
use crate::core::state::{DeckState, ServerState};
use crate::core::DeckError;

/// What the connection task should do once a command has been executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// Send this response to the requesting client.
    Reply(Response),
    /// Close the connection without a response (`quit`).
    CloseConnection,
    /// Send nothing.
    NoReply,
}

impl From<Response> for HandlerOutcome {
    fn from(response: Response) -> Self {
        HandlerOutcome::Reply(response)
    }
}

/// Everything a command may touch while it runs.
///
/// The deck is borrowed from the held `ServerState::deck` guard, so a command
/// body runs to completion without interleaving with any other event source.
pub struct HandlerContext<'a> {
    pub state: &'a ServerState,
    pub deck: &'a mut DeckState,
    pub session_id: u64,
}

/// A trait for parsing a decoded protocol line into a specific command struct.
pub trait ParseCommand: Sized {
    fn parse(command: &Command) -> Result<Self, DeckError>;
}

/// A trait for executing a parsed command against the deck.
pub trait ExecutableCommand {
    fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError>;
}
