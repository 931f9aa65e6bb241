// src/core/commands/goto.rs

use super::command_trait::{ExecutableCommand, HandlerContext, HandlerOutcome, ParseCommand};
use super::helpers::require_int;
use crate::core::DeckError;
use crate::core::catalog::Navigation;
use crate::core::protocol::{Command, Response, ResponseCode};
use crate::core::state::DEFAULT_SLOT_ID;

/// The parsed form of a `goto` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GotoTarget {
    /// `slot id: 1`: the only slot is always selected.
    Slot,
    Clip(Navigation),
}

/// `goto: clip id: N`, `goto: clip id: +N`, `goto: clip id: -N` or `goto: slot id: 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goto {
    pub target: GotoTarget,
}

impl ParseCommand for Goto {
    fn parse(command: &Command) -> Result<Self, DeckError> {
        if !command.has_params() {
            return Err(DeckError::InvalidValue("goto requires parameters".into()));
        }
        if command.get("slot id") == Some(DEFAULT_SLOT_ID.to_string().as_str()) {
            return Ok(Goto {
                target: GotoTarget::Slot,
            });
        }

        let clip_id = command
            .get("clip id")
            .ok_or_else(|| DeckError::InvalidValue("goto requires 'clip id'".into()))?;

        let navigation = if let Some(rest) = clip_id.strip_prefix('+') {
            Navigation::Forward(count(rest)?)
        } else if let Some(rest) = clip_id.strip_prefix('-') {
            Navigation::Backward(count(rest)?)
        } else {
            Navigation::Absolute(require_int("clip id", clip_id)?)
        };
        Ok(Goto {
            target: GotoTarget::Clip(navigation),
        })
    }
}

/// A relative step count. Negative counts are rejected.
fn count(text: &str) -> Result<usize, DeckError> {
    let value = require_int("clip id", text)?;
    usize::try_from(value)
        .map_err(|_| DeckError::InvalidValue(format!("negative clip step: {value}")))
}

impl ExecutableCommand for Goto {
    fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError> {
        match self.target {
            GotoTarget::Slot => Ok(Response::from(ResponseCode::Ok).into()),
            GotoTarget::Clip(navigation) => match ctx.deck.navigate(navigation) {
                Some(_) => Ok(Response::from(ResponseCode::Ok).into()),
                None => Err(DeckError::InvalidValue(format!(
                    "no clip for target {navigation:?}"
                ))),
            },
        }
    }
}
