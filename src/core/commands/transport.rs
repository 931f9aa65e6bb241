// src/core/commands/transport.rs

//! Transport commands: `transport info`, `play` and `stop`.

use super::command_trait::{ExecutableCommand, HandlerContext, HandlerOutcome, ParseCommand};
use super::helpers::{parse_flag, parse_leading_int};
use crate::core::DeckError;
use crate::core::protocol::{Command, Response, ResponseCode};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct TransportInfo;

impl ParseCommand for TransportInfo {
    fn parse(_command: &Command) -> Result<Self, DeckError> {
        Ok(TransportInfo)
    }
}

impl ExecutableCommand for TransportInfo {
    fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError> {
        Ok(ctx.deck.transport_info().into())
    }
}

/// A speed parameter. `Invalid` holds text that is not an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeedArg {
    Value(i32),
    Invalid(String),
}

/// `play`, with any combination of `loop`, `speed` and `single clip`.
///
/// The sub-actions run in that order and the command succeeds when at least one
/// of them was accepted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Play {
    pub looping: Option<bool>,
    pub speed: Option<SpeedArg>,
    pub single_clip: bool,
}

impl ParseCommand for Play {
    fn parse(command: &Command) -> Result<Self, DeckError> {
        let speed = command.get("speed").map(|text| {
            parse_leading_int(text)
                .and_then(|v| i32::try_from(v).ok())
                .map_or_else(|| SpeedArg::Invalid(text.to_string()), SpeedArg::Value)
        });
        Ok(Play {
            looping: command.get("loop").map(parse_flag),
            speed,
            single_clip: command.get("single clip").is_some(),
        })
    }
}

impl ExecutableCommand for Play {
    fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError> {
        let mut success = false;

        if let Some(looping) = self.looping {
            success |= ctx.deck.set_loop(looping);
        }
        match &self.speed {
            Some(SpeedArg::Value(speed)) => success |= ctx.deck.set_speed(*speed),
            Some(SpeedArg::Invalid(text)) => debug!("Ignoring non-numeric speed '{text}'."),
            None => {}
        }
        if self.single_clip {
            success |= ctx.deck.play();
        }

        if success {
            Ok(Response::from(ResponseCode::Ok).into())
        } else {
            Err(DeckError::InvalidValue("no play action was accepted".into()))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Stop;

impl ParseCommand for Stop {
    fn parse(_command: &Command) -> Result<Self, DeckError> {
        Ok(Stop)
    }
}

impl ExecutableCommand for Stop {
    fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError> {
        if ctx.deck.stop() {
            Ok(Response::from(ResponseCode::Ok).into())
        } else {
            Err(DeckError::InvalidValue("stop was not accepted".into()))
        }
    }
}
