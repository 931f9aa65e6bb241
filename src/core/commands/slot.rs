// src/core/commands/slot.rs

use super::command_trait::{ExecutableCommand, HandlerContext, HandlerOutcome, ParseCommand};
use crate::core::DeckError;
use crate::core::protocol::{Command, Response, ResponseCode};
use crate::core::state::{DEFAULT_SLOT_ID, DeckState, ServerState};

/// Builds a `slot info` body (code 202).
///
/// Only slot 1 can be mounted; its volume is named after the device model. Any
/// other slot, or an `unmounted` request, is reported as empty.
pub fn slot_info(
    state: &ServerState,
    deck: &DeckState,
    slot_id: Option<&str>,
    unmounted: bool,
) -> Response {
    let format: &'static str = deck.video_format().into();
    let default_slot = DEFAULT_SLOT_ID.to_string();

    let response = Response::with_fields(ResponseCode::SlotInfo);
    let response = match slot_id {
        Some(id) if !unmounted && id == default_slot => {
            let status = if id == deck.slot_id.to_string() {
                "mounted"
            } else {
                "none"
            };
            response
                .field("slot id", id)
                .field("status", status)
                .field("volume name", format!("{}-{id}", state.config.device.model))
        }
        _ => response
            .field("slot id", slot_id.unwrap_or("0"))
            .field("status", "none")
            .field("volume name", "-"),
    };

    response
        .field("recording time", "0")
        .field("video format", format)
}

/// `slot info: slot id: N`.
#[derive(Debug, Clone, Default)]
pub struct SlotInfo {
    pub slot_id: Option<String>,
}

impl ParseCommand for SlotInfo {
    fn parse(command: &Command) -> Result<Self, DeckError> {
        Ok(SlotInfo {
            slot_id: command.get("slot id").map(str::to_string),
        })
    }
}

impl ExecutableCommand for SlotInfo {
    fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError> {
        Ok(slot_info(ctx.state, ctx.deck, self.slot_id.as_deref(), false).into())
    }
}
