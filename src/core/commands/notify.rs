// src/core/commands/notify.rs

use super::command_trait::{ExecutableCommand, HandlerContext, HandlerOutcome, ParseCommand};
use super::helpers::parse_flag;
use crate::core::DeckError;
use crate::core::protocol::{Command, Response, ResponseCode};
use crate::core::state::NotificationCategory;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// `notify`: updates this connection's subscriptions and reports all of them.
///
/// Every recognized category key is applied in order; unknown keys are ignored.
#[derive(Debug, Clone, Default)]
pub struct Notify {
    pub changes: Vec<(NotificationCategory, bool)>,
}

impl ParseCommand for Notify {
    fn parse(command: &Command) -> Result<Self, DeckError> {
        let changes = command
            .params
            .iter()
            .filter_map(|(key, value)| {
                NotificationCategory::from_str(key)
                    .ok()
                    .map(|category| (category, parse_flag(value)))
            })
            .collect();
        Ok(Notify { changes })
    }
}

impl ExecutableCommand for Notify {
    fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError> {
        let mut flags = ctx.state.notifications(ctx.session_id);
        for (category, enabled) in &self.changes {
            flags.set(*category, *enabled);
        }
        ctx.state.set_notifications(ctx.session_id, flags);

        let response = NotificationCategory::iter().fold(
            Response::with_fields(ResponseCode::Notify),
            |response, category| {
                let name: &'static str = category.into();
                response.field(name, flags.is_enabled(category).to_string())
            },
        );
        Ok(response.into())
    }
}
