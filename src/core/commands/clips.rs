// src/core/commands/clips.rs

//! Catalog queries: `clips count` and `clips get`.

use super::command_trait::{ExecutableCommand, HandlerContext, HandlerOutcome, ParseCommand};
use super::helpers::parse_leading_int;
use crate::core::DeckError;
use crate::core::catalog::Clip;
use crate::core::protocol::{Command, Response, ResponseCode};
use crate::core::state::DEFAULT_SLOT_ID;

#[derive(Debug, Clone, Default)]
pub struct ClipsCount;

impl ParseCommand for ClipsCount {
    fn parse(_command: &Command) -> Result<Self, DeckError> {
        Ok(ClipsCount)
    }
}

impl ExecutableCommand for ClipsCount {
    fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError> {
        let count = if ctx.deck.slot_id == DEFAULT_SLOT_ID {
            ctx.deck.catalog().len()
        } else {
            0
        };
        Ok(Response::with_fields(ResponseCode::ClipsCount)
            .field("clip count", count.to_string())
            .into())
    }
}

/// Which entries `clips get` lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipFilter {
    /// No `clip id`, or `clip id: 0`.
    #[default]
    All,
    Id(i64),
    /// A `clip id` that is not a number matches nothing.
    Nothing,
}

impl ClipFilter {
    fn matches(self, clip: &Clip) -> bool {
        match self {
            ClipFilter::All => true,
            ClipFilter::Id(id) => i64::from(clip.id) == id,
            ClipFilter::Nothing => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClipsGet {
    pub filter: ClipFilter,
}

impl ParseCommand for ClipsGet {
    fn parse(command: &Command) -> Result<Self, DeckError> {
        let filter = match command.get("clip id").map(parse_leading_int) {
            None | Some(Some(0)) => ClipFilter::All,
            Some(Some(id)) => ClipFilter::Id(id),
            Some(None) => ClipFilter::Nothing,
        };
        Ok(ClipsGet { filter })
    }
}

impl ExecutableCommand for ClipsGet {
    fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError> {
        let catalog = ctx.deck.catalog();
        let listed: Vec<&Clip> = if ctx.deck.slot_id == DEFAULT_SLOT_ID {
            catalog
                .clips()
                .iter()
                .filter(|clip| self.filter.matches(clip))
                .collect()
        } else {
            Vec::new()
        };

        let response = Response::with_fields(ResponseCode::ClipsInfo)
            .field("clip count", listed.len().to_string());
        let response = listed
            .into_iter()
            .fold(response, |response, clip| {
                response.field(clip.id.to_string(), clip.listing())
            });
        Ok(response.into())
    }
}
