// src/core/commands/mod.rs

//! This module defines all supported deck commands and the closed `Verb` set
//! they are selected by.
//!
//! Dispatch is two-step: the verb text is parsed into a `Verb`, then
//! `DeckCommand::parse` builds the command struct from the line's parameters.
//! Both steps are exhaustive matches, so adding a verb without a handler does
//! not compile.

use crate::core::DeckError;
use crate::core::protocol::Command;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

pub mod clips;
pub mod command_trait;
pub mod device;
pub mod goto;
pub mod helpers;
pub mod notify;
pub mod slot;
pub mod transport;

pub use command_trait::{ExecutableCommand, HandlerContext, HandlerOutcome, ParseCommand};

/// Every verb the deck understands. Matching is ASCII case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Verb {
    #[strum(serialize = "device info")]
    DeviceInfo,
    #[strum(serialize = "ping")]
    Ping,
    #[strum(serialize = "notify")]
    Notify,
    #[strum(serialize = "transport info")]
    TransportInfo,
    #[strum(to_string = "remote info", serialize = "remote")]
    RemoteInfo,
    #[strum(serialize = "slot info")]
    SlotInfo,
    #[strum(serialize = "clips count")]
    ClipsCount,
    #[strum(serialize = "clips get")]
    ClipsGet,
    #[strum(serialize = "goto")]
    Goto,
    #[strum(serialize = "play")]
    Play,
    #[strum(serialize = "stop")]
    Stop,
    #[strum(serialize = "quit")]
    Quit,
}

impl Verb {
    /// Looks up the verb of a decoded line. `None` for anything unsupported.
    pub fn lookup(command: &Command) -> Option<Self> {
        Verb::from_str(&command.verb).ok()
    }
}

/// A fully parsed deck command.
#[derive(Debug, Clone)]
pub enum DeckCommand {
    DeviceInfo(device::DeviceInfo),
    Ping(device::Ping),
    Notify(notify::Notify),
    TransportInfo(transport::TransportInfo),
    RemoteInfo(device::RemoteInfo),
    SlotInfo(slot::SlotInfo),
    ClipsCount(clips::ClipsCount),
    ClipsGet(clips::ClipsGet),
    Goto(goto::Goto),
    Play(transport::Play),
    Stop(transport::Stop),
    Quit(device::Quit),
}

impl DeckCommand {
    pub fn parse(verb: Verb, command: &Command) -> Result<Self, DeckError> {
        Ok(match verb {
            Verb::DeviceInfo => DeckCommand::DeviceInfo(device::DeviceInfo::parse(command)?),
            Verb::Ping => DeckCommand::Ping(device::Ping::parse(command)?),
            Verb::Notify => DeckCommand::Notify(notify::Notify::parse(command)?),
            Verb::TransportInfo => {
                DeckCommand::TransportInfo(transport::TransportInfo::parse(command)?)
            }
            Verb::RemoteInfo => DeckCommand::RemoteInfo(device::RemoteInfo::parse(command)?),
            Verb::SlotInfo => DeckCommand::SlotInfo(slot::SlotInfo::parse(command)?),
            Verb::ClipsCount => DeckCommand::ClipsCount(clips::ClipsCount::parse(command)?),
            Verb::ClipsGet => DeckCommand::ClipsGet(clips::ClipsGet::parse(command)?),
            Verb::Goto => DeckCommand::Goto(goto::Goto::parse(command)?),
            Verb::Play => DeckCommand::Play(transport::Play::parse(command)?),
            Verb::Stop => DeckCommand::Stop(transport::Stop::parse(command)?),
            Verb::Quit => DeckCommand::Quit(device::Quit::parse(command)?),
        })
    }

    pub fn verb(&self) -> Verb {
        match self {
            DeckCommand::DeviceInfo(_) => Verb::DeviceInfo,
            DeckCommand::Ping(_) => Verb::Ping,
            DeckCommand::Notify(_) => Verb::Notify,
            DeckCommand::TransportInfo(_) => Verb::TransportInfo,
            DeckCommand::RemoteInfo(_) => Verb::RemoteInfo,
            DeckCommand::SlotInfo(_) => Verb::SlotInfo,
            DeckCommand::ClipsCount(_) => Verb::ClipsCount,
            DeckCommand::ClipsGet(_) => Verb::ClipsGet,
            DeckCommand::Goto(_) => Verb::Goto,
            DeckCommand::Play(_) => Verb::Play,
            DeckCommand::Stop(_) => Verb::Stop,
            DeckCommand::Quit(_) => Verb::Quit,
        }
    }
}

impl ExecutableCommand for DeckCommand {
    fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError> {
        match self {
            DeckCommand::DeviceInfo(cmd) => cmd.execute(ctx),
            DeckCommand::Ping(cmd) => cmd.execute(ctx),
            DeckCommand::Notify(cmd) => cmd.execute(ctx),
            DeckCommand::TransportInfo(cmd) => cmd.execute(ctx),
            DeckCommand::RemoteInfo(cmd) => cmd.execute(ctx),
            DeckCommand::SlotInfo(cmd) => cmd.execute(ctx),
            DeckCommand::ClipsCount(cmd) => cmd.execute(ctx),
            DeckCommand::ClipsGet(cmd) => cmd.execute(ctx),
            DeckCommand::Goto(cmd) => cmd.execute(ctx),
            DeckCommand::Play(cmd) => cmd.execute(ctx),
            DeckCommand::Stop(cmd) => cmd.execute(ctx),
            DeckCommand::Quit(cmd) => cmd.execute(ctx),
        }
    }
}

/// Parses and executes one line. Parse failures surface as errors, like execution failures.
pub fn dispatch(
    verb: Verb,
    command: &Command,
    ctx: &mut HandlerContext<'_>,
) -> Result<HandlerOutcome, DeckError> {
    DeckCommand::parse(verb, command)?.execute(ctx)
}
