// src/core/commands/device.rs

//! Commands describing the device and the connection itself.

use super::command_trait::{ExecutableCommand, HandlerContext, HandlerOutcome, ParseCommand};
use crate::config::Config;
use crate::core::DeckError;
use crate::core::protocol::{Command, Response, ResponseCode};

/// The banner sent to every client right after it connects (code 500).
pub fn connection_info(config: &Config) -> Response {
    Response::with_fields(ResponseCode::ConnectionInfo)
        .field("protocol version", config.device.protocol_version.as_str())
        .field("model", config.device.model.as_str())
}

#[derive(Debug, Clone, Default)]
pub struct DeviceInfo;

impl ParseCommand for DeviceInfo {
    fn parse(_command: &Command) -> Result<Self, DeckError> {
        Ok(DeviceInfo)
    }
}

impl ExecutableCommand for DeviceInfo {
    fn execute(&self, ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError> {
        let device = &ctx.state.config.device;
        Ok(Response::with_fields(ResponseCode::DeviceInfo)
            .field("protocol version", device.protocol_version.as_str())
            .field("model", device.model.as_str())
            .field("unique id", device.unique_id.as_str())
            .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ping;

impl ParseCommand for Ping {
    fn parse(_command: &Command) -> Result<Self, DeckError> {
        Ok(Ping)
    }
}

impl ExecutableCommand for Ping {
    fn execute(&self, _ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError> {
        Ok(Response::from(ResponseCode::Ok).into())
    }
}

/// `remote` and `remote info`. Remote control is always enabled.
#[derive(Debug, Clone, Default)]
pub struct RemoteInfo;

impl ParseCommand for RemoteInfo {
    fn parse(_command: &Command) -> Result<Self, DeckError> {
        Ok(RemoteInfo)
    }
}

impl ExecutableCommand for RemoteInfo {
    fn execute(&self, _ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError> {
        Ok(Response::with_fields(ResponseCode::RemoteInfo)
            .field("enabled", "true")
            .field("override", "true")
            .into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Quit;

impl ParseCommand for Quit {
    fn parse(_command: &Command) -> Result<Self, DeckError> {
        Ok(Quit)
    }
}

impl ExecutableCommand for Quit {
    fn execute(&self, _ctx: &mut HandlerContext<'_>) -> Result<HandlerOutcome, DeckError> {
        Ok(HandlerOutcome::CloseConnection)
    }
}
