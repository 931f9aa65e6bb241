// src/core/protocol/mod.rs

//! The deck's line-oriented text protocol: inbound commands, outbound responses,
//! and the `tokio_util` codec that frames both over a TCP stream.

pub mod codec;
pub mod command;
pub mod response;

pub use codec::{DeckCodec, MAX_LINE_LENGTH};
pub use command::Command;
pub use response::{Response, ResponseCode};
