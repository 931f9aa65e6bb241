// src/core/mod.rs

//! The central module containing the core logic and data structures of the deck server.

pub mod adapter;
pub mod catalog;
pub mod commands;
pub mod errors;
pub mod feedback;
pub mod handler;
pub mod notifier;
pub mod protocol;
pub mod state;
pub mod tasks;
pub mod timecode;

pub use errors::DeckError;
pub use protocol::{Command, Response};
