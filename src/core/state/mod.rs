// src/core/state/mod.rs

//! Defines the central `ServerState` struct and all related state components.

mod client;
mod core;
mod deck;

pub use client::*;
pub use core::{ServerInit, ServerState};
pub use deck::{DEFAULT_SLOT_ID, DeckState, Transport};
