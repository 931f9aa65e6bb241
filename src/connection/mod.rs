// src/connection/mod.rs

//! Manages the lifecycle of a single client TCP connection: line decoding,
//! command routing, and delivery of unsolicited notifications.

mod guard;
mod handler;

pub use guard::ConnectionGuard;
pub use handler::ConnectionHandler;
