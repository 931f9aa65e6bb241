// src/core/errors.rs

//! Defines the primary error type for the entire application.

use crate::core::protocol::{Response, ResponseCode};
use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
/// `Io` is wrapped in an `Arc` so the whole enum stays `Clone`.
#[derive(Error, Debug, Clone)]
pub enum DeckError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Line exceeds the maximum length of {0} bytes")]
    LineTooLong(usize),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Unsupported request '{0}'")]
    Unsupported(String),

    #[error("Catalog source error: {0}")]
    CatalogSource(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl DeckError {
    /// Maps the error onto the protocol response a client receives for it.
    pub fn to_response(&self) -> Response {
        match self {
            DeckError::InvalidValue(_) => Response::from(ResponseCode::InvalidValue),
            DeckError::Unsupported(_) => Response::from(ResponseCode::Unsupported),
            _ => Response::from(ResponseCode::InternalError),
        }
    }

    /// True for socket errors that just mean the peer went away.
    pub fn is_normal_disconnect(&self) -> bool {
        matches!(self, DeckError::Io(arc_err) if matches!(
            arc_err.kind(),
            std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::UnexpectedEof
                | std::io::ErrorKind::ConnectionAborted
        ))
    }
}

impl From<std::io::Error> for DeckError {
    fn from(e: std::io::Error) -> Self {
        DeckError::Io(Arc::new(e))
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(e: serde_json::Error) -> Self {
        DeckError::CatalogSource(e.to_string())
    }
}
