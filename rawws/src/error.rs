use crate::consts::{MAX_BODY_SIZE, MAX_HEADER_SIZE};
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Io Error: {0}")]
    Io(#[from] io::Error),
    #[error("A required field was empty")]
    Empty,
    #[error("A header was invalid")]
    InvalidHeader,
    #[error("The header block exceeded {max} bytes", max = MAX_HEADER_SIZE)]
    HeaderTooLarge,
    #[error("No URI was provided")]
    NoUri,
    #[error("Invalid method '{recieved}'")]
    InvalidMethod { recieved: String },
    #[error("Body too short. Expected {expt} got {got}")]
    BodyTooShort { expt: usize, got: usize },
    #[error("Declared body of {declared} bytes exceeds {max} bytes", max = MAX_BODY_SIZE)]
    BodyTooLarge { declared: usize },
    #[error("The specified HTTP version is not supported")]
    UnsupportedVersion,
    #[error("Missing or invalid header for websocket upgrade: {header}")]
    MissingOrInvalidWebsocketHeader { header: &'static str },
}

/// Everything that can end a single connection's worker
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Http(#[from] Error),
    #[error(transparent)]
    WebSocket(#[from] crate::websocket::Error),
    #[error("Message handler failed: {0}")]
    Handler(Box<dyn std::error::Error + Send + Sync>),
}
