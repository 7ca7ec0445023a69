//! Server side websocket over a raw `TcpStream`.
//!
//! The upgrade handshake and the text frame codec are implemented here by
//! hand. Only single, unfragmented text frames carrying JSON are understood;
//! control frames, binary frames and 64 bit payload lengths are rejected.

/// What a message handler hands back to the connection
pub type HandlerResult =
    core::result::Result<serde_json::Value, Box<dyn std::error::Error + Send + Sync>>;

pub mod consts;
pub mod http;
pub mod websocket;

mod config;
mod error;
mod server;

pub use config::*;
pub use error::{ConnectionError, Error};
pub use server::*;
