pub mod consts;
pub mod error;

mod connection;
mod frame;
mod message;
mod opcode;

pub use connection::WsConnection;
pub use frame::{mask, FrameHeader, WebsocketFrame, WebsocketFrameRef};
pub use message::{decode_message, encode_message, encode_text};
pub use opcode::OpCode;

#[cfg(test)]
mod test;
