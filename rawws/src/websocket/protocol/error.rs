use super::{consts::MAX_PAYLOAD_LEN, OpCode};
use std::string::FromUtf8Error;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Websocket protocol violation: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("IO Error while operating on websocket: {0}")]
    Local(#[from] std::io::Error),
    /// The peer closed the stream on a frame boundary
    #[error("The client closed the connection")]
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Fragmented messages are not supported (fin bit was clear)")]
    FragmentedFrame,
    #[error(
        "Reserved bits were set when no extension protocol using these bits was negotiated"
    )]
    ReservedBitsSet,
    #[error("Recieved invalid opcode: {0:01X}")]
    InvalidOpcode(u8),
    #[error("Only text frames are supported, got {0}")]
    UnsupportedOpcode(OpCode),
    #[error("Client message was not masked")]
    UnmaskedClientFrame,
    #[error("The received message is too long: 64 bit payload lengths are not supported")]
    MessageTooLong,
    #[error("Message is too long: {0} bytes (max: {max})", max = MAX_PAYLOAD_LEN)]
    PayloadTooLarge(usize),
    #[error("The stream ended in the middle of a frame")]
    Truncated,
    #[error("Sent invalid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
    #[error("Payload is not a valid JSON document: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

impl ProtocolError {
    pub(crate) fn err(self) -> Error {
        Error::Protocol(self)
    }
}
