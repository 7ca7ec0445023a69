use super::frame::{WebsocketFrame, WebsocketFrameRef};
use crate::websocket::{self, ProtocolError};
use serde_json::Value;
use std::io::Read;

/// Reads one text frame and parses its payload as a JSON document
pub fn decode_message(stream: impl Read) -> Result<Value, websocket::Error> {
    let frame = WebsocketFrame::parse(stream)?;

    let text = String::from_utf8(frame.payload).map_err(ProtocolError::from)?;
    let message = serde_json::from_str(&text).map_err(ProtocolError::from)?;

    Ok(message)
}

/// Serializes the document to compact JSON and wraps it in an unmasked text frame
pub fn encode_message(message: &Value) -> Result<Vec<u8>, ProtocolError> {
    let text = serde_json::to_string(message)?;
    encode_text(&text)
}

pub fn encode_text(text: &str) -> Result<Vec<u8>, ProtocolError> {
    WebsocketFrameRef::text(text.as_bytes()).encode()
}
