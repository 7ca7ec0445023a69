use super::message::{decode_message, encode_message};
use crate::websocket;
use serde_json::Value;
use std::{
    io::{Read, Write},
    net::TcpStream,
};

#[derive(Debug)]
/// Represents a Websocket connection to a client
pub struct WsConnection<S: Read + Write = TcpStream> {
    stream: S,
}

impl<S: Read + Write> WsConnection<S> {
    pub(crate) fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Sends a JSON document to the client as one unmasked text frame
    ///
    /// The frame is built in full before anything is written, so an oversized
    /// message never leaves a partial frame on the stream.
    pub fn send(&mut self, message: &Value) -> Result<(), websocket::Error> {
        let frame = encode_message(message)?;
        self.stream.write_all(&frame)?;
        self.stream.flush()?;

        Ok(())
    }

    /// Blocks until one full frame has arrived and returns its JSON payload
    pub fn recv(&mut self) -> Result<Value, websocket::Error> {
        decode_message(&mut self.stream)
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}
