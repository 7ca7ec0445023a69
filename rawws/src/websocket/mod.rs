mod handshake;
mod protocol;

pub use handshake::{accept_token, handshake_response, websocket_handshake};
pub use protocol::{
    consts, decode_message, encode_message, encode_text, error::*, mask, FrameHeader, OpCode,
    WebsocketFrame, WebsocketFrameRef, WsConnection,
};
