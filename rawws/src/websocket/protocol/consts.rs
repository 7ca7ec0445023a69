#![allow(missing_docs)]

pub const WEBSOCKET_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

pub const MASK_KEY_LEN: usize = 4;

pub(crate) const FIN_BIT: u8 = 0b1000_0000;
pub(crate) const RSV_BITS: u8 = 0b0111_0000;
pub(crate) const OPCODE_BITS: u8 = 0b0000_1111;
pub(crate) const MASK_BIT: u8 = 0b1000_0000;
pub(crate) const LEN_BITS: u8 = 0b0111_1111;

/// Largest length carried directly in the 7 bit field
pub const SEVEN_BIT_MAX: u8 = 125;
pub const SIXTEEN_BIT_MARKER: u8 = 126;
pub const SIXTY_FOUR_BIT_MARKER: u8 = 127;

/// Payloads needing the 64 bit length marker are rejected in both directions
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

pub mod headers {
    pub const UPGRADE: &str = "Upgrade";
    pub const CONNECTION: &str = "Connection";
    pub const SEC_WEBSOCKET_KEY: &str = "Sec-WebSocket-Key";
    pub const SEC_WEBSOCKET_ACCEPT: &str = "Sec-WebSocket-Accept";
}
