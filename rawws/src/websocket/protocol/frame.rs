use super::{
    consts::{
        FIN_BIT, LEN_BITS, MASK_BIT, MASK_KEY_LEN, MAX_PAYLOAD_LEN, OPCODE_BITS, RSV_BITS,
        SEVEN_BIT_MAX, SIXTEEN_BIT_MARKER, SIXTY_FOUR_BIT_MARKER,
    },
    OpCode,
};
use crate::websocket::{self, ProtocolError};
use std::io::{ErrorKind, Read, Write};

/// The first two bytes of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub fin: bool,
    pub rsv: u8,
    pub opcode: OpCode,
    pub masked: bool,
    /// The raw 7 bit length field, either a length or a marker
    pub len_indicator: u8,
}

impl FrameHeader {
    pub fn parse(header: [u8; 2]) -> Result<Self, ProtocolError> {
        Ok(Self {
            fin: (header[0] & FIN_BIT) > 0,
            rsv: (header[0] & RSV_BITS) >> 4,
            opcode: OpCode::parse(header[0] & OPCODE_BITS)?,
            masked: (header[1] & MASK_BIT) > 0,
            len_indicator: header[1] & LEN_BITS,
        })
    }

    /// Rejects anything but a single, masked, unextended text frame
    pub fn validate_client(&self) -> Result<(), ProtocolError> {
        if self.rsv != 0 {
            return Err(ProtocolError::ReservedBitsSet);
        }
        if self.opcode != OpCode::Text {
            return Err(ProtocolError::UnsupportedOpcode(self.opcode));
        }
        if !self.fin {
            return Err(ProtocolError::FragmentedFrame);
        }
        if !self.masked {
            return Err(ProtocolError::UnmaskedClientFrame);
        }
        if self.len_indicator == SIXTY_FOUR_BIT_MARKER {
            return Err(ProtocolError::MessageTooLong);
        }

        Ok(())
    }
}

enum Len {
    Single(u8),
    U16(u16),
}

impl Len {
    fn for_payload(len: usize) -> Result<Self, ProtocolError> {
        match len {
            len if len <= SEVEN_BIT_MAX as usize => Ok(Len::Single(len as u8)),
            len if len <= MAX_PAYLOAD_LEN => Ok(Len::U16(len as u16)),
            len => Err(ProtocolError::PayloadTooLarge(len)),
        }
    }

    fn payload_len_byte(&self) -> u8 {
        match self {
            Len::Single(len) => *len,
            Len::U16(_) => SIXTEEN_BIT_MARKER,
        }
    }

    fn header_len(&self) -> usize {
        match self {
            Len::Single(_) => 2,
            Len::U16(_) => 4,
        }
    }
}

/// XORs the payload with the key, masking and unmasking alike
pub fn mask(payload: &mut [u8], key: [u8; MASK_KEY_LEN]) {
    payload
        .iter_mut()
        .enumerate()
        .for_each(|(i, d)| *d ^= key[i % key.len()])
}

/// A decoded client frame with its payload already unmasked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsocketFrame {
    pub header: FrameHeader,
    pub payload: Vec<u8>,
}

impl WebsocketFrame {
    /// Reads exactly one client frame off the stream.
    ///
    /// The header is validated before the length, mask key or payload are
    /// read. End of stream before the first byte yields [`websocket::Error::Closed`],
    /// anywhere later it is a [`ProtocolError::Truncated`].
    pub fn parse(mut stream: impl Read) -> Result<Self, websocket::Error> {
        let mut first = [0; 1];
        stream.read_exact(&mut first).map_err(|err| match err.kind() {
            ErrorKind::UnexpectedEof => websocket::Error::Closed,
            _ => websocket::Error::Local(err),
        })?;

        let mut second = [0; 1];
        read_part(&mut stream, &mut second)?;

        let header = FrameHeader::parse([first[0], second[0]])?;
        header.validate_client()?;

        let payload_len = match header.len_indicator {
            len @ ..=SEVEN_BIT_MAX => len as usize,
            // 127 never gets here, validate_client rejects it
            _ => {
                let mut longer_len = [0; 2];
                read_part(&mut stream, &mut longer_len)?;
                u16::from_be_bytes(longer_len) as usize
            }
        };

        let mut key = [0; MASK_KEY_LEN];
        read_part(&mut stream, &mut key)?;

        let mut payload = vec![0; payload_len];
        read_part(&mut stream, &mut payload)?;

        mask(&mut payload, key);

        Ok(WebsocketFrame { header, payload })
    }
}

fn read_part(stream: &mut impl Read, buf: &mut [u8]) -> Result<(), websocket::Error> {
    stream.read_exact(buf).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => ProtocolError::Truncated.err(),
        _ => websocket::Error::Local(err),
    })
}

/// A single final frame to be written.
///
/// Server frames never carry a mask key; the key exists so the same writer
/// can produce client frames.
#[derive(Debug, Clone)]
pub struct WebsocketFrameRef<'payload> {
    pub opcode: OpCode,
    pub mask_key: Option<[u8; MASK_KEY_LEN]>,
    pub payload: &'payload [u8],
}

impl<'payload> WebsocketFrameRef<'payload> {
    pub fn text(payload: &'payload [u8]) -> Self {
        Self {
            opcode: OpCode::Text,
            mask_key: None,
            payload,
        }
    }

    pub fn masked(mut self, key: [u8; MASK_KEY_LEN]) -> Self {
        self.mask_key = Some(key);
        self
    }

    /// Serializes the frame into one buffer of exactly header + payload bytes
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let payload_len = Len::for_payload(self.payload.len())?;
        let key_len = self.mask_key.map_or(0, |key| key.len());

        let mut out =
            Vec::with_capacity(payload_len.header_len() + key_len + self.payload.len());

        // fin set, reserved bits clear
        out.push(FIN_BIT | self.opcode as u8);

        let mask_bit = match self.mask_key {
            Some(_) => MASK_BIT,
            None => 0,
        };
        out.push(mask_bit | payload_len.payload_len_byte());

        if let Len::U16(len) = payload_len {
            out.extend_from_slice(&len.to_be_bytes());
        }

        if let Some(key) = self.mask_key {
            out.extend_from_slice(&key);
        }

        let payload_start = out.len();
        out.extend_from_slice(self.payload);

        if let Some(key) = self.mask_key {
            mask(&mut out[payload_start..], key);
        }

        Ok(out)
    }

    pub fn write(&self, mut stream: impl Write) -> Result<(), websocket::Error> {
        let frame = self.encode()?;
        stream.write_all(&frame)?;
        stream.flush()?;

        Ok(())
    }
}
