use super::frame::{mask, FrameHeader, WebsocketFrame, WebsocketFrameRef};
use super::message::{decode_message, encode_message, encode_text};
use super::{consts::MAX_PAYLOAD_LEN, OpCode, WsConnection};
use crate::websocket::{Error, ProtocolError};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::io::Cursor;

const KEY: [u8; 4] = [0b11110000, 0b00001111, 0b11110000, 0b00001111];

/// Turns an unmasked server frame into the masked frame a client would send
fn as_client_frame(mut frame: Vec<u8>, key: [u8; 4]) -> Vec<u8> {
    let header_len = match frame[1] {
        126 => 4,
        _ => 2,
    };
    frame[1] |= 0b10000000;

    let payload = frame.split_off(header_len);
    frame.extend_from_slice(&key);
    let start = frame.len();
    frame.extend(payload);
    mask(&mut frame[start..], key);

    frame
}

fn parse_err(bytes: &[u8]) -> Error {
    WebsocketFrame::parse(&mut Cursor::new(bytes)).unwrap_err()
}

#[test]
fn test_frame_deser() {
    let mut stream = Cursor::new([
        0b10000001u8, // fin, opcode 1 (text)
        0b10011010,   // mask, payload len (26)
        0b11110000,   // masking key
        0b00001111,   // masking key
        0b11110000,   // masking key
        0b00001111,   // masking key
        184,          // payload \/
        106,
        156,
        99,
        159,
        47,
        167,
        96,
        130,
        99,
        148,
        47,
        184,
        106,
        156,
        99,
        159,
        47,
        167,
        96,
        130,
        99,
        148,
        46,
        209,
        46,
    ]);

    let parsed = WebsocketFrame::parse(&mut stream).unwrap();

    assert!(parsed.header.fin);
    assert!(parsed.header.masked);
    assert_eq!(parsed.header.opcode, OpCode::Text);
    assert_eq!(parsed.payload, b"Hello World Hello World!!!");
}

#[test]
fn test_frame_ser() {
    const TEXT: &[u8; 16] = b"Man I love Fauna";

    let frame = WebsocketFrameRef::text(TEXT);

    let mut stream = Cursor::new(Vec::new());
    frame.write(&mut stream).unwrap();

    let mut reference = vec![0b10000001u8, 0b00010000];
    reference.extend(TEXT);

    assert_eq!(stream.into_inner(), reference);
}

#[test]
fn test_masked_ser_matches_client_bytes() {
    let frame = WebsocketFrameRef::text(b"Hello World Hello World!!!")
        .masked(KEY)
        .encode()
        .unwrap();

    assert_eq!(&frame[..6], &[0x81, 0x80 | 26, KEY[0], KEY[1], KEY[2], KEY[3]]);
    assert_eq!(&frame[6..9], &[184, 106, 156]);
}

#[test]
fn test_length_markers() {
    let short = encode_text(&"a".repeat(125)).unwrap();
    assert_eq!(short[1], 125);
    assert_eq!(short.len(), 2 + 125);

    let medium = encode_text(&"a".repeat(126)).unwrap();
    assert_eq!(&medium[..4], &[0x81, 126, 0, 126]);
    assert_eq!(medium.len(), 4 + 126);

    let largest = encode_text(&"a".repeat(MAX_PAYLOAD_LEN)).unwrap();
    assert_eq!(&largest[..4], &[0x81, 126, 0xFF, 0xFF]);
    assert_eq!(largest.len(), 4 + MAX_PAYLOAD_LEN);
}

#[test]
fn test_oversized_payload_rejected() {
    for len in [65536, 70000] {
        let err = encode_text(&"a".repeat(len)).unwrap_err();
        assert!(matches!(err, ProtocolError::PayloadTooLarge(got) if got == len));
    }
}

#[test]
fn test_sixteen_bit_length_deser() {
    let payload = vec![b'x'; 300];
    let frame = WebsocketFrameRef::text(&payload).masked(KEY).encode().unwrap();
    assert_eq!(frame[1], 0x80 | 126);

    let parsed = WebsocketFrame::parse(&mut Cursor::new(frame)).unwrap();
    assert_eq!(parsed.payload, payload);
}

#[test]
fn test_largest_payload_deser() {
    let payload = vec![b'x'; MAX_PAYLOAD_LEN];
    let frame = WebsocketFrameRef::text(&payload).masked(KEY).encode().unwrap();
    assert_eq!(&frame[..4], &[0x81, 0x80 | 126, 0xFF, 0xFF]);
    assert_eq!(frame.len(), 4 + 4 + MAX_PAYLOAD_LEN);

    let parsed = WebsocketFrame::parse(&mut Cursor::new(frame)).unwrap();
    assert_eq!(parsed.payload.len(), MAX_PAYLOAD_LEN);
    assert_eq!(parsed.payload, payload);
}

#[test]
fn test_largest_message_decoded() {
    // a JSON string whose serialized form is exactly the 16 bit maximum
    let message = Value::String("y".repeat(MAX_PAYLOAD_LEN - 2));
    let frame = as_client_frame(encode_message(&message).unwrap(), KEY);
    assert_eq!(&frame[1..4], &[0x80 | 126, 0xFF, 0xFF]);

    assert_eq!(decode_message(Cursor::new(frame)).unwrap(), message);
}

#[test]
fn test_sixty_four_bit_length_rejected() {
    let mut frame = vec![0x81, 0x80 | 127];
    frame.extend_from_slice(&70000u64.to_be_bytes());

    assert!(matches!(
        parse_err(&frame),
        Error::Protocol(ProtocolError::MessageTooLong)
    ));
}

#[test]
fn test_header_validation() {
    assert!(matches!(
        parse_err(&[0x01, 0x80]),
        Error::Protocol(ProtocolError::FragmentedFrame)
    ));
    assert!(matches!(
        parse_err(&[0x82, 0x80]),
        Error::Protocol(ProtocolError::UnsupportedOpcode(OpCode::Binary))
    ));
    assert!(matches!(
        parse_err(&[0x89, 0x80]),
        Error::Protocol(ProtocolError::UnsupportedOpcode(OpCode::Ping))
    ));
    assert!(matches!(
        parse_err(&[0x88, 0x80]),
        Error::Protocol(ProtocolError::UnsupportedOpcode(OpCode::Close))
    ));
    assert!(matches!(
        parse_err(&[0x83, 0x80]),
        Error::Protocol(ProtocolError::InvalidOpcode(0x3))
    ));
    assert!(matches!(
        parse_err(&[0xC1, 0x80]),
        Error::Protocol(ProtocolError::ReservedBitsSet)
    ));
    assert!(matches!(
        parse_err(&[0x81, 0x02, b'h', b'i']),
        Error::Protocol(ProtocolError::UnmaskedClientFrame)
    ));
}

#[test]
fn test_header_parse_fields() {
    let header = FrameHeader::parse([0x81, 0xFE]).unwrap();

    assert_eq!(
        header,
        FrameHeader {
            fin: true,
            rsv: 0,
            opcode: OpCode::Text,
            masked: true,
            len_indicator: 126,
        }
    );
    assert!(header.validate_client().is_ok());
}

#[test]
fn test_short_read_is_protocol_error() {
    // declares 5 bytes, carries 2
    let frame = [0x81, 0x85, 1, 2, 3, 4, b'a', b'b'];
    assert!(matches!(
        parse_err(&frame),
        Error::Protocol(ProtocolError::Truncated)
    ));

    // stops inside the mask key
    assert!(matches!(
        parse_err(&[0x81, 0x85, 1, 2]),
        Error::Protocol(ProtocolError::Truncated)
    ));
}

#[test]
fn test_empty_stream_is_closed() {
    assert!(matches!(parse_err(&[]), Error::Closed));
}

#[test]
fn test_malformed_json_rejected() {
    let frame = WebsocketFrameRef::text(b"{not json").masked(KEY).encode().unwrap();
    let err = decode_message(Cursor::new(frame)).unwrap_err();

    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::MalformedJson(_))
    ));
}

#[test]
fn test_invalid_utf8_rejected() {
    let frame = WebsocketFrameRef::text(&[b'"', 0xFF, 0xFE, b'"'])
        .masked(KEY)
        .encode()
        .unwrap();
    let err = decode_message(Cursor::new(frame)).unwrap_err();

    assert!(matches!(err, Error::Protocol(ProtocolError::InvalidUtf8(_))));
}

#[test]
fn test_connection_echo() {
    let request = WebsocketFrameRef::text(br#"{"a":1}"#)
        .masked(KEY)
        .encode()
        .unwrap();

    let mut conn = WsConnection::new(Cursor::new(request));
    let message = conn.recv().unwrap();
    assert_eq!(message, json!({"a": 1}));

    conn.send(&message).unwrap();

    let written = conn.into_inner().into_inner();
    // the reply was appended after the consumed request
    let reply = &written[6 + 7..];
    assert_eq!(reply[0], 0x81);
    assert_eq!(reply[1], 7);
    let echoed: Value = serde_json::from_slice(&reply[2..]).unwrap();
    assert_eq!(echoed, json!({"a": 1}));
}

#[test]
fn test_frames_decoded_in_order() {
    let mut stream = Vec::new();
    for i in 0..3 {
        let text = json!({ "seq": i }).to_string();
        stream.extend(as_client_frame(encode_text(&text).unwrap(), KEY));
    }

    let mut stream = Cursor::new(stream);
    for i in 0..3 {
        assert_eq!(decode_message(&mut stream).unwrap(), json!({ "seq": i }));
    }
    assert!(matches!(decode_message(&mut stream), Err(Error::Closed)));
}

proptest! {
    #[test]
    fn mask_is_self_inverse(payload in proptest::collection::vec(any::<u8>(), 0..512), key in any::<[u8; 4]>()) {
        let mut masked = payload.clone();
        mask(&mut masked, key);
        mask(&mut masked, key);
        prop_assert_eq!(masked, payload);
    }

    #[test]
    fn string_messages_round_trip(text in ".{0,300}", key in any::<[u8; 4]>()) {
        let message = Value::String(text);
        let frame = as_client_frame(encode_message(&message).unwrap(), key);

        let decoded = decode_message(Cursor::new(frame)).unwrap();
        prop_assert_eq!(decoded, message);
    }

    #[test]
    fn object_messages_round_trip(
        entries in proptest::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..32),
        key in any::<[u8; 4]>(),
    ) {
        let message = json!(entries);
        let frame = as_client_frame(encode_message(&message).unwrap(), key);

        let decoded = decode_message(Cursor::new(frame)).unwrap();
        prop_assert_eq!(decoded, message);
    }
}
