use crate::{
    consts::HTTP_VER_STR,
    http::{HttpRequest, StatusCode},
    websocket::{
        consts::{
            headers::{CONNECTION, SEC_WEBSOCKET_ACCEPT, SEC_WEBSOCKET_KEY, UPGRADE},
            WEBSOCKET_GUID,
        },
        WsConnection,
    },
};
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use sha1::{Digest, Sha1};
use std::io::{Read, Write};

/// Derives the `Sec-WebSocket-Accept` value for a client's `Sec-WebSocket-Key`
pub fn accept_token(key: &str) -> String {
    let mut sha = Sha1::new();
    sha.update(key.as_bytes());
    sha.update(WEBSOCKET_GUID.as_bytes());
    B64.encode(sha.finalize())
}

/// Renders the `101 Switching Protocols` response, byte for byte what clients expect
pub fn handshake_response(accept: &str) -> String {
    [
        format!("{HTTP_VER_STR} {}", StatusCode::SwitchingProtocols),
        format!("{UPGRADE}: websocket"),
        format!("{CONNECTION}: Upgrade"),
        format!("{SEC_WEBSOCKET_ACCEPT}: {accept}"),
        String::new(),
    ]
    .iter()
    .map(|line| format!("{line}\r\n"))
    .collect()
}

/// Completes the upgrade on a stream whose request head was already read
pub fn websocket_handshake<S: Read + Write>(
    req: &HttpRequest,
    mut stream: S,
) -> Result<WsConnection<S>, crate::Error> {
    if !req.is_websocket_upgrade() {
        return Err(crate::Error::MissingOrInvalidWebsocketHeader { header: UPGRADE });
    }

    let Some(key) = req.headers.get(SEC_WEBSOCKET_KEY) else {
        return Err(crate::Error::MissingOrInvalidWebsocketHeader {
            header: SEC_WEBSOCKET_KEY,
        });
    };

    let response = handshake_response(&accept_token(key));
    stream.write_all(response.as_bytes())?;
    stream.flush()?;

    Ok(WsConnection::new(stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HeaderMap, Method};
    use std::io::Cursor;

    fn upgrade_request(headers: HeaderMap) -> HttpRequest {
        HttpRequest {
            method: Method::Get,
            uri: "/".to_owned(),
            headers,
            body: None,
        }
    }

    #[test]
    fn accept_token_rfc_vector() {
        assert_eq!(
            accept_token("dGhlIHNhbXBsZSBub25jZQ=="),
            "s3pPLMBiTxaQ9kYGzzhZRbK+xOo="
        );
    }

    #[test]
    fn accept_token_is_deterministic() {
        let key = "x3JJHMbDL1EzLkh9GBhXDw==";
        assert_eq!(accept_token(key), accept_token(key));
        assert_ne!(accept_token(key), accept_token("dGhlIHNhbXBsZSBub25jZQ=="));
        assert_eq!(accept_token(""), accept_token(""));
    }

    #[test]
    fn response_is_byte_exact() {
        assert_eq!(
            handshake_response("s3pPLMBiTxaQ9kYGzzhZRbK+xOo="),
            "HTTP/1.1 101 Switching Protocols\r\n\
             Upgrade: websocket\r\n\
             Connection: Upgrade\r\n\
             Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n\
             \r\n"
        );
    }

    #[test]
    fn handshake_writes_response() {
        let req = upgrade_request(HeaderMap::from([
            ("Upgrade", "websocket"),
            ("Sec-WebSocket-Key", "dGhlIHNhbXBsZSBub25jZQ=="),
        ]));

        let conn = websocket_handshake(&req, Cursor::new(Vec::new())).unwrap();
        let out = conn.into_inner().into_inner();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            handshake_response("s3pPLMBiTxaQ9kYGzzhZRbK+xOo=")
        );
    }

    #[test]
    fn handshake_requires_key() {
        let req = upgrade_request(HeaderMap::from([("Upgrade", "websocket")]));

        let mut out = Cursor::new(Vec::new());
        let err = websocket_handshake(&req, &mut out).unwrap_err();

        assert!(matches!(
            err,
            crate::Error::MissingOrInvalidWebsocketHeader {
                header: SEC_WEBSOCKET_KEY
            }
        ));
        assert!(out.into_inner().is_empty());
    }

    #[test]
    fn handshake_requires_upgrade_header() {
        let req = upgrade_request(HeaderMap::from([(
            "Sec-WebSocket-Key",
            "dGhlIHNhbXBsZSBub25jZQ==",
        )]));

        assert!(websocket_handshake(&req, Cursor::new(Vec::new())).is_err());
    }
}
