use super::{header::HeaderMap, Method};

#[derive(Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// True when the client asked to switch to the websocket protocol
    pub fn is_websocket_upgrade(&self) -> bool {
        self.headers
            .get(crate::websocket::consts::headers::UPGRADE)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("websocket"))
    }
}
