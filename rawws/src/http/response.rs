use super::{header::HeaderMap, StatusCode};
use crate::consts::headers::CONTENT_TYPE;
use std::fmt::Display;

/// A response to a request that was not upgraded, always a short text body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl HttpResponse {
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::from([(CONTENT_TYPE, "text/plain")]),
            body: Some(body.into().into_bytes()),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::text(StatusCode::Ok, body)
    }

    pub fn bad_request(reason: impl Display) -> Self {
        Self::text(StatusCode::BadRequest, format!("Bad Request: {reason}"))
    }
}
