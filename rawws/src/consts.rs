pub(crate) const CHUNK_END: &[u8; 4] = b"\r\n\r\n";

pub const HTTP_VER_STR: &str = "HTTP/1.1";
/// Any minor revision of HTTP/1 is answered
pub(crate) const HTTP_1_PREFIX: &str = "HTTP/1.";

/// Requests whose header block grows past this are rejected
pub(crate) const MAX_HEADER_SIZE: usize = 8 * 1024;
/// Largest `Content-Length` a request may declare
pub(crate) const MAX_BODY_SIZE: usize = 64 * 1024;

pub mod headers {
    pub const CONTENT_LEN: &str = "Content-Length";
    pub const CONTENT_TYPE: &str = "Content-Type";
}
