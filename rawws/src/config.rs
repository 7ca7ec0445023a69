use std::{
    net::{Ipv4Addr, SocketAddr},
    time::Duration,
};

pub const DEFAULT_PORT: u16 = 1337;

/// Body sent to plain (non-upgrade) HTTP requests
pub const DEFAULT_PLAIN_BODY: &str = "hey";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Applied to every accepted stream. `None` lets a stalled read block forever.
    pub read_timeout: Option<Duration>,
    pub plain_body: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            read_timeout: None,
            plain_body: DEFAULT_PLAIN_BODY.to_owned(),
        }
    }
}
