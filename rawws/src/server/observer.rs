use crate::ConnectionError;
use serde_json::Value;
use std::{io, net::SocketAddr};

/// Receives the server's diagnostics.
///
/// Every method has an empty default, implement only what you need. One
/// observer is shared by all connection workers.
pub trait Observer: Send + Sync {
    fn on_listening(&self, _addr: SocketAddr) {}

    fn on_connect(&self, _peer: SocketAddr) {}

    fn on_upgrade(&self, _peer: SocketAddr, _key: &str) {}

    fn on_message(&self, _peer: SocketAddr, _message: &Value) {}

    fn on_connection_error(&self, _peer: SocketAddr, _error: &ConnectionError) {}

    fn on_accept_error(&self, _error: &io::Error) {}

    /// A worker panicked; the panic was contained to its connection
    fn on_fault(&self, _peer: SocketAddr, _reason: &str) {}

    fn on_disconnect(&self, _peer: SocketAddr) {}
}

/// Logs every event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_listening(&self, addr: SocketAddr) {
        tracing::info!(%addr, "server listening");
    }

    fn on_connect(&self, peer: SocketAddr) {
        tracing::debug!(%peer, "new connection");
    }

    fn on_upgrade(&self, peer: SocketAddr, key: &str) {
        tracing::info!(%peer, key, "connected");
    }

    fn on_message(&self, peer: SocketAddr, message: &Value) {
        tracing::info!(%peer, %message, "message received");
    }

    fn on_connection_error(&self, peer: SocketAddr, error: &ConnectionError) {
        tracing::warn!(%peer, %error, "connection failed");
    }

    fn on_accept_error(&self, error: &io::Error) {
        tracing::error!(%error, "failed to accept connection");
    }

    fn on_fault(&self, peer: SocketAddr, reason: &str) {
        tracing::error!(%peer, reason, "something bad happened in a connection worker");
    }

    fn on_disconnect(&self, peer: SocketAddr) {
        tracing::debug!(%peer, "connection closed");
    }
}
