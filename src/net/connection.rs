//! Accepted-connection wrapper.
//!
//! # Responsibilities
//! - Carry an accepted socket from the listener to a worker shard
//! - Capture the peer IP for shard selection
//! - Generate unique connection IDs for tracing
//!
//! # Design Decisions
//! - The wrapper performs no I/O; the first read happens after the
//!   receiving shard calls [`Connection::resume`]
//! - Peer address is the IP only (no port), so repeat connections from
//!   one host always carry the same routing key

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::net::TcpStream;

/// Global atomic counter for connection IDs.
/// Relaxed ordering is sufficient since we only need uniqueness.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// An accepted, not-yet-consumed socket.
///
/// Ownership starts in the listener and transfers to a worker shard via
/// `WorkerPool::entrust`. The router only reads the remote address.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    stream: TcpStream,
    remote: Option<String>,
}

impl Connection {
    /// Wrap a freshly accepted stream.
    ///
    /// The peer IP is captured here; a socket whose peer address cannot be
    /// resolved carries no routing key and will be routed as if its address
    /// were the empty string.
    pub fn new(stream: TcpStream) -> Self {
        let remote = stream.peer_addr().ok().map(|addr| addr.ip().to_string());
        Self {
            id: ConnectionId::new(),
            stream,
            remote,
        }
    }

    /// This connection's ID, for log correlation.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The peer IP as a string, if it could be resolved.
    pub fn remote_addr(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    /// Take the underlying stream and begin reading from it.
    ///
    /// Until this is called, no bytes have been consumed from the socket;
    /// the shard that receives the connection decides when to start.
    pub fn resume(self) -> TcpStream {
        self.stream
    }
}
