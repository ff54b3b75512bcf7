//! Shard selection and hand-off.
//!
//! # Responsibilities
//! - Compute a shard index from a connection's peer address
//! - Hand the connection to the worker pool, exactly once
//!
//! # Design Decisions
//! - One hasher state per router, so every lookup within a run agrees;
//!   cross-run stability is not promised and not needed
//! - Connections without a resolvable peer address hash the empty string
//!   and therefore all land on one fixed shard. Deliberate: changing this
//!   changes external routing behavior

use std::hash::BuildHasher;
use std::sync::Arc;

use crate::net::Connection;

/// Index of a worker shard, always in `[0, concurrency)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShardIndex(usize);

impl ShardIndex {
    /// Get the raw index value.
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ShardIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "shard-{}", self.0)
    }
}

/// The worker pool this front-end feeds.
///
/// Consumed interface: shards become ready on `start`, wind down on `stop`,
/// and take ownership of connections through `entrust`. Implementations must
/// not block inside `entrust`; it is called on the shared accept path.
pub trait WorkerPool: Send + Sync + 'static {
    /// Instruct all shards to become ready to receive connections.
    fn start(&self);

    /// Instruct all shards to wind down.
    fn stop(&self);

    /// Hand ownership of an accepted connection to shard `index`.
    ///
    /// Any failure servicing the connection is the pool's responsibility.
    fn entrust(&self, index: ShardIndex, connection: Connection);
}

/// Routes each accepted connection to a worker shard.
pub struct ShardRouter<P> {
    pool: Arc<P>,
    concurrency: usize,
    hash_state: ahash::RandomState,
}

impl<P: WorkerPool> ShardRouter<P> {
    /// Create a router over `concurrency` shards.
    pub fn new(pool: Arc<P>, concurrency: usize) -> Self {
        debug_assert!(concurrency > 0, "shard count must be at least 1");
        Self {
            pool,
            concurrency,
            hash_state: ahash::RandomState::new(),
        }
    }

    /// Number of shards connections are distributed across.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Compute the shard for a peer address.
    pub fn shard_for(&self, remote_addr: &str) -> ShardIndex {
        let hash = self.hash_state.hash_one(remote_addr);
        ShardIndex((hash % self.concurrency as u64) as usize)
    }

    /// Route a connection to its shard and hand it off.
    pub fn dispatch(&self, connection: Connection) {
        let index = self.shard_for(connection.remote_addr().unwrap_or(""));
        tracing::debug!(
            connection_id = %connection.id(),
            remote = connection.remote_addr().unwrap_or("<unknown>"),
            shard = index.as_usize(),
            "Connection dispatched"
        );
        self.pool.entrust(index, connection);
    }
}
