//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Accepted Connection (peer IP)
//!     → router.rs (hash IP, mod shard count)
//!     → WorkerPool::entrust(index, connection)
//! ```
//!
//! # Design Decisions
//! - Shard selection is a pure function of (peer IP, concurrency)
//! - Deterministic within a run: same address always maps to same shard
//! - The router owns no connection state; hand-off transfers ownership
//! - Pool failures are the pool's concern; no retry or reroute here

pub mod router;

pub use router::{ShardIndex, ShardRouter, WorkerPool};
