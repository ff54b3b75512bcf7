//! TCP connection acceptance and sharding front-end.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌───────────────────────────────────────────┐
//!                       │                SHARDGATE                   │
//!                       │                                            │
//!     TCP connection    │  ┌──────────┐     ┌──────────┐             │
//!     ──────────────────┼─▶│   net    │────▶│ routing  │─────────────┼──▶ WorkerPool
//!                       │  │ listener │     │  shard   │  entrust()  │    (external)
//!                       │  └──────────┘     │  router  │             │
//!                       │                   └──────────┘             │
//!                       │  ┌────────────────────────────────────┐    │
//!                       │  │        Cross-Cutting Concerns       │    │
//!                       │  │  ┌────────┐ ┌───────────┐ ┌───────┐ │    │
//!                       │  │  │ config │ │ lifecycle │ │observa│ │    │
//!                       │  │  │        │ │ start/stop│ │bility │ │    │
//!                       │  │  └────────┘ └───────────┘ └───────┘ │    │
//!                       │  └────────────────────────────────────┘    │
//!                       └───────────────────────────────────────────┘
//! ```
//!
//! The front-end accepts raw TCP connections on one listening port and hands
//! each one to a shard of an external worker pool, selected by hashing the
//! peer's IP address. Accepted sockets are never read here; the receiving
//! shard decides when to start draining bytes.

// Core subsystems
pub mod config;
pub mod net;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use lifecycle::{Controller, LifecycleState};
pub use net::{Connection, Listener};
pub use routing::{ShardIndex, ShardRouter, WorkerPool};
