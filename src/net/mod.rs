//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop)
//!     → connection.rs (wrap socket, capture peer IP, no reads)
//!     → Hand off to the shard router, in accept order
//! ```
//!
//! # Design Decisions
//! - The accept path never reads from a socket; the receiving shard
//!   resumes the stream when it is ready
//! - Accept errors are logged and retried, never fatal to the listener
//! - One accept loop; hand-off is synchronous, so arrival order is
//!   preserved

pub mod connection;
pub mod listener;

pub use connection::{Connection, ConnectionId};
pub use listener::{Listener, ListenerError, ListenerHandle};
