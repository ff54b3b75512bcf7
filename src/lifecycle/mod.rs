//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (controller.rs):
//!     start() → bind listener → accept loop running → pool.start()
//!             → install one-shot termination handler
//!
//! Shutdown (controller.rs):
//!     stop() → stop accepting → await clean listener close → pool.stop()
//!
//! Signals (signals.rs):
//!     SIGINT/Ctrl+C → stop(), exactly once
//! ```
//!
//! # Design Decisions
//! - Ordered startup: listener first, then workers
//! - Ordered shutdown: listener must close cleanly before workers stop;
//!   a failed close halts the sequence rather than tearing down workers
//!   while the listener's fate is unknown
//! - A second termination signal during shutdown is ignored

pub mod controller;
pub mod signals;

pub use controller::{Controller, LifecycleState, StartError, StopError};
