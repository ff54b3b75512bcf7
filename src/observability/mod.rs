//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; subsystems attach fields rather
//!   than formatting strings
//! - Phase transitions (start, started, stop, stopped) are the logging
//!   contract of the lifecycle controller
//! - Level is driven by the config debug flag, overridable via `RUST_LOG`

pub mod logging;
