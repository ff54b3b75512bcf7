//! OS signal handling.
//!
//! # Responsibilities
//! - Register the termination-signal handler (SIGINT/Ctrl+C)
//! - Translate the signal into exactly one shutdown attempt
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - The task fires once and exits; re-delivery is absorbed by the
//!   controller's once-guard

use std::sync::Arc;

use crate::lifecycle::controller::Controller;
use crate::routing::WorkerPool;

/// Spawn the task that turns a termination signal into a shutdown.
pub(crate) fn install<P: WorkerPool>(controller: Arc<Controller<P>>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for termination signal");
            return;
        }
        tracing::info!("Termination signal received");
        controller.handle_termination().await;
    });
}
