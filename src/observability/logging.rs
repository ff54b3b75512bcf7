//! Structured logging initialization.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the config debug flag picks the
/// default level. Safe to call more than once (later calls are no-ops),
/// so embedding processes and tests can both use it.
pub fn init(debug: bool) {
    let fallback = if debug {
        "shardgate=debug"
    } else {
        "shardgate=info"
    };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
