//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (concurrency > 0, address well-formed)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// A single semantic violation in a configuration.
#[derive(Debug)]
pub enum ValidationError {
    /// Bind address does not parse as a socket address.
    InvalidBindAddress(String),
    /// Shard count must be at least one.
    ZeroConcurrency,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address: {}", addr)
            }
            ValidationError::ZeroConcurrency => {
                write!(f, "sharding.concurrency must be at least 1")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.sharding.concurrency == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
