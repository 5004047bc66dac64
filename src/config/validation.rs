//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (sizes > 0, address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::{ServeConfig, ServerConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),
    #[error("serve.max_body_bytes must be greater than 0")]
    MaxBodyBytes,
    #[error("serve.body_channel_capacity must be greater than 0")]
    BodyChannelCapacity,
    #[error("observability.log_level `{0}` is not one of trace, debug, info, warn, error")]
    LogLevel(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    errors.extend(serve_errors(&config.serve));
    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check only the request dispatch settings.
pub fn validate_serve_config(serve: &ServeConfig) -> Result<(), Vec<ValidationError>> {
    let errors = serve_errors(serve);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn serve_errors(serve: &ServeConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if serve.max_body_bytes == 0 {
        errors.push(ValidationError::MaxBodyBytes);
    }
    if serve.body_channel_capacity == 0 {
        errors.push(ValidationError::BodyChannelCapacity);
    }
    errors
}
