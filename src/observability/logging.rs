//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Provide a ready-made reporting function for the access log middleware
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - JSON format for production, text format for development

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{Request, StatusCode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Install the global tracing subscriber.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_ascii_lowercase()));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

/// Reporting function that emits one `info` event per request on the
/// `access_log` target. Pass it to [`middleware`](crate::http::middleware()).
///
/// An unset status is logged as `0`.
pub fn log_request(req: &Request<Bytes>, status: Option<StatusCode>, size: u64, duration: Duration) {
    tracing::info!(
        target: "access_log",
        method = %req.method(),
        url = %req.uri(),
        status = status.map_or(0, |s| s.as_u16()),
        size,
        duration_ms = duration.as_secs_f64() * 1000.0,
        "Request completed"
    );
}
