//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Server internals:
//!     → tracing events (startup, shutdown, handler failures)
//!
//! Access log middleware:
//!     → reporting callback (caller-supplied, or logging::log_request)
//!     → tracing event on target `access_log`
//!
//! Consumers:
//!     → tracing-subscriber fmt layer (text or JSON on stdout)
//! ```

pub mod logging;

pub use logging::{init_tracing, log_request};
