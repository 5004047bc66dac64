//! Handler middleware.

pub mod access_log;
