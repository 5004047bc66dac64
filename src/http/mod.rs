//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, body buffering, blocking-pool dispatch)
//!     → middleware/access_log.rs (start clock, wrap writer)
//!         → observer.rs (record status + bytes, forward everything)
//!         → handler.rs (user handler writes the response)
//!         → response.rs (head + body chunks to the connection)
//!     → finish (body ends, client gets the full response)
//!     → reporting callback
//! ```

pub mod handler;
pub mod middleware;
pub mod observer;
pub mod response;
pub mod server;
pub mod writer;

pub use handler::{handler_fn, Handler, HandlerFn};
pub use middleware::access_log::{middleware, AccessLog, AccessLogLayer};
pub use observer::ObservingResponseWriter;
pub use response::StreamingResponseWriter;
pub use server::{HandlerService, HttpServer};
pub use writer::ResponseWriter;
