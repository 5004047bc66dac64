//! Access logging middleware for HTTP handlers.
//!
//! Wraps a [`Handler`](http::Handler) so that, once it has served a request,
//! a caller-supplied function receives the request, the response status, the
//! number of body bytes written and the time taken. Formatting and shipping
//! the log line is left to that function.
//!
//! ```no_run
//! use access_log::config::ServerConfig;
//! use access_log::http::{handler_fn, middleware, HttpServer, ResponseWriter};
//! use access_log::observability::log_request;
//! use tower::Layer;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let app = middleware(log_request).layer(handler_fn(|w, _req| {
//!     let _ = writeln!(w, "hi!");
//! }));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! HttpServer::new(ServerConfig::default(), app)?.run(listener).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;
pub mod observability;

pub use config::schema::ServerConfig;
pub use http::{middleware, Handler, HttpServer, ResponseWriter};
