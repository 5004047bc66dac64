//! Access logging middleware.
//! Reports method/URL, status, size and duration of every request to a
//! caller-supplied function.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::{Request, StatusCode};
use tower::Layer;

use crate::http::handler::Handler;
use crate::http::observer::ObservingResponseWriter;
use crate::http::writer::ResponseWriter;

/// Build the access logging layer around `log`.
///
/// `log` is called once per completed request with the request, the
/// committed status (`None` if the handler wrote nothing), the number of
/// body bytes written and the time spent in the handler. The response is
/// finished before `log` runs, so a slow `log` does not hold the client.
///
/// ```
/// use std::time::Duration;
/// use access_log::http::{handler_fn, middleware, ResponseWriter};
/// use axum::body::Bytes;
/// use axum::http::{Request, StatusCode};
/// use tower::Layer;
///
/// let log = |req: &Request<Bytes>, status: Option<StatusCode>, size: u64, duration: Duration| {
///     println!("[{}] {:?} {} {} {:?}", req.method(), status, req.uri(), size, duration);
/// };
/// let app = middleware(log).layer(handler_fn(|w, _req| {
///     let _ = writeln!(w, "hi!");
/// }));
/// # let _ = app;
/// ```
pub fn middleware<F>(log: F) -> AccessLogLayer<F>
where
    F: Fn(&Request<Bytes>, Option<StatusCode>, u64, Duration),
{
    AccessLogLayer { log: Arc::new(log) }
}

/// Layer that wraps handlers in [`AccessLog`].
pub struct AccessLogLayer<F> {
    log: Arc<F>,
}

impl<F> Clone for AccessLogLayer<F> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
        }
    }
}

impl<F> fmt::Debug for AccessLogLayer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessLogLayer").finish_non_exhaustive()
    }
}

impl<H, F> Layer<H> for AccessLogLayer<F> {
    type Service = AccessLog<H, F>;

    fn layer(&self, next: H) -> Self::Service {
        AccessLog {
            next,
            log: Arc::clone(&self.log),
        }
    }
}

/// Handler that reports every request served by `next`.
pub struct AccessLog<H, F> {
    next: H,
    log: Arc<F>,
}

impl<H: Clone, F> Clone for AccessLog<H, F> {
    fn clone(&self) -> Self {
        Self {
            next: self.next.clone(),
            log: Arc::clone(&self.log),
        }
    }
}

impl<H: fmt::Debug, F> fmt::Debug for AccessLog<H, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessLog")
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}

impl<H, F> Handler for AccessLog<H, F>
where
    H: Handler,
    F: Fn(&Request<Bytes>, Option<StatusCode>, u64, Duration),
{
    fn serve_http(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>) {
        let start = Instant::now();
        let mut observer = ObservingResponseWriter::new(w);

        self.next.serve_http(&mut observer, req);
        let elapsed = start.elapsed();

        // The response must be complete before reporting starts.
        if let Err(e) = observer.finish() {
            tracing::debug!(error = %e, "Failed to finish response");
        }

        (self.log)(req, observer.status(), observer.bytes_written(), elapsed);
    }
}
