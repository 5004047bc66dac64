//! Request handlers written against [`ResponseWriter`].

use std::fmt;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::Request;

use crate::http::writer::ResponseWriter;

/// Produces the response for a request by writing to a [`ResponseWriter`].
pub trait Handler {
    fn serve_http(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>);
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn serve_http(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>) {
        (**self).serve_http(w, req)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn serve_http(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>) {
        (**self).serve_http(w, req)
    }
}

/// Handler built from a closure, see [`handler_fn`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F> {
    f: F,
}

/// Turn a closure into a [`Handler`].
///
/// ```
/// use access_log::http::{handler_fn, ResponseWriter};
///
/// let hello = handler_fn(|w, _req| {
///     let _ = writeln!(w, "hi!");
/// });
/// # let _ = hello;
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, &Request<Bytes>),
{
    HandlerFn { f }
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, &Request<Bytes>),
{
    fn serve_http(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>) {
        (self.f)(w, req)
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}
