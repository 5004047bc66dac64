//! Response writer that records what a handler did with the response.

use std::io;

use axum::http::{HeaderMap, StatusCode};

use crate::http::writer::ResponseWriter;

/// Wraps a [`ResponseWriter`] and records the committed status and the
/// number of body bytes accepted by the underlying writer.
///
/// Everything is forwarded unchanged. Only the first status commit, explicit
/// or implied by a body write, reaches the inner writer.
#[derive(Debug)]
pub struct ObservingResponseWriter<W> {
    inner: W,
    status: Option<StatusCode>,
    bytes_written: u64,
    header_written: bool,
}

impl<W: ResponseWriter> ObservingResponseWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            status: None,
            bytes_written: 0,
            header_written: false,
        }
    }

    /// The committed status, or `None` if the handler never wrote anything.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Body bytes accepted by the underlying writer so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn is_committed(&self) -> bool {
        self.header_written
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

// `write_all` and `write_fmt` keep the trait defaults so every byte passes
// through `write` and is counted.
impl<W: ResponseWriter> ResponseWriter for ObservingResponseWriter<W> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.header_written {
            return;
        }
        self.status = Some(status);
        self.header_written = true;
        self.inner.write_header(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_header(StatusCode::OK);
        let n = self.inner.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        self.inner.finish()
    }
}
