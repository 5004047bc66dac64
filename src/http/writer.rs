//! The response-writing capability handed to handlers.
//!
//! # Responsibilities
//! - Commit a status code (once)
//! - Emit body bytes, reporting how many were accepted
//! - Expose response headers until the status is committed
//!
//! # Design Decisions
//! - Mirrors `std::io::Write` for the body path so partial writes are visible
//! - `write_fmt` is provided on the trait itself so `write!`/`writeln!`
//!   work without importing `std::io::Write`

use std::fmt;
use std::io;

use axum::http::{HeaderMap, StatusCode};

/// Capability used by a handler to produce the response for one request.
pub trait ResponseWriter {
    /// Response headers. Changes made after the status is committed are not sent.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Commit the response status.
    fn write_header(&mut self, status: StatusCode);

    /// Write body bytes, returning how many were accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// End the response. The body is complete once this returns, and later
    /// writes may fail.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Write the whole buffer, calling [`write`](ResponseWriter::write) until
    /// it is drained or an error occurs.
    fn write_all(&mut self, mut buf: &[u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match self.write(buf) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write whole buffer",
                    ));
                }
                Ok(n) => buf = &buf[n..],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        match args.as_str() {
            Some(s) => self.write_all(s.as_bytes()),
            None => self.write_all(args.to_string().as_bytes()),
        }
    }
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for &mut W {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        (**self).headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        (**self).write_header(status)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        (**self).write_all(buf)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        (**self).write_fmt(args)
    }
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for Box<W> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        (**self).headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        (**self).write_header(status)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        (**self).write_all(buf)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        (**self).write_fmt(args)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory writers shared by the unit tests.

    use super::*;

    /// Records every call it receives. Accepts at most `max_per_write`
    /// bytes per call and fails once `budget` bytes have been accepted.
    #[derive(Debug, Default)]
    pub struct RecordingWriter {
        pub headers: HeaderMap,
        pub statuses: Vec<StatusCode>,
        pub body: Vec<u8>,
        pub max_per_write: Option<usize>,
        pub budget: Option<usize>,
        pub flushes: usize,
        pub finishes: usize,
    }

    impl RecordingWriter {
        pub fn partial(max_per_write: usize) -> Self {
            Self {
                max_per_write: Some(max_per_write),
                ..Self::default()
            }
        }

        pub fn failing_after(budget: usize) -> Self {
            Self {
                budget: Some(budget),
                ..Self::default()
            }
        }
    }

    impl ResponseWriter for RecordingWriter {
        fn headers_mut(&mut self) -> &mut HeaderMap {
            &mut self.headers
        }

        fn write_header(&mut self, status: StatusCode) {
            self.statuses.push(status);
        }

        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let mut n = buf.len();
            if let Some(max) = self.max_per_write {
                n = n.min(max);
            }
            if let Some(budget) = self.budget {
                let left = budget - self.body.len();
                if left == 0 {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "connection reset"));
                }
                n = n.min(left);
            }
            self.body.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }

        fn finish(&mut self) -> io::Result<()> {
            self.finishes += 1;
            Ok(())
        }
    }
}
