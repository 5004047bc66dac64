//! Response writer bound to a live connection.
//!
//! # Responsibilities
//! - Hand the committed status and headers to the connection task
//! - Stream body chunks to the client as they are written
//! - Commit a default status if the handler never did
//!
//! # Design Decisions
//! - Handlers run on the blocking pool; chunks cross over a bounded channel
//!   so a slow client pushes back on the handler
//! - A write after the client went away fails with `BrokenPipe`
//! - `finish` (or dropping the writer) ends the body

use std::io;
use std::mem;
use std::thread;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use tokio::sync::{mpsc, oneshot};

use crate::http::writer::ResponseWriter;

/// Status line and headers, sent once when the response is committed.
pub type ResponseHead = (StatusCode, HeaderMap);

/// [`ResponseWriter`] that forwards to the connection serving the request.
#[derive(Debug)]
pub struct StreamingResponseWriter {
    headers: HeaderMap,
    head_tx: Option<oneshot::Sender<ResponseHead>>,
    body_tx: Option<mpsc::Sender<Bytes>>,
}

impl StreamingResponseWriter {
    pub fn new(head_tx: oneshot::Sender<ResponseHead>, body_tx: mpsc::Sender<Bytes>) -> Self {
        Self {
            headers: HeaderMap::new(),
            head_tx: Some(head_tx),
            body_tx: Some(body_tx),
        }
    }

    fn commit(&mut self, status: StatusCode) -> bool {
        match self.head_tx.take() {
            Some(tx) => {
                let headers = mem::take(&mut self.headers);
                if tx.send((status, headers)).is_err() {
                    tracing::debug!(status = %status, "Connection closed before response head was sent");
                }
                true
            }
            None => false,
        }
    }
}

impl ResponseWriter for StreamingResponseWriter {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        if !self.commit(status) {
            tracing::warn!(status = %status, "Superfluous write_header call");
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.commit(StatusCode::OK);
        let Some(body_tx) = &self.body_tx else {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "response already finished",
            ));
        };
        if buf.is_empty() {
            return Ok(0);
        }
        body_tx
            .blocking_send(Bytes::copy_from_slice(buf))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "client connection closed"))?;
        Ok(buf.len())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.commit(StatusCode::OK);
        self.body_tx = None;
        Ok(())
    }
}

impl Drop for StreamingResponseWriter {
    fn drop(&mut self) {
        let status = if thread::panicking() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };
        self.commit(status);
    }
}
