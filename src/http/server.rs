//! HTTP server setup and the service adapter for [`Handler`]s.
//!
//! # Responsibilities
//! - Adapt a [`Handler`] into a `tower::Service` axum can route to
//! - Buffer the request body up to the configured limit
//! - Run the handler on the blocking pool and stream its output back
//! - Bind server to listener with graceful shutdown

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::{Body, Bytes},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use futures_util::future::BoxFuture;
use futures_util::stream;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tower::Service;

use crate::config::{validate_config, validate_serve_config, ConfigError, ServeConfig, ServerConfig};
use crate::http::handler::Handler;
use crate::http::response::StreamingResponseWriter;

/// `tower::Service` running a [`Handler`] for every request.
#[derive(Debug)]
pub struct HandlerService<H> {
    handler: Arc<H>,
    config: ServeConfig,
}

impl<H> HandlerService<H> {
    /// Wrap `handler`, rejecting dispatch settings that could not serve a request.
    pub fn new(handler: H, config: ServeConfig) -> Result<Self, ConfigError> {
        validate_serve_config(&config).map_err(ConfigError::Validation)?;
        Ok(Self {
            handler: Arc::new(handler),
            config,
        })
    }
}

impl<H> Clone for HandlerService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: self.config.clone(),
        }
    }
}

impl<H> Service<Request<Body>> for HandlerService<H>
where
    H: Handler + Send + Sync + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let config = self.config.clone();
        Box::pin(async move { Ok(dispatch(handler, request, config).await) })
    }
}

/// Serve one request: buffer the body, run the handler, stream the output.
async fn dispatch<H>(handler: Arc<H>, request: Request<Body>, config: ServeConfig) -> Response
where
    H: Handler + Send + Sync + 'static,
{
    let (parts, body) = request.into_parts();
    let body = match Limited::new(body, config.max_body_bytes).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::warn!(
                method = %parts.method,
                uri = %parts.uri,
                error = %e,
                "Failed to buffer request body"
            );
            return if e.downcast_ref::<LengthLimitError>().is_some() {
                (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response()
            } else {
                (StatusCode::BAD_REQUEST, "Failed to read request body").into_response()
            };
        }
    };
    let request = Request::from_parts(parts, body);

    let (head_tx, head_rx) = oneshot::channel();
    let (body_tx, body_rx) = mpsc::channel::<Bytes>(config.body_channel_capacity);

    let task = tokio::task::spawn_blocking(move || {
        let mut writer = StreamingResponseWriter::new(head_tx, body_tx);
        handler.serve_http(&mut writer, &request);
    });
    tokio::spawn(async move {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Handler task failed");
        }
    });

    let (status, headers) = match head_rx.await {
        Ok(head) => head,
        Err(_) => {
            tracing::error!("Handler exited without committing a response");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let chunks = stream::unfold(body_rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (Ok::<_, Infallible>(chunk), rx))
    });
    let mut response = Response::new(Body::from_stream(chunks));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// HTTP server hosting a single [`Handler`].
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new<H>(config: ServerConfig, handler: H) -> Result<Self, ConfigError>
    where
        H: Handler + Send + Sync + 'static,
    {
        validate_config(&config).map_err(ConfigError::Validation)?;
        let router = Self::build_router(&config, handler)?;
        Ok(Self { router })
    }

    fn build_router<H>(config: &ServerConfig, handler: H) -> Result<Router, ConfigError>
    where
        H: Handler + Send + Sync + 'static,
    {
        let service = HandlerService::new(handler, config.serve.clone())?;
        Ok(Router::new().fallback_service(service))
    }

    /// The axum router, for embedding or testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
