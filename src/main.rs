//! Demo server for the access log middleware.
//!
//! Serves `hi!` on `/` and `404` everywhere else, logging every request
//! through `observability::log_request`.

use std::path::PathBuf;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Request, StatusCode};
use clap::Parser;
use tokio::net::TcpListener;
use tower::Layer;

use access_log::config::{load_config, ServerConfig};
use access_log::http::{handler_fn, middleware, HttpServer, ResponseWriter};
use access_log::observability::{init_tracing, log_request};

#[derive(Parser)]
#[command(name = "access-log")]
#[command(about = "Demo HTTP server with access logging", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

fn hello(w: &mut dyn ResponseWriter, req: &Request<Bytes>) {
    w.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    let written = if req.uri().path() != "/" {
        w.write_header(StatusCode::NOT_FOUND);
        writeln!(w, "404 page not found")
    } else {
        writeln!(w, "hi!")
    };
    if let Err(e) = written {
        tracing::debug!(error = %e, "Client went away");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_tracing(&config.observability);

    tracing::info!("access-log v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_body_bytes = config.serve.max_body_bytes,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let app = middleware(log_request).layer(handler_fn(hello));
    let server = HttpServer::new(config, app)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
