//! Postern HTTP request router.
//!
//! Registers the served route set and runs the HTTP/1 data plane.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use http::StatusCode;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpListener;

use postern_lib::gateway::Gateway;
use postern_router::{Handler, HandlerFn, ResponseWriter, Router, RouterRequest};
use postern_telemetry::{events, LogFormat, TelemetryConfig};

#[derive(Parser, Debug)]
#[command(name = "postern", about = "Postern HTTP request router", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the router server.
    Serve {
        /// Listen address.
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,

        /// Log level.
        #[arg(long, default_value = "info")]
        log_level: String,

        /// Log format (json or pretty).
        #[arg(long, default_value = "json")]
        log_format: String,
    },
}

/// The route set served by this binary.
///
/// Registration happens once here, before serving begins; the table is
/// read-only for the lifetime of the process.
fn build_router() -> Router {
    let mut router = Router::new();

    router.get(
        "/health",
        vec![Arc::new(HandlerFn(
            |_req: &mut RouterRequest, res: &mut ResponseWriter| {
                res.status(StatusCode::OK).json(json!({ "status": "healthy" }));
                Ok(())
            },
        )) as Arc<dyn Handler>],
    );

    router.get(
        "/users/:id",
        vec![Arc::new(HandlerFn(
            |req: &mut RouterRequest, res: &mut ResponseWriter| {
                let id = req.param("id").unwrap_or_default().to_string();
                res.status(StatusCode::OK).json(json!({ "id": id }));
                Ok(())
            },
        )) as Arc<dyn Handler>],
    );

    // Registered without handlers: resolves through the default chain.
    router.get("/unimplemented", vec![]);

    router
}

/// Run the serve command. Serves until interrupted.
async fn run_serve(listen: &str) -> ExitCode {
    let addr: SocketAddr = match listen.parse() {
        Ok(a) => a,
        Err(_) => {
            tracing::error!(listen, "invalid listen address");
            return ExitCode::from(1);
        }
    };

    let gateway = Arc::new(Gateway::new(build_router()));

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            return ExitCode::from(1);
        }
    };

    tracing::info!(event = events::LISTENING, %addr, "postern listening");

    loop {
        let (stream, _) = tokio::select! {
            conn = listener.accept() => match conn {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    continue;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(event = events::SHUTDOWN, "postern shutting down");
                return ExitCode::SUCCESS;
            }
        };

        let gateway = Arc::clone(&gateway);
        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let gateway = Arc::clone(&gateway);
                async move { Ok::<_, Infallible>(gateway.handle_request(req).await) }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                tracing::warn!(error = %e, "connection error");
            }
        });
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            log_level,
            log_format,
        } => {
            let config = TelemetryConfig::new()
                .with_log_level(&log_level)
                .with_log_format(LogFormat::parse(&log_format).unwrap_or_default());
            if let Err(e) = postern_telemetry::init(&config) {
                eprintln!("error: {e}");
                return ExitCode::from(1);
            }

            tracing::info!(event = events::STARTUP, "postern starting");
            run_serve(&listen).await
        }
    }
}
