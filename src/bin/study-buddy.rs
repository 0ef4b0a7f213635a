//! Study Buddy web server.

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

use study_buddy::observability::{LogFormat, LoggingConfig};
use study_buddy::server::{self, AppState, DEFAULT_MAX_UPLOAD_BYTES};
use study_buddy::{connect_from_env, StudyGuideService};

/// Generate study guides from a YouTube lecture and a PDF chapter.
///
/// Vertex AI settings come from the environment (`GOOGLE_PROJECT_ID`,
/// `GOOGLE_LOCATION`, `STUDY_BUDDY_MODEL`, `GOOGLE_ACCESS_TOKEN` or
/// `GOOGLE_API_KEY`), optionally loaded from a `.env` file.
#[derive(Parser, Debug)]
#[command(name = "study-buddy", version, about)]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "STUDY_BUDDY_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Largest accepted submission, in bytes.
    #[arg(long, env = "STUDY_BUDDY_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    /// Log output format.
    #[arg(long, env = "STUDY_BUDDY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    LoggingConfig::new()
        .with_format(cli.log_format)
        .init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {e}"))?;

    // A missing configuration is reported per request, not at startup.
    let service = StudyGuideService::new(connect_from_env());
    if let Err(error) = service.client_status() {
        tracing::warn!(error = %error, "Starting without a usable generation client");
    }

    let state = AppState::new(Arc::new(service)).with_max_upload_bytes(cli.max_upload_bytes);
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind))?;
    tracing::info!(address = %listener.local_addr()?, "Study Buddy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Study Buddy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
