//! timbral-api - Audio Feature Extraction Service
//!
//! One-endpoint HTTP service around the timbral-dsp pipeline: upload an
//! audio file, receive a 692-element normalized feature vector.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use timbral_api::AppState;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "timbral-api", version, about = "Audio feature extraction service")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "TIMBRAL_BIND")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000, env = "TIMBRAL_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    info!("Starting timbral-api (Audio Feature Extraction) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new();
    let app = timbral_api::build_router(state);

    let listener = tokio::net::TcpListener::bind((args.bind.as_str(), args.port)).await?;
    info!("Listening on http://{}:{}", args.bind, args.port);
    info!("Health check: http://{}:{}/health", args.bind, args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
