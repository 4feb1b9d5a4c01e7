// ============================
// crates/backend-bin/src/main.rs
// ============================
//! Tokio / Axum entry-point for the hospital management API.
use anyhow::{Context, Result};
use backend_lib::{
    config::{LogFormat, Settings, DEFAULT_CONFIG_PATH},
    create_router,
    model::{LinearClassifier, PredictionGateway},
    storage::FlatFileStorage,
    AppState,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Hospital management API server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Classifier artifact, overrides `model.artifact_path`
    #[arg(long)]
    model: Option<PathBuf>,

    /// Listen port, overrides `server.port`
    #[arg(long)]
    port: Option<u16>,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.to_lowercase()));
    let registry = tracing_subscriber::registry().with(filter);
    match settings.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// A missing or broken artifact leaves the server up with predictions disabled
fn load_gateway(path: &Path) -> PredictionGateway {
    match LinearClassifier::load(path) {
        Ok(classifier) => {
            tracing::info!(path = %path.display(), "premium model loaded");
            PredictionGateway::new(Arc::new(classifier))
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "premium model not loaded");
            PredictionGateway::not_loaded()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)?;
    if let Some(model) = args.model {
        settings.model.artifact_path = model;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
        settings.validate()?;
    }

    init_tracing(&settings);

    let storage = FlatFileStorage::new(&settings.storage.path).with_context(|| {
        format!(
            "failed to open storage at {}",
            settings.storage.path.display()
        )
    })?;
    let gateway = load_gateway(&settings.model.artifact_path);

    let addr = settings.bind_addr()?;
    let state = Arc::new(
        AppState::new(storage, settings, gateway).context("failed to build application state")?,
    );
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
