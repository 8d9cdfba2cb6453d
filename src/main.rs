//! Document Chat Server
//!
//! A self-hosted PDF question-answering service: upload a PDF per
//! session, ask questions in a chat transcript, answers come from a
//! hosted generation API over the extracted document text.

use std::net::SocketAddr;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docchat_server::config::Config;
use docchat_server::routes;
use docchat_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Starting Document Chat Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Generation model: {}", config.generation.model);
    tracing::info!("Storage dir: {}", config.storage.base_dir.display());

    let host = config.server.host.clone();
    let port = config.server.port;

    // Create application state
    let app_state = AppState::new(config);
    let app = routes::app(app_state.clone());

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Document Chat Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Temp documents must not outlive the process
    app_state.shutdown().await;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
