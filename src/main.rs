use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use sharebox_core::CoreConfig;

/// Main entry point for the sharebox server
///
/// Serves the REST API, the OpenAPI/Swagger UI and the stored blobs from one listener.
///
/// # Environment Variables
/// - `SHAREBOX_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `SHAREBOX_UPLOAD_DIR`: directory holding uploaded blobs (default: "public/uploads")
/// - `SHAREBOX_SHARE_FILE`: share registry JSON file (default: "data/shares.json")
/// - `SHAREBOX_PUBLIC_PATH`: URL prefix blobs are served under (default: "/uploads")
/// - `SHAREBOX_MAX_UPLOAD_BYTES`: upload size limit in bytes (default: 10 MiB)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sharebox=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(CoreConfig::from_env()?);
    let rest_addr = std::env::var("SHAREBOX_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("++ Starting sharebox REST on {}", rest_addr);
    tracing::info!(
        "++ Serving {} at {} (limit {} bytes)",
        cfg.upload_dir().display(),
        cfg.public_path(),
        cfg.max_upload_bytes()
    );

    let app = router(AppState::new(cfg));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("-- Shutting down sharebox REST");
}
