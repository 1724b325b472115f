use std::net::SocketAddr;
use std::sync::Arc;

use route_distance_api::config::Config;
use route_distance_api::handlers::AppState;
use route_distance_api::routes::build_router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, creates the upload/output/maps
/// directories and starts the Axum server.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server runs successfully, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route_distance_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    config.storage.ensure_dirs()?;
    tracing::info!(
        "Storage directories ready: uploads={}, output={}, maps={}",
        config.storage.upload_dir.display(),
        config.storage.output_dir.display(),
        config.storage.maps_dir.display()
    );

    let port = config.port;
    let app_state = Arc::new(AppState::new(config));
    let app = build_router(app_state)?;

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Peer address is the rate limiter's fallback key when no proxy headers are present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
