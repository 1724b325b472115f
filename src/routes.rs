use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::handlers::{self, AppState};

/// CORS restricted to the configured frontend origins, with credentials.
///
/// Methods and headers mirror the preflight request; wildcards are not
/// allowed together with credentials.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Builds the full application router.
///
/// Upload endpoints sit behind the body-size limit and the per-IP rate
/// limiter; `/`, `/health` and the static mounts do not.
pub fn build_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let config = &state.config;

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let upload_routes = Router::new()
        .route("/monthly-distance/", post(handlers::monthly_distance))
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(config.max_upload_bytes))
                .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    let app = Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .merge(upload_routes)
        .nest_service("/output", ServeDir::new(&config.storage.output_dir))
        .nest_service("/maps", ServeDir::new(&config.storage.maps_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(Arc::clone(&state));

    Ok(app)
}
