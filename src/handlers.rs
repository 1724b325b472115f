use crate::config::Config;
use crate::errors::AppError;
use crate::models::MonthlyDistanceResponse;
use crate::monthly_distance::calculate_monthly_distance;
use crate::storage::{sanitize_file_name, UploadStore};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Multipart field carrying the monthly visits spreadsheet.
pub const DATA_FILE_FIELD: &str = "data_file";

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Destination for uploaded spreadsheets.
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let uploads = UploadStore::new(&config.storage);
        Self { config, uploads }
    }
}

/// Root endpoint, used by the frontend to check the API is reachable.
pub async fn home() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Route Planner API is running and ready!"
    }))
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /monthly-distance/
///
/// Takes the monthly visited-outlets spreadsheet (`data_file` form field),
/// stores it in the upload directory and returns per-day and per-month
/// distances for every salesperson.
///
/// # Returns
///
/// * 200 with the success payload.
/// * 400 with `{"status": "error", "message": ...}` when the spreadsheet is
///   unreadable or misses a column, or when the form has no `data_file`.
/// * 500 when the upload cannot be stored.
pub async fn monthly_distance(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MonthlyDistanceResponse>), AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(DATA_FILE_FIELD) {
            continue;
        }
        let file_name = sanitize_file_name(field.file_name());
        let bytes = field.bytes().await?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or_else(|| {
        AppError::BadRequest(format!("Missing '{}' file in form data", DATA_FILE_FIELD))
    })?;

    tracing::info!(
        "Monthly distance calculation started for {} ({} bytes)",
        file_name,
        bytes.len()
    );

    state.uploads.save_upload(&file_name, &bytes).await?;

    let result =
        tokio::task::spawn_blocking(move || calculate_monthly_distance(&bytes, &file_name))
            .await?;

    match &result {
        MonthlyDistanceResponse::Success(report) => tracing::info!(
            "Monthly distance calculation complete: {} salespeople, {} days",
            report.summary.len(),
            report.daily_breakdown.len()
        ),
        MonthlyDistanceResponse::Error { message } => {
            tracing::warn!("Error in monthly distance calculation: {}", message)
        }
    }

    let status = if result.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    Ok((status, Json(result)))
}
