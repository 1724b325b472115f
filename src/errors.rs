use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types for the HTTP layer.
#[derive(Debug)]
pub enum AppError {
    /// Bad request error (malformed upload, missing form field).
    BadRequest(String),
    /// Failure writing the upload to disk.
    Storage(std::io::Error),
    /// Internal server error.
    InternalError(String),
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// The body always has the `{"status": "error", "message": ...}` shape the
    /// frontend expects from every endpoint.
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to store uploaded file: {}", e),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err)
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Invalid multipart upload: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Distance computation did not complete: {}", err))
    }
}

/// Structural failures that abort a monthly distance computation.
#[derive(Debug, Clone, PartialEq)]
pub enum DistanceError {
    /// The upload could not be parsed as a spreadsheet.
    InputRead(String),
    /// A required column header is absent.
    MissingColumn(&'static str),
    /// A cell holds a value that cannot be coerced to the column's type.
    InvalidValue {
        column: &'static str,
        /// 1-based spreadsheet row, header included.
        row: usize,
        value: String,
    },
}

impl fmt::Display for DistanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceError::InputRead(cause) => write!(f, "Failed to read spreadsheet: {}", cause),
            DistanceError::MissingColumn(column) => write!(f, "Missing column: {}", column),
            DistanceError::InvalidValue { column, row, value } => {
                write!(f, "Invalid {} value '{}' at row {}", column, value, row)
            }
        }
    }
}

impl std::error::Error for DistanceError {}

/// Failure computing the distance between one pair of consecutive visits.
///
/// Recovered inside the day distance summation; never reaches a caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// Latitude outside [-90, 90], or either value not finite.
    /// Out-of-range longitudes are wrapped instead.
    InvalidCoordinate { latitude: f64, longitude: f64 },
    /// The geodesic solver returned NaN or infinity.
    NonFiniteDistance,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvalidCoordinate {
                latitude,
                longitude,
            } => write!(f, "Invalid coordinate ({}, {})", latitude, longitude),
            GeometryError::NonFiniteDistance => write!(f, "Geodesic distance is not finite"),
        }
    }
}

impl std::error::Error for GeometryError {}
