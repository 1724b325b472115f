use serde::{Deserialize, Serialize};

// ============ Input Models ============

/// Column headers the monthly distance calculation requires, in validation order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_SO_NAME,
    COL_SO_ERP_ID,
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_WEEK,
    COL_DAY,
    COL_VISIT_ORDER,
];

pub const COL_SO_NAME: &str = "SO NAME";
pub const COL_SO_ERP_ID: &str = "SO_ERP_ID";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";
pub const COL_WEEK: &str = "WEEK";
pub const COL_DAY: &str = "DAY";
pub const COL_VISIT_ORDER: &str = "VISIT_ORDER";

/// A single outlet visit, after coordinate filtering and cell coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitRow {
    /// Salesperson display name (`SO NAME`).
    pub salesperson_name: String,
    /// Salesperson ERP identifier (`SO_ERP_ID`).
    pub salesperson_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub week: i64,
    pub day: String,
    /// Position in the day's route. `None` when the cell was empty or not numeric.
    pub visit_order: Option<f64>,
}

// ============ Output Models ============

/// Distance travelled by one salesperson on one day of one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayResult {
    #[serde(rename = "SO NAME")]
    pub salesperson_name: String,
    #[serde(rename = "SO_ERP_ID")]
    pub salesperson_id: String,
    #[serde(rename = "WEEK")]
    pub week: i64,
    #[serde(rename = "DAY")]
    pub day: String,
    /// Path distance in kilometers, rounded to 2 decimals.
    #[serde(rename = "DISTANCE_KM")]
    pub distance_km: f64,
    #[serde(rename = "OUTLETS_VISITED")]
    pub outlets_visited: usize,
}

/// Monthly total for one salesperson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummaryEntry {
    #[serde(rename = "SO NAME")]
    pub salesperson_name: String,
    #[serde(rename = "SO_ERP_ID")]
    pub salesperson_id: String,
    #[serde(rename = "TOTAL_MONTHLY_DISTANCE_KM")]
    pub total_monthly_distance_km: f64,
}

/// Successful outcome of a monthly distance computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// One entry per salesperson, sorted by name (case-insensitive) then id.
    pub summary: Vec<MonthlySummaryEntry>,
    /// One entry per (salesperson, week, day), in grouping order.
    pub daily_breakdown: Vec<DayResult>,
}

/// JSON body returned by the monthly distance endpoint.
///
/// Serializes as `{"status": "success", "summary": [...], "daily_breakdown": [...]}`
/// or `{"status": "error", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MonthlyDistanceResponse {
    Success(MonthlyReport),
    Error { message: String },
}

impl MonthlyDistanceResponse {
    /// Returns true when the computation produced a report.
    pub fn is_success(&self) -> bool {
        matches!(self, MonthlyDistanceResponse::Success(_))
    }
}
