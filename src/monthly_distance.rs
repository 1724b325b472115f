//! Monthly travel distance per salesperson.
//!
//! Visits are grouped by (salesperson, week, day), each group is walked in
//! `VISIT_ORDER`, and the per-day distances are rolled up into a monthly total
//! per salesperson.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::dataset::Dataset;
use crate::distance::{compute_day_distance, round_km};
use crate::errors::DistanceError;
use crate::models::*;

/// Column positions of the required headers within a [`Dataset`].
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    so_name: usize,
    so_erp_id: usize,
    latitude: usize,
    longitude: usize,
    week: usize,
    day: usize,
    visit_order: usize,
}

impl ColumnMap {
    /// Locates every required column, failing on the first one absent
    /// in [`REQUIRED_COLUMNS`] order.
    fn resolve(dataset: &Dataset) -> Result<Self, DistanceError> {
        let mut indices = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = dataset
                .column_index(column)
                .ok_or(DistanceError::MissingColumn(column))?;
        }
        let [so_name, so_erp_id, latitude, longitude, week, day, visit_order] = indices;

        Ok(Self {
            so_name,
            so_erp_id,
            latitude,
            longitude,
            week,
            day,
            visit_order,
        })
    }
}

/// Converts dataset rows into visits.
///
/// Rows missing a coordinate are dropped, as are rows with an empty grouping
/// key (name, id, week or day). A `VISIT_ORDER` that is not numeric becomes
/// `None` and the row is kept.
fn extract_visits(dataset: &Dataset, columns: &ColumnMap) -> Result<Vec<VisitRow>, DistanceError> {
    let mut visits = Vec::with_capacity(dataset.rows.len());
    let mut dropped_coordinates = 0usize;
    let mut dropped_keys = 0usize;

    for row in 0..dataset.rows.len() {
        let (Some(latitude), Some(longitude)) = (
            dataset.cell(row, columns.latitude).as_f64(),
            dataset.cell(row, columns.longitude).as_f64(),
        ) else {
            dropped_coordinates += 1;
            continue;
        };

        let week_cell = dataset.cell(row, columns.week);
        let week = if week_cell.is_empty() {
            None
        } else {
            // +2: 1-based rows and the header row
            Some(week_cell.as_i64().ok_or_else(|| DistanceError::InvalidValue {
                column: COL_WEEK,
                row: row + 2,
                value: week_cell.as_text().unwrap_or_default(),
            })?)
        };

        let (Some(salesperson_name), Some(salesperson_id), Some(week), Some(day)) = (
            dataset.cell(row, columns.so_name).as_text(),
            dataset.cell(row, columns.so_erp_id).as_text(),
            week,
            dataset.cell(row, columns.day).as_text(),
        ) else {
            dropped_keys += 1;
            continue;
        };

        visits.push(VisitRow {
            salesperson_name,
            salesperson_id,
            latitude,
            longitude,
            week,
            day,
            visit_order: dataset.cell(row, columns.visit_order).as_f64(),
        });
    }

    if dropped_coordinates > 0 || dropped_keys > 0 {
        tracing::debug!(
            "Dropped {} rows without coordinates and {} rows without a grouping key",
            dropped_coordinates,
            dropped_keys
        );
    }

    Ok(visits)
}

/// Orders ERP ids numerically when both parse as numbers, otherwise as strings.
fn compare_erp_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

/// Numeric visit orders ascending; missing ones after all numeric ones.
fn compare_visit_order(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_visits(a: &VisitRow, b: &VisitRow) -> Ordering {
    a.salesperson_name
        .cmp(&b.salesperson_name)
        .then_with(|| compare_erp_ids(&a.salesperson_id, &b.salesperson_id))
        .then_with(|| a.week.cmp(&b.week))
        .then_with(|| a.day.cmp(&b.day))
        .then_with(|| compare_visit_order(a.visit_order, b.visit_order))
}

fn same_day(a: &VisitRow, b: &VisitRow) -> bool {
    a.salesperson_name == b.salesperson_name
        && a.salesperson_id == b.salesperson_id
        && a.week == b.week
        && a.day == b.day
}

/// Sums day distances into one entry per salesperson.
///
/// Totals are rounded to 2 decimals and sorted by name (case-insensitive),
/// then by ERP id.
pub fn rollup_summary(day_results: &[DayResult]) -> Vec<MonthlySummaryEntry> {
    // First-appearance order, so entries with equal sort keys stay put.
    let mut positions: HashMap<(&str, &str), usize> = HashMap::new();
    let mut summary: Vec<MonthlySummaryEntry> = Vec::new();
    for day in day_results {
        let key = (day.salesperson_name.as_str(), day.salesperson_id.as_str());
        let position = *positions.entry(key).or_insert_with(|| {
            summary.push(MonthlySummaryEntry {
                salesperson_name: day.salesperson_name.clone(),
                salesperson_id: day.salesperson_id.clone(),
                total_monthly_distance_km: 0.0,
            });
            summary.len() - 1
        });
        summary[position].total_monthly_distance_km += day.distance_km;
    }

    for entry in &mut summary {
        entry.total_monthly_distance_km = round_km(entry.total_monthly_distance_km);
    }

    // Stable: ties keep first-appearance order.
    summary.sort_by(|a, b| {
        a.salesperson_name
            .to_lowercase()
            .cmp(&b.salesperson_name.to_lowercase())
            .then_with(|| a.salesperson_id.cmp(&b.salesperson_id))
    });

    summary
}

/// Computes per-day and per-month distances for every salesperson in the dataset.
///
/// # Errors
///
/// * [`DistanceError::MissingColumn`] when a required header is absent; nothing
///   else is processed.
/// * [`DistanceError::InvalidValue`] when a `WEEK` cell is not an integer.
pub fn compute_monthly_distances(dataset: &Dataset) -> Result<MonthlyReport, DistanceError> {
    let columns = ColumnMap::resolve(dataset)?;

    let mut visits = extract_visits(dataset, &columns)?;
    // Stable: ties keep file order.
    visits.sort_by(compare_visits);

    let daily_breakdown: Vec<DayResult> = visits
        .chunk_by(same_day)
        .map(|group| {
            let coordinates: Vec<(f64, f64)> = group
                .iter()
                .map(|visit| (visit.latitude, visit.longitude))
                .collect();
            let first = &group[0];

            DayResult {
                salesperson_name: first.salesperson_name.clone(),
                salesperson_id: first.salesperson_id.clone(),
                week: first.week,
                day: first.day.clone(),
                distance_km: compute_day_distance(&coordinates),
                outlets_visited: coordinates.len(),
            }
        })
        .collect();

    let summary = rollup_summary(&daily_breakdown);

    tracing::info!(
        "Computed {} day routes for {} salespeople from {} visits",
        daily_breakdown.len(),
        summary.len(),
        visits.len()
    );

    Ok(MonthlyReport {
        summary,
        daily_breakdown,
    })
}

/// Reads an uploaded spreadsheet and computes its monthly distances.
///
/// Never fails: read and validation problems come back as
/// [`MonthlyDistanceResponse::Error`] carrying a readable message.
pub fn calculate_monthly_distance(bytes: &[u8], file_name: &str) -> MonthlyDistanceResponse {
    let outcome = Dataset::from_bytes(bytes, file_name)
        .and_then(|dataset| compute_monthly_distances(&dataset));

    match outcome {
        Ok(report) => MonthlyDistanceResponse::Success(report),
        Err(e) => {
            tracing::warn!("Monthly distance calculation failed for {}: {}", file_name, e);
            MonthlyDistanceResponse::Error {
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(name: &str, order: Option<f64>) -> VisitRow {
        VisitRow {
            salesperson_name: name.to_string(),
            salesperson_id: "1".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            week: 1,
            day: "Monday".to_string(),
            visit_order: order,
        }
    }

    #[test]
    fn test_missing_visit_order_sorts_last_and_stable() {
        let mut visits = vec![
            visit("A", None),
            visit("A", Some(2.0)),
            visit("A", None),
            visit("A", Some(1.0)),
        ];
        visits[0].latitude = 10.0;
        visits[2].latitude = 20.0;

        visits.sort_by(compare_visits);

        let orders: Vec<Option<f64>> = visits.iter().map(|v| v.visit_order).collect();
        assert_eq!(orders, vec![Some(1.0), Some(2.0), None, None]);
        assert_eq!(visits[2].latitude, 10.0);
        assert_eq!(visits[3].latitude, 20.0);
    }

    #[test]
    fn test_erp_ids_compare_numerically() {
        assert_eq!(compare_erp_ids("9", "10"), Ordering::Less);
        assert_eq!(compare_erp_ids("B9", "B10"), Ordering::Greater);
    }

    #[test]
    fn test_first_missing_column_is_reported() {
        let dataset = Dataset::new(
            vec!["SO NAME".to_string(), "Latitude".to_string()],
            Vec::new(),
        );
        assert_eq!(
            compute_monthly_distances(&dataset),
            Err(DistanceError::MissingColumn("SO_ERP_ID"))
        );
    }

    #[test]
    fn test_no_headers_reports_first_required_column() {
        assert_eq!(
            compute_monthly_distances(&Dataset::default()),
            Err(DistanceError::MissingColumn(REQUIRED_COLUMNS[0]))
        );
    }
}
