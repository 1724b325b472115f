//! Shared builders for integration tests.
#![allow(dead_code)]

use route_distance_api::dataset::{Cell, Dataset};
use route_distance_api::models::REQUIRED_COLUMNS;

/// One visit row in required-column order.
pub struct Row<'a> {
    pub name: &'a str,
    pub erp_id: &'a str,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub week: i64,
    pub day: &'a str,
    pub visit_order: Option<f64>,
}

impl<'a> Row<'a> {
    pub fn new(name: &'a str, week: i64, day: &'a str, coord: (f64, f64), order: f64) -> Self {
        Self {
            name,
            erp_id: "1001",
            latitude: Some(coord.0),
            longitude: Some(coord.1),
            week,
            day,
            visit_order: Some(order),
        }
    }

    pub fn erp(mut self, erp_id: &'a str) -> Self {
        self.erp_id = erp_id;
        self
    }

    fn cells(&self) -> Vec<Cell> {
        let number = |v: Option<f64>| v.map(Cell::Number).unwrap_or(Cell::Empty);
        vec![
            Cell::Text(self.name.to_string()),
            Cell::Text(self.erp_id.to_string()),
            number(self.latitude),
            number(self.longitude),
            Cell::Number(self.week as f64),
            Cell::Text(self.day.to_string()),
            number(self.visit_order),
        ]
    }
}

/// Dataset with exactly the required headers.
pub fn dataset(rows: &[Row]) -> Dataset {
    Dataset::new(
        REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows.iter().map(Row::cells).collect(),
    )
}

/// Dataset with one required column left out.
pub fn dataset_without(column: &str, rows: &[Row]) -> Dataset {
    let full = dataset(rows);
    let skip = full.column_index(column).expect("known column");
    Dataset::new(
        full.headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, h)| h.clone())
            .collect(),
        full.rows
            .iter()
            .map(|cells| {
                cells
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, c)| c.clone())
                    .collect()
            })
            .collect(),
    )
}

pub const KARACHI: (f64, f64) = (24.8607, 67.0011);
pub const HYDERABAD: (f64, f64) = (25.3960, 68.3578);
pub const SUKKUR: (f64, f64) = (27.7052, 68.8574);
pub const LAHORE: (f64, f64) = (31.5204, 74.3587);
