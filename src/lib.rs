//! Route Distance API Library
//!
//! Computes travel distances for a field sales force from uploaded visit
//! spreadsheets: the distance of each salesperson-day route in its given
//! visiting order, and each salesperson's monthly total.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `config`: Configuration management and storage locations.
//! - `dataset`: Spreadsheet (workbook / CSV) reading.
//! - `distance`: Geodesic route distance.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Input and output data models.
//! - `monthly_distance`: Grouping and monthly rollup.
//! - `routes`: Router and middleware assembly.
//! - `storage`: Upload persistence.

pub mod api;
pub mod core;

// Re-export primary modules for shared use in tests and the binary
pub mod config;
pub mod dataset;
pub mod distance;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod monthly_distance;
pub mod routes;
pub mod storage;
