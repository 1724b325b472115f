//! Loosely typed tabular data read from an uploaded spreadsheet.
//!
//! Workbooks (xlsx, xlsm, xlsb, xls, ods) are read with `calamine`, CSV files
//! with `csv`. Either way the first row is the header row and every other row
//! becomes a vector of [`Cell`]s aligned with the headers.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;

use crate::errors::DistanceError;

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Builds a cell from raw text; blank text is `Empty`.
    pub fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric value of the cell, parsing text when needed.
    ///
    /// Returns `None` for empty cells, non-numeric text and NaN/infinite values.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Empty => return None,
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Integer value of the cell. Floats are accepted only when integral.
    pub fn as_i64(&self) -> Option<i64> {
        let value = self.as_f64()?;
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            Some(value as i64)
        } else {
            None
        }
    }

    /// Text rendering of the cell. Integral numbers drop the trailing `.0`.
    ///
    /// Text is returned as written, surrounding whitespace included, so
    /// `"Ali "` and `"Ali"` remain different grouping keys.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Text(s) => Some(s.clone()),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::from_text(s),
            other => Cell::from_text(&other.to_string()),
        }
    }
}

/// Header row plus data rows of a single worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// Reads an uploaded file, choosing the parser from the file extension.
    ///
    /// `.csv` goes through the CSV reader; anything else is sniffed as a workbook.
    pub fn from_bytes(bytes: &[u8], file_name: &str) -> Result<Self, DistanceError> {
        let is_csv = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            Self::from_csv(bytes)
        } else {
            Self::from_workbook(bytes)
        }
    }

    /// Parses CSV bytes. The first record is the header row.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, DistanceError> {
        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(bytes);

        let headers = rdr
            .headers()
            .map_err(|e| DistanceError::InputRead(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| DistanceError::InputRead(e.to_string()))?;
            rows.push(record.iter().map(Cell::from_text).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Parses the first worksheet of an Excel-family or OpenDocument workbook.
    pub fn from_workbook(bytes: &[u8]) -> Result<Self, DistanceError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| DistanceError::InputRead(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| DistanceError::InputRead("workbook has no worksheets".to_string()))?
            .map_err(|e| DistanceError::InputRead(e.to_string()))?;

        let mut row_iter = range.rows();
        let headers = match row_iter.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect(),
            None => Vec::new(),
        };
        let rows = row_iter
            .map(|row| row.iter().map(Cell::from).collect())
            .collect();

        Ok(Self { headers, rows })
    }

    /// Position of a header, matched exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Cell at (row, column); short rows read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY)
    }
}
