use thiserror::Error;

use crate::data::record::Field;

/// Failure to turn a data source into a set of records.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("Cannot read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot fetch {url}: {message}")]
    Http { url: String, message: String },
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing column \"{}\" in header", .0.column_name())]
    MissingColumn(Field),
    #[error("Row {row}: column \"{}\" has non-numeric value \"{value}\"", .column.column_name())]
    InvalidNumber {
        row: usize,
        column: Field,
        value: String,
    },
    #[error("No data rows found")]
    Empty,
}

/// Failure to resolve the current selection into a visible slice.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("No data for A2 = {a2}, A3 = {a3}")]
    MissingSlice { a2: f64, a3: f64 },
    #[error("Field \"{}\" is not selectable", .0.column_name())]
    UnselectableField(Field),
}

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Invalid {name} range: {reason}")]
    InvalidRange { name: &'static str, reason: String },
    #[error("Cannot write sweep: {0}")]
    Csv(#[from] csv::Error),
    #[error("Cannot write sweep: {0}")]
    Io(#[from] std::io::Error),
}
