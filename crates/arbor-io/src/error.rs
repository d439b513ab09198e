//! I/O error types for arbor-io.

use std::path::PathBuf;

use arbor_tree::TreeError;

/// Errors from reading nominal CSV files and encoding them against a schema.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the CSV file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when the header has only the class column.
    #[error("no attribute columns in {path}: need at least one attribute before the class column")]
    NoAttributeColumns {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a cell is empty or `?`.
    #[error("missing value in {path}: row {row_index}, column \"{column}\"")]
    MissingValue {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Header name of the column.
        column: String,
    },

    /// Returned when schema inference is given no tables.
    #[error("schema inference needs at least one table")]
    NoTables,

    /// Returned when two tables passed to schema inference or encoding disagree on columns.
    #[error("header mismatch in {path}: expected {expected:?}, got {got:?}")]
    HeaderMismatch {
        /// Path of the disagreeing CSV file.
        path: PathBuf,
        /// Header of the schema.
        expected: Vec<String>,
        /// Header of the file.
        got: Vec<String>,
    },

    /// Returned when a value does not belong to the schema's domain for its column.
    #[error("unknown value \"{value}\" in {path}: row {row_index}, column \"{column}\"")]
    UnknownValue {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Header name of the column.
        column: String,
        /// The raw value.
        value: String,
    },

    /// Returned when the encoded table is rejected by arbor-tree.
    #[error("cannot build nominal table")]
    Table(#[from] TreeError),
}
