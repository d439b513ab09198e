//! CSV reader for nominal datasets.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::IoError;

/// A nominal dataset as read from disk, values still as text.
///
/// The last header column is the class attribute; every other column is a
/// candidate attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextTable {
    path: PathBuf,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    /// Return the file the table was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the full header, class column last.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Return the attribute column names.
    #[must_use]
    pub fn attribute_names(&self) -> &[String] {
        &self.header[..self.header.len() - 1]
    }

    /// Return the class column name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.header[self.header.len() - 1]
    }

    /// Return the data rows, each as wide as the header.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Return the number of data rows.
    #[must_use]
    pub fn n_records(&self) -> usize {
        self.rows.len()
    }

    /// Return the number of attribute columns.
    #[must_use]
    pub fn n_attributes(&self) -> usize {
        self.header.len() - 1
    }
}

/// Reads a nominal dataset from a CSV file.
///
/// Expected CSV format:
/// - Header row required; the last column is the class attribute
/// - `attr1,attr2,...,attrN,class`
/// - Every cell is a nominal value; surrounding whitespace is trimmed
/// - Missing values (empty cells or `?`) are not supported
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::NoAttributeColumns`] | Header has fewer than two columns |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::MissingValue`] | Cell is empty or `?` |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
pub struct NominalReader {
    path: PathBuf,
}

impl NominalReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`TextTable`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<TextTable, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so that InconsistentRowLength fires instead of CsvParse.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header: Vec<String> = rdr
            .headers()
            .map_err(|e| self.csv_error(e))?
            .iter()
            .map(String::from)
            .collect();
        let expected = header.len();
        debug!(expected, "read CSV header");

        if expected < 2 {
            return Err(IoError::NoAttributeColumns {
                path: self.path.clone(),
            });
        }

        let mut rows = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            if record.len() != expected {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected,
                    got: record.len(),
                });
            }

            let mut row = Vec::with_capacity(expected);
            for (column, cell) in header.iter().zip(record.iter()) {
                if cell.is_empty() || cell == "?" {
                    return Err(IoError::MissingValue {
                        path: self.path.clone(),
                        row_index,
                        column: column.clone(),
                    });
                }
                row.push(cell.to_string());
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_records = rows.len(),
            n_attributes = expected - 1,
            "nominal dataset loaded"
        );

        Ok(TextTable {
            path: self.path.clone(),
            header,
            rows,
        })
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
