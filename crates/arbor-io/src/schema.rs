//! Shared value domains for encoding text tables as nominal tables.

use std::collections::HashMap;

use arbor_tree::{AttributeIndex, NominalTable, Vocabulary};
use tracing::{debug, instrument};

use crate::{IoError, TextTable};

/// The values one column may take, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Domain {
    values: Vec<String>,
    index: HashMap<String, usize>,
}

impl Domain {
    fn insert(&mut self, value: &str) {
        if !self.index.contains_key(value) {
            self.index.insert(value.to_string(), self.values.len());
            self.values.push(value.to_string());
        }
    }

    fn get(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }
}

/// Column names and value domains shared by a set of tables.
///
/// Encoding training, validation, and test tables with one schema gives
/// every value the same index in all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    header: Vec<String>,
    // One domain per header column, class last.
    domains: Vec<Domain>,
}

impl Schema {
    /// Collect the distinct values of every column across `tables`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::NoTables`] | `tables` is empty |
    /// | [`IoError::HeaderMismatch`] | a table's header differs from the first table's |
    #[instrument(skip_all, fields(n_tables = tables.len()))]
    pub fn infer(tables: &[&TextTable]) -> Result<Self, IoError> {
        let first = tables.first().ok_or(IoError::NoTables)?;
        let header = first.header().to_vec();
        let mut domains = vec![Domain::default(); header.len()];

        for table in tables {
            check_header(&header, table)?;
            for row in table.rows() {
                for (domain, value) in domains.iter_mut().zip(row) {
                    domain.insert(value);
                }
            }
        }

        let schema = Self { header, domains };
        debug!(
            n_attributes = schema.n_attributes(),
            n_classes = schema.n_classes(),
            "schema inferred"
        );
        Ok(schema)
    }

    /// Encode `table` as value indices.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::HeaderMismatch`] | the header differs from the schema's |
    /// | [`IoError::UnknownValue`] | a value is not in its column's domain |
    /// | [`IoError::Table`] | the encoded table is rejected |
    pub fn encode(&self, table: &TextTable) -> Result<NominalTable, IoError> {
        check_header(&self.header, table)?;

        let class_column = self.header.len() - 1;
        let mut rows = Vec::with_capacity(table.n_records());
        let mut labels = Vec::with_capacity(table.n_records());
        for (row_index, row) in table.rows().iter().enumerate() {
            let mut encoded = Vec::with_capacity(row.len());
            for (column, value) in row.iter().enumerate() {
                let index = self.domains[column]
                    .get(value)
                    .ok_or_else(|| IoError::UnknownValue {
                        path: table.path().to_path_buf(),
                        row_index,
                        column: self.header[column].clone(),
                        value: value.clone(),
                    })?;
                encoded.push(index);
            }
            labels.extend(encoded.pop());
            debug_assert_eq!(encoded.len(), class_column);
            rows.push(encoded);
        }

        let domain_sizes = self.domains[..class_column]
            .iter()
            .map(|d| d.values.len())
            .collect();
        Ok(NominalTable::new(rows, labels, domain_sizes, self.n_classes())?)
    }

    /// Return the attribute column names.
    #[must_use]
    pub fn attribute_names(&self) -> &[String] {
        &self.header[..self.header.len() - 1]
    }

    /// Return the class column name.
    #[must_use]
    pub fn class_column(&self) -> &str {
        &self.header[self.header.len() - 1]
    }

    /// Return the values of `attribute` in index order.
    ///
    /// # Panics
    ///
    /// Panics if `attribute` is not below [`Schema::n_attributes`].
    #[must_use]
    pub fn attribute_values(&self, attribute: AttributeIndex) -> &[String] {
        assert!(attribute.index() < self.n_attributes(), "attribute out of range");
        &self.domains[attribute.index()].values
    }

    /// Return the class values in index order.
    #[must_use]
    pub fn class_values(&self) -> &[String] {
        &self.domains[self.header.len() - 1].values
    }

    /// Return the number of attribute columns.
    #[must_use]
    pub fn n_attributes(&self) -> usize {
        self.header.len() - 1
    }

    /// Return the number of class values.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.class_values().len()
    }
}

impl Vocabulary for Schema {
    fn attribute_name(&self, attribute: AttributeIndex) -> String {
        self.attribute_names()[attribute.index()].clone()
    }

    fn value_name(&self, attribute: AttributeIndex, value: usize) -> String {
        self.attribute_values(attribute)[value].clone()
    }

    fn class_name(&self, class: usize) -> String {
        self.class_values()[class].clone()
    }
}

fn check_header(expected: &[String], table: &TextTable) -> Result<(), IoError> {
    if table.header() != expected {
        return Err(IoError::HeaderMismatch {
            path: table.path().to_path_buf(),
            expected: expected.to_vec(),
            got: table.header().to_vec(),
        });
    }
    Ok(())
}
