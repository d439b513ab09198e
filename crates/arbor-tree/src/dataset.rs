//! The dataset abstraction consumed by induction, and an in-memory table.

use crate::error::TreeError;
use crate::node::AttributeIndex;

/// An ordered collection of records over nominal attributes plus a class.
///
/// Every attribute value and class value is a zero-based index into a
/// finite domain. Implementations must keep `value` and `class_value`
/// inside their domains; induction indexes count vectors with them.
pub trait NominalDataset: Sized {
    /// Number of records.
    fn n_records(&self) -> usize;

    /// Number of candidate attributes (the class attribute excluded).
    fn n_attributes(&self) -> usize;

    /// Domain size of the given attribute.
    fn domain_size(&self, attribute: AttributeIndex) -> usize;

    /// Domain size of the class attribute.
    fn n_classes(&self) -> usize;

    /// Value index of `attribute` for the record at `record`.
    fn value(&self, record: usize, attribute: AttributeIndex) -> usize;

    /// Class index of the record at `record`.
    fn class_value(&self, record: usize) -> usize;

    /// Split into one sub-dataset per domain value of `attribute`.
    ///
    /// The result has exactly `domain_size(attribute)` entries, some possibly
    /// empty; record order is preserved inside each part.
    fn partition(&self, attribute: AttributeIndex) -> Vec<Self>;

    /// Return `true` when the dataset has no records.
    fn is_empty(&self) -> bool {
        self.n_records() == 0
    }
}

/// A validated in-memory table of nominal records.
#[derive(Debug, Clone, PartialEq)]
pub struct NominalTable {
    rows: Vec<Vec<usize>>,
    labels: Vec<usize>,
    domain_sizes: Vec<usize>,
    n_classes: usize,
}

impl NominalTable {
    /// Build a table from row-major value indices and class labels.
    ///
    /// `rows[record][attribute]` is a value index, `labels[record]` a class
    /// index, `domain_sizes[attribute]` the attribute's domain size.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::ZeroClasses`] | `n_classes` is zero |
    /// | [`TreeError::LabelCountMismatch`] | `rows.len() != labels.len()` |
    /// | [`TreeError::RecordWidthMismatch`] | a row length differs from `domain_sizes.len()` |
    /// | [`TreeError::ValueOutOfDomain`] | a value is not below its domain size |
    /// | [`TreeError::ClassOutOfDomain`] | a label is not below `n_classes` |
    pub fn new(
        rows: Vec<Vec<usize>>,
        labels: Vec<usize>,
        domain_sizes: Vec<usize>,
        n_classes: usize,
    ) -> Result<Self, TreeError> {
        if n_classes == 0 {
            return Err(TreeError::ZeroClasses);
        }
        if rows.len() != labels.len() {
            return Err(TreeError::LabelCountMismatch {
                records: rows.len(),
                labels: labels.len(),
            });
        }
        for row in &rows {
            check_record(row, &domain_sizes)?;
        }
        if let Some(&class) = labels.iter().find(|&&c| c >= n_classes) {
            return Err(TreeError::ClassOutOfDomain { class, n_classes });
        }
        Ok(Self {
            rows,
            labels,
            domain_sizes,
            n_classes,
        })
    }

    /// Return the attribute values of the record at `record`.
    #[must_use]
    pub fn record(&self, record: usize) -> &[usize] {
        &self.rows[record]
    }

    /// Return all class labels in record order.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Return the domain size of every attribute.
    #[must_use]
    pub fn domain_sizes(&self) -> &[usize] {
        &self.domain_sizes
    }

    fn empty_like(&self) -> Self {
        Self {
            rows: Vec::new(),
            labels: Vec::new(),
            domain_sizes: self.domain_sizes.clone(),
            n_classes: self.n_classes,
        }
    }
}

impl NominalDataset for NominalTable {
    fn n_records(&self) -> usize {
        self.rows.len()
    }

    fn n_attributes(&self) -> usize {
        self.domain_sizes.len()
    }

    fn domain_size(&self, attribute: AttributeIndex) -> usize {
        self.domain_sizes[attribute.index()]
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn value(&self, record: usize, attribute: AttributeIndex) -> usize {
        self.rows[record][attribute.index()]
    }

    fn class_value(&self, record: usize) -> usize {
        self.labels[record]
    }

    fn partition(&self, attribute: AttributeIndex) -> Vec<Self> {
        let mut parts: Vec<Self> = (0..self.domain_size(attribute))
            .map(|_| self.empty_like())
            .collect();
        for (row, &label) in self.rows.iter().zip(&self.labels) {
            let part = &mut parts[row[attribute.index()]];
            part.rows.push(row.clone());
            part.labels.push(label);
        }
        parts
    }
}

/// Check a single record against a list of attribute domain sizes.
pub(crate) fn check_record(record: &[usize], domain_sizes: &[usize]) -> Result<(), TreeError> {
    if record.len() != domain_sizes.len() {
        return Err(TreeError::RecordWidthMismatch {
            expected: domain_sizes.len(),
            got: record.len(),
        });
    }
    for (attribute, (&value, &domain_size)) in record.iter().zip(domain_sizes).enumerate() {
        if value >= domain_size {
            return Err(TreeError::ValueOutOfDomain {
                attribute,
                value,
                domain_size,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> NominalTable {
        NominalTable::new(
            vec![vec![0, 1], vec![2, 0], vec![0, 0], vec![2, 1], vec![0, 1]],
            vec![0, 1, 0, 1, 1],
            vec![3, 2],
            2,
        )
        .unwrap()
    }

    #[test]
    fn partition_has_one_part_per_domain_value() {
        let parts = table().partition(AttributeIndex::new(0));
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].n_records(), 3);
        assert!(parts[1].is_empty());
        assert_eq!(parts[2].n_records(), 2);
    }

    #[test]
    fn partition_covers_every_record() {
        let t = table();
        for attribute in 0..t.n_attributes() {
            let parts = t.partition(AttributeIndex::new(attribute));
            let total: usize = parts.iter().map(NominalDataset::n_records).sum();
            assert_eq!(total, t.n_records());
        }
    }

    #[test]
    fn partition_preserves_order_and_labels() {
        let parts = table().partition(AttributeIndex::new(0));
        assert_eq!(parts[0].labels(), &[0, 0, 1]);
        assert_eq!(parts[2].record(0), &[2, 0]);
        assert_eq!(parts[2].domain_sizes(), &[3, 2]);
    }

    #[test]
    fn rejects_zero_classes() {
        let err = NominalTable::new(vec![], vec![], vec![2], 0).unwrap_err();
        assert_eq!(err, TreeError::ZeroClasses);
    }

    #[test]
    fn rejects_label_count_mismatch() {
        let err = NominalTable::new(vec![vec![0]], vec![], vec![2], 2).unwrap_err();
        assert!(matches!(err, TreeError::LabelCountMismatch { records: 1, labels: 0 }));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = NominalTable::new(vec![vec![0, 1], vec![0]], vec![0, 1], vec![2, 2], 2)
            .unwrap_err();
        assert!(matches!(err, TreeError::RecordWidthMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn rejects_value_outside_domain() {
        let err = NominalTable::new(vec![vec![0, 2]], vec![0], vec![2, 2], 2).unwrap_err();
        assert!(matches!(
            err,
            TreeError::ValueOutOfDomain { attribute: 1, value: 2, domain_size: 2 }
        ));
    }

    #[test]
    fn rejects_class_outside_domain() {
        let err = NominalTable::new(vec![vec![0]], vec![3], vec![2], 2).unwrap_err();
        assert!(matches!(err, TreeError::ClassOutOfDomain { class: 3, n_classes: 2 }));
    }
}
