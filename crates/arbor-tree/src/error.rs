/// Errors from tree induction, pruning, and classification.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// Returned when a dataset used for training or evaluation has zero records.
    #[error("dataset has zero records")]
    EmptyDataset,

    /// Returned when the class attribute has an empty domain.
    #[error("class attribute has zero values")]
    ZeroClasses,

    /// Returned when the chi-square test is requested for a non-binary class.
    #[error("chi-square pruning requires exactly 2 class values, got {n_classes}")]
    NonBinaryClass {
        /// The number of class values in the dataset.
        n_classes: usize,
    },

    /// Returned when a candidate split has more degrees of freedom than the
    /// critical-value table covers.
    #[error("chi-square table covers 1..={max} degrees of freedom, got {degrees_of_freedom}")]
    DegreesOfFreedomOutOfRange {
        /// The degrees of freedom of the candidate split.
        degrees_of_freedom: usize,
        /// The largest degrees of freedom in the table.
        max: usize,
    },

    /// Returned when a record has a different number of attributes than expected.
    #[error("record has {got} attributes, expected {expected}")]
    RecordWidthMismatch {
        /// The expected number of attributes.
        expected: usize,
        /// The actual number of attributes in the record.
        got: usize,
    },

    /// Returned when the number of class labels differs from the number of records.
    #[error("{records} records but {labels} class labels")]
    LabelCountMismatch {
        /// The number of attribute rows.
        records: usize,
        /// The number of class labels.
        labels: usize,
    },

    /// Returned when an attribute value lies outside its attribute's domain.
    #[error("value {value} of attribute {attribute} is outside its domain of {domain_size} values")]
    ValueOutOfDomain {
        /// The zero-based attribute index.
        attribute: usize,
        /// The offending value index.
        value: usize,
        /// The size of the attribute's domain.
        domain_size: usize,
    },

    /// Returned when an impurity criterion name is not recognised.
    #[error("unknown impurity criterion \"{name}\" (expected gini or entropy)")]
    UnknownCriterion {
        /// The name that failed to parse.
        name: String,
    },

    /// Returned when a class label lies outside the class domain.
    #[error("class {class} is outside the class domain of {n_classes} values")]
    ClassOutOfDomain {
        /// The offending class index.
        class: usize,
        /// The size of the class domain.
        n_classes: usize,
    },
}
