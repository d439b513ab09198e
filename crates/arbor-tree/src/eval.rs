//! Error rate and depth evaluation of a fitted tree over a dataset.

use tracing::{debug, instrument};

use crate::classify::Classifier;
use crate::dataset::NominalDataset;
use crate::error::TreeError;

/// Result of classifying every record of a dataset.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Number of records classified.
    pub n_records: usize,
    /// Number of records whose prediction differs from their class.
    pub misclassified: usize,
    /// `misclassified / n_records`.
    pub error_rate: f64,
    /// Deepest depth reached during the pass.
    pub max_depth: usize,
    /// Mean depth reached during the pass.
    pub average_depth: f64,
}

impl Classifier<'_> {
    /// Fraction of records of `dataset` the tree misclassifies.
    ///
    /// Depth statistics are reset first, so afterwards they describe only
    /// this pass.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::EmptyDataset`] | `dataset` has no records |
    /// | [`TreeError::RecordWidthMismatch`] | attribute count differs from the tree's |
    pub fn average_error<D: NominalDataset>(&mut self, dataset: &D) -> Result<f64, TreeError> {
        self.check_dataset(dataset)?;
        self.reset();

        let misclassified = (0..dataset.n_records())
            .filter(|&i| self.classify_at(dataset, i) != dataset.class_value(i))
            .count();

        Ok(misclassified as f64 / dataset.n_records() as f64)
    }

    /// Classify every record of `dataset`, collecting misclassification
    /// counts and depth statistics.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::EmptyDataset`] | `dataset` has no records |
    /// | [`TreeError::RecordWidthMismatch`] | attribute count differs from the tree's |
    #[instrument(skip_all, fields(n_records = dataset.n_records()))]
    pub fn evaluate<D: NominalDataset>(&mut self, dataset: &D) -> Result<Evaluation, TreeError> {
        self.check_dataset(dataset)?;
        self.reset();

        let n_records = dataset.n_records();
        let misclassified = (0..n_records)
            .filter(|&i| self.classify_at(dataset, i) != dataset.class_value(i))
            .count();

        let evaluation = Evaluation {
            n_records,
            misclassified,
            error_rate: misclassified as f64 / n_records as f64,
            max_depth: self.max_depth(),
            average_depth: self.average_depth(),
        };

        debug!(
            misclassified,
            error_rate = evaluation.error_rate,
            max_depth = evaluation.max_depth,
            average_depth = evaluation.average_depth,
            "evaluation complete"
        );

        Ok(evaluation)
    }

    fn check_dataset<D: NominalDataset>(&self, dataset: &D) -> Result<(), TreeError> {
        if dataset.is_empty() {
            return Err(TreeError::EmptyDataset);
        }
        let expected = self.tree().n_attributes();
        if dataset.n_attributes() != expected {
            return Err(TreeError::RecordWidthMismatch {
                expected,
                got: dataset.n_attributes(),
            });
        }
        Ok(())
    }
}
