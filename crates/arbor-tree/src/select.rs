//! Criterion and confidence-level selection against a validation set.

use tracing::{info, instrument};

use crate::classify::Classifier;
use crate::dataset::NominalDataset;
use crate::error::TreeError;
use crate::impurity::ImpurityCriterion;
use crate::pruning::ConfidenceLevel;
use crate::tree::{DecisionTree, DecisionTreeConfig};

/// Validation error of unpruned trees under each criterion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionComparison {
    /// Validation error of the Gini tree.
    pub gini_error: f64,
    /// Validation error of the Entropy tree.
    pub entropy_error: f64,
}

impl CriterionComparison {
    /// Entropy only when it is strictly better, Gini otherwise.
    #[must_use]
    pub fn chosen(&self) -> ImpurityCriterion {
        if self.entropy_error < self.gini_error {
            ImpurityCriterion::Entropy
        } else {
            ImpurityCriterion::Gini
        }
    }
}

/// One confidence level of a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepEntry {
    /// Confidence level the tree was built with.
    pub confidence: ConfidenceLevel,
    /// Node count of the tree.
    pub n_nodes: usize,
    /// Error on the training set.
    pub training_error: f64,
    /// Error on the validation set.
    pub validation_error: f64,
    /// Deepest depth reached on the validation set.
    pub max_depth: usize,
    /// Mean depth reached on the validation set.
    pub average_depth: f64,
}

/// Outcome of [`ModelSelection::run`].
#[derive(Debug, Clone)]
pub struct SelectionReport {
    /// Criterion comparison that fixed the sweep's criterion.
    pub comparison: CriterionComparison,
    /// Criterion used for the sweep.
    pub criterion: ImpurityCriterion,
    /// One entry per allowed confidence level, in table order.
    pub sweep: Vec<SweepEntry>,
    /// Index into `sweep` of the selected entry.
    pub best_index: usize,
    /// Tree built with the selected settings.
    pub best_tree: DecisionTree,
}

impl SelectionReport {
    /// Return the selected sweep entry.
    #[must_use]
    pub fn best(&self) -> &SweepEntry {
        &self.sweep[self.best_index]
    }

    /// Error of the selected tree on `test`.
    ///
    /// # Errors
    ///
    /// Same as [`Classifier::average_error`].
    pub fn test_error<D: NominalDataset>(&self, test: &D) -> Result<f64, TreeError> {
        Classifier::new(&self.best_tree).average_error(test)
    }
}

/// Chooses a criterion and a pruning confidence level by validation error.
#[derive(Debug, Clone, Copy)]
pub struct ModelSelection<'d, D> {
    train: &'d D,
    validation: &'d D,
}

impl<'d, D: NominalDataset> ModelSelection<'d, D> {
    /// Create a selection over a training and a validation set.
    #[must_use]
    pub fn new(train: &'d D, validation: &'d D) -> Self {
        Self { train, validation }
    }

    /// Build unpruned Gini and Entropy trees and compare validation error.
    ///
    /// # Errors
    ///
    /// Any [`TreeError`] from fitting or evaluating.
    #[instrument(skip_all)]
    pub fn compare_criteria(&self) -> Result<CriterionComparison, TreeError> {
        let error_of = |criterion| -> Result<f64, TreeError> {
            let tree = DecisionTreeConfig::new()
                .with_criterion(criterion)
                .fit(self.train)?;
            Classifier::new(&tree).average_error(self.validation)
        };

        let comparison = CriterionComparison {
            gini_error: error_of(ImpurityCriterion::Gini)?,
            entropy_error: error_of(ImpurityCriterion::Entropy)?,
        };
        info!(
            gini_error = comparison.gini_error,
            entropy_error = comparison.entropy_error,
            chosen = %comparison.chosen(),
            "criteria compared"
        );
        Ok(comparison)
    }

    /// Build one tree per allowed confidence level under `criterion`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::NonBinaryClass`] | the class is not binary (pruning levels need it) |
    /// | Other tree errors | From fitting or evaluating |
    pub fn sweep(&self, criterion: ImpurityCriterion) -> Result<Vec<SweepEntry>, TreeError> {
        Ok(self
            .sweep_trees(criterion)?
            .into_iter()
            .map(|(entry, _)| entry)
            .collect())
    }

    #[instrument(skip_all, fields(criterion = %criterion))]
    fn sweep_trees(
        &self,
        criterion: ImpurityCriterion,
    ) -> Result<Vec<(SweepEntry, DecisionTree)>, TreeError> {
        ConfidenceLevel::all()
            .map(|confidence| self.sweep_level(criterion, confidence))
            .collect()
    }

    fn sweep_level(
        &self,
        criterion: ImpurityCriterion,
        confidence: ConfidenceLevel,
    ) -> Result<(SweepEntry, DecisionTree), TreeError> {
        let tree = DecisionTreeConfig::new()
            .with_criterion(criterion)
            .with_confidence(confidence)
            .fit(self.train)?;

        let mut classifier = Classifier::new(&tree);
        let training_error = classifier.average_error(self.train)?;
        // Depth statistics come from the validation pass.
        let validation_error = classifier.average_error(self.validation)?;
        let entry = SweepEntry {
            confidence,
            n_nodes: tree.n_nodes(),
            training_error,
            validation_error,
            max_depth: classifier.max_depth(),
            average_depth: classifier.average_depth(),
        };

        info!(
            confidence = %confidence,
            n_nodes = entry.n_nodes,
            training_error,
            validation_error,
            "sweep entry"
        );
        Ok((entry, tree))
    }

    /// Compare criteria, sweep confidence levels under the chosen one, and
    /// keep the entry with the lowest validation error (earliest on ties).
    ///
    /// # Errors
    ///
    /// Any error from [`ModelSelection::compare_criteria`] or
    /// [`ModelSelection::sweep`].
    #[instrument(skip_all)]
    pub fn run(&self) -> Result<SelectionReport, TreeError> {
        let comparison = self.compare_criteria()?;
        let criterion = comparison.chosen();

        // The unpruned level comes first and seeds the best entry.
        let (first, mut best_tree) = self.sweep_level(criterion, ConfidenceLevel::NO_PRUNING)?;
        let mut sweep: Vec<SweepEntry> = vec![first];
        let mut best_index = 0;
        for confidence in ConfidenceLevel::all().filter(|c| c.is_pruning()) {
            let (entry, tree) = self.sweep_level(criterion, confidence)?;
            if entry.validation_error < sweep[best_index].validation_error {
                best_index = sweep.len();
                best_tree = tree;
            }
            sweep.push(entry);
        }

        let report = SelectionReport {
            comparison,
            criterion,
            sweep,
            best_index,
            best_tree,
        };
        info!(
            confidence = %report.best().confidence,
            validation_error = report.best().validation_error,
            "model selected"
        );
        Ok(report)
    }
}
