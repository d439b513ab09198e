//! Record classification with depth statistics.

use crate::dataset::{NominalDataset, check_record};
use crate::error::TreeError;
use crate::node::AttributeIndex;
use crate::tree::DecisionTree;

/// Depth statistics accumulated over classifications.
///
/// Depth is the number of edges followed from the root before the
/// classification stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthStats {
    max_depth: usize,
    depth_sum: usize,
    n_classified: usize,
}

impl DepthStats {
    fn record(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
        self.depth_sum += depth;
        self.n_classified += 1;
    }

    /// Deepest depth reached.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Mean depth reached, 0.0 when nothing was classified.
    #[must_use]
    pub fn average_depth(&self) -> f64 {
        if self.n_classified == 0 {
            0.0
        } else {
            self.depth_sum as f64 / self.n_classified as f64
        }
    }

    /// Number of classifications recorded.
    #[must_use]
    pub fn n_classified(&self) -> usize {
        self.n_classified
    }
}

/// Classifies records with a fitted [`DecisionTree`] and tracks how deep
/// each classification went.
///
/// The statistics belong to this value, so two classifiers over the same
/// tree never observe each other's records.
#[derive(Debug, Clone)]
pub struct Classifier<'t> {
    tree: &'t DecisionTree,
    stats: DepthStats,
}

impl<'t> Classifier<'t> {
    /// Create a classifier with empty statistics.
    #[must_use]
    pub fn new(tree: &'t DecisionTree) -> Self {
        Self {
            tree,
            stats: DepthStats::default(),
        }
    }

    /// Return the tree being applied.
    #[must_use]
    pub fn tree(&self) -> &'t DecisionTree {
        self.tree
    }

    /// Classify a record of attribute value indices and update the depth
    /// statistics.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::RecordWidthMismatch`] | `record.len() != n_attributes` |
    /// | [`TreeError::ValueOutOfDomain`] | a value is not below its domain size |
    pub fn classify(&mut self, record: &[usize]) -> Result<usize, TreeError> {
        check_record(record, &self.tree.domain_sizes)?;
        Ok(self.classify_with(|a| record[a.index()]))
    }

    /// Classify record `record` of `dataset` and update the depth statistics.
    ///
    /// The dataset must have the tree's attributes; values the tree never
    /// saw stop the walk like an absent child.
    pub fn classify_at<D: NominalDataset>(&mut self, dataset: &D, record: usize) -> usize {
        self.classify_with(|a| dataset.value(record, a))
    }

    fn classify_with(&mut self, value_of: impl Fn(AttributeIndex) -> usize) -> usize {
        let (node, depth) = self.tree.traverse(value_of);
        self.stats.record(depth);
        self.tree.node(node).prediction()
    }

    /// Deepest depth reached since the last reset.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.stats.max_depth()
    }

    /// Mean depth reached since the last reset, 0.0 when nothing was classified.
    #[must_use]
    pub fn average_depth(&self) -> f64 {
        self.stats.average_depth()
    }

    /// Number of records classified since the last reset.
    #[must_use]
    pub fn n_classified(&self) -> usize {
        self.stats.n_classified()
    }

    /// Return a snapshot of the statistics.
    #[must_use]
    pub fn stats(&self) -> DepthStats {
        self.stats
    }

    /// Clear the depth statistics.
    pub fn reset(&mut self) {
        self.stats = DepthStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::NominalTable;
    use crate::tree::DecisionTreeConfig;

    fn conjunction() -> NominalTable {
        NominalTable::new(
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]],
            vec![0, 0, 0, 1],
            vec![2, 2],
            2,
        )
        .unwrap()
    }

    #[test]
    fn fresh_classifier_has_empty_stats() {
        let tree = DecisionTreeConfig::new().fit(&conjunction()).unwrap();
        let classifier = Classifier::new(&tree);
        assert_eq!(classifier.max_depth(), 0);
        assert_eq!(classifier.n_classified(), 0);
        assert!(classifier.average_depth().abs() < f64::EPSILON);
    }

    #[test]
    fn depth_stats_track_stopping_depth() {
        let tree = DecisionTreeConfig::new().fit(&conjunction()).unwrap();
        let mut classifier = Classifier::new(&tree);

        // a0 = 0 stops at depth 1, a0 = 1 goes on to depth 2.
        assert_eq!(classifier.classify(&[0, 1]).unwrap(), 0);
        assert_eq!(classifier.max_depth(), 1);
        assert_eq!(classifier.classify(&[1, 1]).unwrap(), 1);
        assert_eq!(classifier.max_depth(), 2);
        assert_eq!(classifier.n_classified(), 2);
        assert!((classifier.average_depth() - 1.5).abs() < 1e-12);

        classifier.reset();
        assert_eq!(classifier.max_depth(), 0);
        assert_eq!(classifier.n_classified(), 0);
    }

    #[test]
    fn classify_at_matches_classify() {
        let data = conjunction();
        let tree = DecisionTreeConfig::new().fit(&data).unwrap();
        let mut by_index = Classifier::new(&tree);
        let mut by_record = Classifier::new(&tree);
        for i in 0..data.n_records() {
            assert_eq!(
                by_index.classify_at(&data, i),
                by_record.classify(data.record(i)).unwrap()
            );
        }
        assert_eq!(by_index.stats(), by_record.stats());
    }

    #[test]
    fn invalid_records_leave_stats_untouched() {
        let tree = DecisionTreeConfig::new().fit(&conjunction()).unwrap();
        let mut classifier = Classifier::new(&tree);
        assert!(matches!(
            classifier.classify(&[0]),
            Err(TreeError::RecordWidthMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            classifier.classify(&[0, 5]),
            Err(TreeError::ValueOutOfDomain { attribute: 1, value: 5, domain_size: 2 })
        ));
        assert_eq!(classifier.n_classified(), 0);
    }

    #[test]
    fn classifiers_do_not_share_stats() {
        let tree = DecisionTreeConfig::new().fit(&conjunction()).unwrap();
        let mut first = Classifier::new(&tree);
        let second = Classifier::new(&tree);
        first.classify(&[1, 0]).unwrap();
        assert_eq!(first.n_classified(), 1);
        assert_eq!(second.n_classified(), 0);
    }
}
