use tracing::{debug, instrument, trace, warn};

use crate::{
    TreeError,
    dataset::{NominalDataset, check_record},
    impurity::ImpurityCriterion,
    node::{AttributeIndex, Node, NodeIndex},
    probability::{class_probabilities, majority_class},
    pruning::{ConfidenceLevel, should_prune},
    split::find_best_attribute,
};

/// Configuration for inducing a categorical decision tree.
///
/// Construct via [`DecisionTreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter    | Default                 |
/// |--------------|-------------------------|
/// | `criterion`  | `Gini`                  |
/// | `confidence` | `1.0` (no pruning)      |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionTreeConfig {
    pub(crate) criterion: ImpurityCriterion,
    pub(crate) confidence: ConfidenceLevel,
}

impl DecisionTreeConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            criterion: ImpurityCriterion::Gini,
            confidence: ConfidenceLevel::NO_PRUNING,
        }
    }

    /// Set the impurity criterion used to score splits.
    #[must_use]
    pub fn with_criterion(mut self, criterion: ImpurityCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set the chi-square confidence level by value.
    ///
    /// Values outside [`allowed_confidence_levels`](crate::allowed_confidence_levels)
    /// are ignored and the previous level is kept.
    #[must_use]
    pub fn with_confidence_level(mut self, level: f64) -> Self {
        match ConfidenceLevel::from_value(level) {
            Some(confidence) => self.confidence = confidence,
            None => warn!(
                level,
                kept = self.confidence.value(),
                "ignoring confidence level outside the allowed set"
            ),
        }
        self
    }

    /// Set the chi-square confidence level.
    #[must_use]
    pub fn with_confidence(mut self, confidence: ConfidenceLevel) -> Self {
        self.confidence = confidence;
        self
    }

    // --- Getters ---

    /// Return the impurity criterion.
    #[must_use]
    pub fn criterion(&self) -> ImpurityCriterion {
        self.criterion
    }

    /// Return the chi-square confidence level.
    #[must_use]
    pub fn confidence(&self) -> ConfidenceLevel {
        self.confidence
    }

    /// Induce a decision tree from `dataset`.
    ///
    /// # Errors
    ///
    /// | Variant                                   | When                                              |
    /// |-------------------------------------------|---------------------------------------------------|
    /// | [`TreeError::EmptyDataset`]               | `dataset` has no records                          |
    /// | [`TreeError::ZeroClasses`]                | the class domain is empty                         |
    /// | [`TreeError::NonBinaryClass`]             | pruning is enabled and the class is not binary    |
    /// | [`TreeError::DegreesOfFreedomOutOfRange`] | a tested split has more than 13 observed values   |
    #[instrument(
        skip(self, dataset),
        fields(
            n_records = dataset.n_records(),
            criterion = %self.criterion,
            confidence = %self.confidence,
        )
    )]
    pub fn fit<D: NominalDataset>(&self, dataset: &D) -> Result<DecisionTree, TreeError> {
        // --- Validate inputs ---
        if dataset.is_empty() {
            return Err(TreeError::EmptyDataset);
        }

        let n_classes = dataset.n_classes();
        if n_classes == 0 {
            return Err(TreeError::ZeroClasses);
        }

        if self.confidence.is_pruning() && n_classes != 2 {
            return Err(TreeError::NonBinaryClass { n_classes });
        }

        let n_attributes = dataset.n_attributes();
        let domain_sizes: Vec<usize> = (0..n_attributes)
            .map(|a| dataset.domain_size(AttributeIndex::new(a)))
            .collect();

        debug!(
            n_attributes = n_attributes,
            n_classes = n_classes,
            "fitting decision tree"
        );

        let mut arena: Vec<Node> = Vec::new();
        let root = build_tree(dataset, self, 0, &mut arena)?;
        debug_assert_eq!(root, NodeIndex::ROOT);

        let tree = DecisionTree {
            nodes: arena,
            domain_sizes,
            n_classes,
            criterion: self.criterion,
            confidence: self.confidence,
        };

        debug!(
            n_nodes = tree.n_nodes(),
            n_leaves = tree.n_leaves(),
            height = tree.height(),
            "decision tree built"
        );

        Ok(tree)
    }
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively build the arena-based decision tree.
///
/// Returns the [`NodeIndex`] of the node just created in `arena`.
/// `dataset` is never empty: empty partitions leave an absent slot.
fn build_tree<D: NominalDataset>(
    dataset: &D,
    config: &DecisionTreeConfig,
    depth: usize,
    arena: &mut Vec<Node>,
) -> Result<NodeIndex, TreeError> {
    let n_records = dataset.n_records();
    let distribution = class_probabilities(dataset);
    let prediction = majority_class(&distribution);
    let impurity = config.criterion.impurity(&distribution);

    let leaf = |distribution: Vec<f64>| Node::Leaf {
        prediction,
        distribution,
        impurity,
        n_records,
        depth,
    };

    if impurity.is_pure() {
        return Ok(push(arena, leaf(distribution)));
    }

    let Some(split) = find_best_attribute(dataset, config.criterion) else {
        return Ok(push(arena, leaf(distribution)));
    };

    if should_prune(dataset, split.attribute, config.confidence)? {
        trace!(
            attribute = split.attribute.index(),
            gain = split.gain,
            depth,
            "split pruned by chi-square test"
        );
        return Ok(push(arena, leaf(distribution)));
    }

    // Arena pattern: push placeholder, recurse, then overwrite with the split.
    let node_idx = push(arena, leaf(Vec::new()));

    let parts = dataset.partition(split.attribute);
    let mut children = Vec::with_capacity(parts.len());
    for part in &parts {
        if part.is_empty() {
            children.push(None);
        } else {
            children.push(Some(build_tree(part, config, depth + 1, arena)?));
        }
    }

    arena[node_idx.index()] = Node::Split {
        attribute: split.attribute,
        children,
        prediction,
        distribution,
        impurity,
        n_records,
        depth,
    };

    Ok(node_idx)
}

fn push(arena: &mut Vec<Node>, node: Node) -> NodeIndex {
    let idx = arena.len();
    arena.push(node);
    NodeIndex::new(idx)
}

/// A fitted categorical decision tree.
///
/// Stored as an arena-based `Vec<Node>` with the root at [`NodeIndex::ROOT`].
/// The structure never changes after [`DecisionTreeConfig::fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) domain_sizes: Vec<usize>,
    pub(crate) n_classes: usize,
    pub(crate) criterion: ImpurityCriterion,
    pub(crate) confidence: ConfidenceLevel,
}

impl DecisionTree {
    /// Predict the class of a record of attribute value indices.
    ///
    /// Walks from the root, following the child slot for the record's value
    /// of each tested attribute. Stops at a leaf, or at a split whose slot for
    /// that value is empty, and returns that node's majority class.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::RecordWidthMismatch`] | `record.len() != n_attributes` |
    /// | [`TreeError::ValueOutOfDomain`] | a value is not below its domain size |
    pub fn predict(&self, record: &[usize]) -> Result<usize, TreeError> {
        check_record(record, &self.domain_sizes)?;
        let (node, _) = self.traverse(|a| record[a.index()]);
        Ok(self.nodes[node.index()].prediction())
    }

    /// Return the class distribution at the node where classification of
    /// `record` stops.
    ///
    /// # Errors
    ///
    /// Same as [`DecisionTree::predict`].
    pub fn predict_proba(&self, record: &[usize]) -> Result<Vec<f64>, TreeError> {
        check_record(record, &self.domain_sizes)?;
        let (node, _) = self.traverse(|a| record[a.index()]);
        Ok(self.nodes[node.index()].distribution().to_vec())
    }

    /// Walk from the root using `value_of` to read the record, returning the
    /// stopping node and the number of edges followed.
    ///
    /// A value with no child slot stops the walk like an absent child.
    pub(crate) fn traverse(
        &self,
        value_of: impl Fn(AttributeIndex) -> usize,
    ) -> (NodeIndex, usize) {
        let mut idx = NodeIndex::ROOT;
        let mut depth = 0usize;
        while let Node::Split {
            attribute,
            children,
            ..
        } = &self.nodes[idx.index()]
        {
            match children.get(value_of(*attribute)).copied().flatten() {
                Some(child) => {
                    idx = child;
                    depth += 1;
                }
                None => break,
            }
        }
        (idx, depth)
    }

    /// Return the root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[NodeIndex::ROOT.index()]
    }

    /// Return the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not belong to this tree.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.index()]
    }

    /// Return every node in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the total number of nodes in the tree (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the depth of the deepest node; a single-leaf tree has height 0.
    #[must_use]
    pub fn height(&self) -> usize {
        self.nodes.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Return the number of attributes a record must have.
    #[must_use]
    pub fn n_attributes(&self) -> usize {
        self.domain_sizes.len()
    }

    /// Return the size of the class domain.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Return the criterion the tree was induced with.
    #[must_use]
    pub fn criterion(&self) -> ImpurityCriterion {
        self.criterion
    }

    /// Return the confidence level the tree was induced with.
    #[must_use]
    pub fn confidence(&self) -> ConfidenceLevel {
        self.confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::NominalTable;

    fn separable() -> NominalTable {
        // attribute 0 separates; attribute 1 is noise.
        NominalTable::new(
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]],
            vec![0, 0, 1, 1],
            vec![2, 2],
            2,
        )
        .unwrap()
    }

    #[test]
    fn empty_dataset_error() {
        let empty = NominalTable::new(vec![], vec![], vec![2], 2).unwrap();
        let err = DecisionTreeConfig::new().fit(&empty).unwrap_err();
        assert_eq!(err, TreeError::EmptyDataset);
    }

    #[test]
    fn pure_dataset_single_leaf() {
        let t = NominalTable::new(vec![vec![0], vec![1], vec![2]], vec![1, 1, 1], vec![3], 3)
            .unwrap();
        let tree = DecisionTreeConfig::new().fit(&t).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert!(tree.root().is_leaf());
        assert!(tree.root().impurity().is_pure());
        assert_eq!(tree.root().prediction(), 1);
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn separable_data_splits_root() {
        for criterion in ImpurityCriterion::ALL {
            let tree = DecisionTreeConfig::new()
                .with_criterion(criterion)
                .fit(&separable())
                .unwrap();
            assert_eq!(tree.root().attribute(), Some(AttributeIndex::new(0)));
            assert_eq!(tree.n_nodes(), 3);
            assert_eq!(tree.n_leaves(), 2);
            assert_eq!(tree.height(), 1);
            assert_eq!(tree.predict(&[0, 1]).unwrap(), 0);
            assert_eq!(tree.predict(&[1, 0]).unwrap(), 1);
        }
    }

    #[test]
    fn children_slots_match_domain_size() {
        // attribute 0 has domain 4; values 1 and 3 never occur.
        let t = NominalTable::new(
            vec![vec![0], vec![0], vec![2], vec![2]],
            vec![0, 0, 1, 1],
            vec![4],
            2,
        )
        .unwrap();
        let tree = DecisionTreeConfig::new().fit(&t).unwrap();
        let children = tree.root().children().unwrap();
        assert_eq!(children.len(), 4);
        assert!(children[0].is_some());
        assert!(children[1].is_none());
        assert!(children[2].is_some());
        assert!(children[3].is_none());
    }

    #[test]
    fn absent_slot_stops_at_split() {
        // Value 1 of attribute 0 never occurs in training; majority is class 1.
        let t = NominalTable::new(
            vec![vec![0], vec![2], vec![2]],
            vec![0, 1, 1],
            vec![3],
            2,
        )
        .unwrap();
        let tree = DecisionTreeConfig::new().fit(&t).unwrap();
        assert!(!tree.root().is_leaf());
        assert_eq!(tree.predict(&[1]).unwrap(), 1);
        let proba = tree.predict_proba(&[1]).unwrap();
        assert!((proba[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn conjunction_needs_two_levels() {
        // class = a0 AND a1: root splits on a0 (earliest of a tie), then a1.
        let t = NominalTable::new(
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]],
            vec![0, 0, 0, 1],
            vec![2, 2],
            2,
        )
        .unwrap();
        let tree = DecisionTreeConfig::new().fit(&t).unwrap();
        assert_eq!(tree.root().attribute(), Some(AttributeIndex::new(0)));
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
        for (record, &label) in [[0, 0], [0, 1], [1, 0], [1, 1]].iter().zip(&[0, 0, 0, 1]) {
            assert_eq!(tree.predict(record).unwrap(), label);
        }
    }

    #[test]
    fn no_gain_dataset_is_single_leaf() {
        let t = NominalTable::new(
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]],
            vec![0, 1, 1, 0],
            vec![2, 2],
            2,
        )
        .unwrap();
        for criterion in ImpurityCriterion::ALL {
            let tree = DecisionTreeConfig::new().with_criterion(criterion).fit(&t).unwrap();
            assert_eq!(tree.n_nodes(), 1);
            assert!(!tree.root().impurity().is_pure());
        }
    }

    #[test]
    fn pruned_node_stays_leaf() {
        // 3 vs 1 per value: chi-square 2.0, pruned at 0.05 but kept at 0.25.
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for (value, class, n) in [(0, 0, 3), (0, 1, 1), (1, 0, 1), (1, 1, 3)] {
            for _ in 0..n {
                rows.push(vec![value]);
                labels.push(class);
            }
        }
        let t = NominalTable::new(rows, labels, vec![2], 2).unwrap();

        let kept = DecisionTreeConfig::new().with_confidence_level(0.25).fit(&t).unwrap();
        assert!(!kept.root().is_leaf());

        let pruned = DecisionTreeConfig::new().with_confidence_level(0.05).fit(&t).unwrap();
        assert!(pruned.root().is_leaf());
        assert!(pruned.root().attribute().is_none());
        assert_eq!(pruned.confidence().value(), 0.05);
    }

    #[test]
    fn unknown_confidence_level_is_ignored() {
        let config = DecisionTreeConfig::new()
            .with_confidence_level(0.05)
            .with_confidence_level(0.1);
        assert_eq!(config.confidence().value(), 0.05);
    }

    #[test]
    fn pruning_rejects_non_binary_class() {
        let t = NominalTable::new(vec![vec![0], vec![1], vec![2]], vec![0, 1, 2], vec![3], 3)
            .unwrap();
        let err = DecisionTreeConfig::new()
            .with_confidence_level(0.5)
            .fit(&t)
            .unwrap_err();
        assert_eq!(err, TreeError::NonBinaryClass { n_classes: 3 });

        // Without pruning, multi-class induction is fine.
        let tree = DecisionTreeConfig::new().fit(&t).unwrap();
        assert_eq!(tree.n_leaves(), 3);
    }

    #[test]
    fn prediction_width_mismatch() {
        let tree = DecisionTreeConfig::new().fit(&separable()).unwrap();
        let err = tree.predict(&[1]).unwrap_err();
        assert!(matches!(err, TreeError::RecordWidthMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn prediction_value_out_of_domain() {
        let tree = DecisionTreeConfig::new().fit(&separable()).unwrap();
        let err = tree.predict(&[2, 0]).unwrap_err();
        assert!(matches!(err, TreeError::ValueOutOfDomain { attribute: 0, .. }));
    }

    #[test]
    fn every_split_has_impure_training_population() {
        let tree = DecisionTreeConfig::new()
            .with_criterion(ImpurityCriterion::Entropy)
            .fit(&separable())
            .unwrap();
        for node in tree.nodes() {
            if node.impurity().is_pure() {
                assert!(node.is_leaf());
            }
            assert!(node.prediction() < tree.n_classes());
        }
    }
}
