//! Categorical decision trees: induce, prune, classify, evaluate.
//!
//! Trees are grown greedily over nominal attributes with Gini or Entropy
//! impurity, optionally pruned by a chi-square independence test, and
//! applied by walking from the root. A [`Classifier`] tracks how deep each
//! classification went, and [`ModelSelection`] picks a criterion and a
//! confidence level against a validation set.

mod classify;
mod dataset;
mod display;
mod error;
mod eval;
mod impurity;
mod node;
mod probability;
mod pruning;
mod select;
mod split;
mod tree;

pub use classify::{Classifier, DepthStats};
pub use dataset::{NominalDataset, NominalTable};
pub use display::{IndexVocabulary, TreeDisplay, Vocabulary};
pub use error::TreeError;
pub use eval::Evaluation;
pub use impurity::ImpurityCriterion;
pub use node::{AttributeIndex, Impurity, Node, NodeIndex};
pub use probability::{
    attribute_value_probabilities, class_probabilities, class_probabilities_given_value,
    majority_class,
};
pub use pruning::{
    ChiSquare, ConfidenceLevel, MAX_DEGREES_OF_FREEDOM, allowed_confidence_levels, chi_square,
    should_prune,
};
pub use select::{CriterionComparison, ModelSelection, SelectionReport, SweepEntry};
pub use split::{SplitResult, find_best_attribute, information_gain};
pub use tree::{DecisionTree, DecisionTreeConfig};
