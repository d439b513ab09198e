use crate::dataset::NominalDataset;
use crate::impurity::ImpurityCriterion;
use crate::node::AttributeIndex;
use crate::probability::{
    attribute_value_probabilities, class_probabilities, class_probabilities_given_value,
};

/// Gains at or below this are rounding noise from summing conditional
/// impurities and count as no gain.
const GAIN_TOLERANCE: f64 = 1e-12;

/// Best attribute found for a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitResult {
    /// Attribute to split on.
    pub attribute: AttributeIndex,
    /// Information gain of splitting on `attribute`.
    pub gain: f64,
}

/// Impurity reduction from partitioning `dataset` on `attribute`.
///
/// `impurity(class) - Σ_v P(attribute = v) · impurity(class | attribute = v)`
/// over every value of the attribute's domain. Values that no record carries
/// have zero weight. Results within rounding of zero are reported as exactly
/// `0.0`, so an attribute independent of the class never has positive gain.
#[must_use]
pub fn information_gain<D: NominalDataset>(
    dataset: &D,
    attribute: AttributeIndex,
    criterion: ImpurityCriterion,
) -> f64 {
    let parent = criterion.impurity(&class_probabilities(dataset)).value();
    let weights = attribute_value_probabilities(dataset, attribute);

    let weighted_children: f64 = weights
        .iter()
        .enumerate()
        .map(|(value, &weight)| {
            let conditional = class_probabilities_given_value(dataset, attribute, value);
            weight * criterion.impurity(&conditional).value()
        })
        .sum();

    let gain = parent - weighted_children;
    if gain <= GAIN_TOLERANCE { 0.0 } else { gain }
}

/// Find the attribute with strictly maximal information gain.
///
/// Attributes are scanned in index order and only a strict improvement
/// replaces the current best, so the earliest attribute wins ties.
/// Returns `None` when no attribute has positive gain.
#[must_use]
pub fn find_best_attribute<D: NominalDataset>(
    dataset: &D,
    criterion: ImpurityCriterion,
) -> Option<SplitResult> {
    let mut best: Option<SplitResult> = None;
    let mut best_gain = 0.0;

    for attribute in (0..dataset.n_attributes()).map(AttributeIndex::new) {
        let gain = information_gain(dataset, attribute, criterion);
        if gain > best_gain {
            best_gain = gain;
            best = Some(SplitResult { attribute, gain });
        }
    }

    best
}
