//! Empirical class and attribute-value distributions.

use crate::dataset::NominalDataset;
use crate::node::AttributeIndex;

/// Fraction of records per class value, length `n_classes`.
///
/// Returns all zeros for an empty dataset.
#[must_use]
pub fn class_probabilities<D: NominalDataset>(dataset: &D) -> Vec<f64> {
    let mut counts = vec![0usize; dataset.n_classes()];
    for record in 0..dataset.n_records() {
        counts[dataset.class_value(record)] += 1;
    }
    normalize(&counts, dataset.n_records())
}

/// Fraction of records per value of `attribute`, length `domain_size(attribute)`.
#[must_use]
pub fn attribute_value_probabilities<D: NominalDataset>(
    dataset: &D,
    attribute: AttributeIndex,
) -> Vec<f64> {
    let mut counts = vec![0usize; dataset.domain_size(attribute)];
    for record in 0..dataset.n_records() {
        counts[dataset.value(record, attribute)] += 1;
    }
    normalize(&counts, dataset.n_records())
}

/// Class distribution over the records whose `attribute` equals `value`.
///
/// Returns all zeros when no record matches.
#[must_use]
pub fn class_probabilities_given_value<D: NominalDataset>(
    dataset: &D,
    attribute: AttributeIndex,
    value: usize,
) -> Vec<f64> {
    let mut counts = vec![0usize; dataset.n_classes()];
    let mut matching = 0usize;
    for record in 0..dataset.n_records() {
        if dataset.value(record, attribute) == value {
            counts[dataset.class_value(record)] += 1;
            matching += 1;
        }
    }
    normalize(&counts, matching)
}

/// Index of the most probable class; the first strict maximum wins.
///
/// Returns 0 when every probability is zero.
#[must_use]
pub fn majority_class(probabilities: &[f64]) -> usize {
    let mut best = 0.0;
    let mut best_class = 0;
    for (class, &p) in probabilities.iter().enumerate() {
        if p > best {
            best = p;
            best_class = class;
        }
    }
    best_class
}

fn normalize(counts: &[usize], total: usize) -> Vec<f64> {
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    let n = total as f64;
    counts.iter().map(|&c| c as f64 / n).collect()
}
