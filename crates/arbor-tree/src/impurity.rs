use std::fmt;
use std::str::FromStr;

use crate::error::TreeError;
use crate::node::Impurity;

/// Criterion for measuring the class heterogeneity of a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImpurityCriterion {
    /// Gini index: 1 - Σ(p_i²)
    #[default]
    Gini,
    /// Information entropy in bits: -Σ(p_i · log2(p_i))
    Entropy,
}

impl ImpurityCriterion {
    /// Both criteria, Gini first.
    pub const ALL: [ImpurityCriterion; 2] = [ImpurityCriterion::Gini, ImpurityCriterion::Entropy];

    /// Compute the impurity of a class probability distribution.
    ///
    /// For `Gini`: `1 - Σ(p_i²)`.
    /// For `Entropy`: `-Σ(p_i · log2(p_i))` summed only over classes where `p_i > 0`.
    ///
    /// An all-zero vector (no records) has Gini impurity 1 and entropy 0.
    #[must_use]
    pub fn impurity(&self, probabilities: &[f64]) -> Impurity {
        let value = match self {
            ImpurityCriterion::Gini => {
                1.0 - probabilities.iter().map(|&p| p * p).sum::<f64>()
            }
            ImpurityCriterion::Entropy => {
                -probabilities
                    .iter()
                    .filter(|&&p| p > 0.0)
                    .map(|&p| p * p.log2())
                    .sum::<f64>()
            }
        };
        Impurity::new(value)
    }
}

impl fmt::Display for ImpurityCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpurityCriterion::Gini => f.write_str("gini"),
            ImpurityCriterion::Entropy => f.write_str("entropy"),
        }
    }
}

impl FromStr for ImpurityCriterion {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gini" => Ok(ImpurityCriterion::Gini),
            "entropy" => Ok(ImpurityCriterion::Entropy),
            _ => Err(TreeError::UnknownCriterion { name: s.to_string() }),
        }
    }
}
