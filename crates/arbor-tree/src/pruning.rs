//! Chi-square significance test deciding whether a candidate split is kept.

use std::fmt;

use crate::dataset::NominalDataset;
use crate::error::TreeError;
use crate::node::AttributeIndex;

/// Largest degrees of freedom covered by the critical-value table.
pub const MAX_DEGREES_OF_FREEDOM: usize = 12;

/// One row of the critical-value table.
struct ChiSquareRow {
    level: f64,
    critical_values: [f64; MAX_DEGREES_OF_FREEDOM],
}

/// Chi-square critical values indexed by degrees of freedom 1..=12.
///
/// The `1.0` row never prunes and is all zero.
static CHI_SQUARE_TABLE: [ChiSquareRow; 6] = [
    ChiSquareRow {
        level: 1.0,
        critical_values: [0.0; MAX_DEGREES_OF_FREEDOM],
    },
    ChiSquareRow {
        level: 0.75,
        // 8 degrees of freedom: 5.071 is the standard upper-0.75 quantile.
        critical_values: [
            0.102, 0.575, 1.213, 1.923, 2.675, 3.455, 4.255, 5.071, 5.899, 6.737, 7.584, 8.438,
        ],
    },
    ChiSquareRow {
        level: 0.5,
        critical_values: [
            0.455, 1.386, 2.366, 3.357, 4.351, 5.348, 6.346, 7.344, 8.343, 9.342, 10.341, 11.340,
        ],
    },
    ChiSquareRow {
        level: 0.25,
        critical_values: [
            1.323, 2.773, 4.108, 5.385, 6.626, 7.841, 9.037, 10.219, 11.389, 12.549, 13.701,
            14.845,
        ],
    },
    ChiSquareRow {
        level: 0.05,
        critical_values: [
            3.841, 5.991, 7.815, 9.488, 11.070, 12.592, 14.067, 15.507, 16.919, 18.307, 19.675,
            21.026,
        ],
    },
    ChiSquareRow {
        level: 0.005,
        critical_values: [
            7.879, 10.597, 12.838, 14.860, 16.750, 18.548, 20.278, 21.955, 23.589, 25.188, 26.757,
            28.300,
        ],
    },
];

/// A confidence level from the fixed set of allowed values.
///
/// Ordered from least to most strict: `1.0` (never prune) down to `0.005`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ConfidenceLevel(usize);

impl ConfidenceLevel {
    /// The level that disables pruning.
    pub const NO_PRUNING: ConfidenceLevel = ConfidenceLevel(0);

    /// Look up an allowed level by exact value.
    #[must_use]
    pub fn from_value(value: f64) -> Option<Self> {
        CHI_SQUARE_TABLE
            .iter()
            .position(|row| row.level == value)
            .map(ConfidenceLevel)
    }

    /// Every allowed level, in table order.
    pub fn all() -> impl Iterator<Item = ConfidenceLevel> {
        (0..CHI_SQUARE_TABLE.len()).map(ConfidenceLevel)
    }

    /// Return the numeric level.
    #[must_use]
    pub fn value(self) -> f64 {
        CHI_SQUARE_TABLE[self.0].level
    }

    /// Return `false` for the level that never prunes.
    #[must_use]
    pub fn is_pruning(self) -> bool {
        self != Self::NO_PRUNING
    }

    /// Critical value for `degrees_of_freedom` in `1..=12`.
    #[must_use]
    pub fn critical_value(self, degrees_of_freedom: usize) -> Option<f64> {
        let column = degrees_of_freedom.checked_sub(1)?;
        CHI_SQUARE_TABLE[self.0].critical_values.get(column).copied()
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// The allowed confidence levels, `1.0, 0.75, 0.5, 0.25, 0.05, 0.005`.
#[must_use]
pub fn allowed_confidence_levels() -> Vec<f64> {
    CHI_SQUARE_TABLE.iter().map(|row| row.level).collect()
}

/// Chi-square statistic of a candidate split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquare {
    /// Deviation of the observed class counts from independence.
    pub statistic: f64,
    /// Distinct observed attribute values minus one.
    pub degrees_of_freedom: usize,
}

/// Compute the chi-square statistic of splitting a binary-class dataset on `attribute`.
///
/// Values of the attribute that no record carries contribute nothing.
///
/// # Errors
///
/// Returns [`TreeError::NonBinaryClass`] unless the class has exactly two values.
pub fn chi_square<D: NominalDataset>(
    dataset: &D,
    attribute: AttributeIndex,
) -> Result<ChiSquare, TreeError> {
    let n_classes = dataset.n_classes();
    if n_classes != 2 {
        return Err(TreeError::NonBinaryClass { n_classes });
    }

    let domain_size = dataset.domain_size(attribute);
    // counts[value] = [class 0, class 1]
    let mut counts = vec![[0usize; 2]; domain_size];
    let mut priors = [0usize; 2];
    for record in 0..dataset.n_records() {
        let class = dataset.class_value(record);
        counts[dataset.value(record, attribute)][class] += 1;
        priors[class] += 1;
    }

    let n = dataset.n_records() as f64;
    let p0 = priors[0] as f64 / n;
    let p1 = priors[1] as f64 / n;

    let mut statistic = 0.0;
    let mut observed_values = 0usize;
    for &[observed0, observed1] in &counts {
        let d = observed0 + observed1;
        if d == 0 {
            continue;
        }
        observed_values += 1;
        let e0 = d as f64 * p0;
        let e1 = d as f64 * p1;
        statistic += (observed0 as f64 - e0).powi(2) / e0 + (observed1 as f64 - e1).powi(2) / e1;
    }

    Ok(ChiSquare {
        statistic,
        degrees_of_freedom: observed_values.saturating_sub(1),
    })
}

/// Decide whether splitting on `attribute` is statistically insignificant.
///
/// Prunes when the critical value at `level` exceeds the split's chi-square
/// statistic. A split with a single observed value is always pruned.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`TreeError::NonBinaryClass`] | pruning is enabled and the class is not binary |
/// | [`TreeError::DegreesOfFreedomOutOfRange`] | more than 13 distinct observed values |
pub fn should_prune<D: NominalDataset>(
    dataset: &D,
    attribute: AttributeIndex,
    level: ConfidenceLevel,
) -> Result<bool, TreeError> {
    if !level.is_pruning() {
        return Ok(false);
    }
    let chi = chi_square(dataset, attribute)?;
    if chi.degrees_of_freedom == 0 {
        return Ok(true);
    }
    let critical = level.critical_value(chi.degrees_of_freedom).ok_or(
        TreeError::DegreesOfFreedomOutOfRange {
            degrees_of_freedom: chi.degrees_of_freedom,
            max: MAX_DEGREES_OF_FREEDOM,
        },
    )?;
    Ok(critical > chi.statistic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::NominalTable;

    fn binary(rows: Vec<Vec<usize>>, labels: Vec<usize>, domain: usize) -> NominalTable {
        NominalTable::new(rows, labels, vec![domain], 2).unwrap()
    }

    /// 20 records; value 0 has 8 of class 0 and 2 of class 1, value 1 the reverse.
    fn strong_split() -> NominalTable {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for (value, class, n) in [(0, 0, 8), (0, 1, 2), (1, 0, 2), (1, 1, 8)] {
            for _ in 0..n {
                rows.push(vec![value]);
                labels.push(class);
            }
        }
        binary(rows, labels, 2)
    }

    /// 8 records; value 0 has 3 of class 0 and 1 of class 1, value 1 the reverse.
    fn weak_split() -> NominalTable {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for (value, class, n) in [(0, 0, 3), (0, 1, 1), (1, 0, 1), (1, 1, 3)] {
            for _ in 0..n {
                rows.push(vec![value]);
                labels.push(class);
            }
        }
        binary(rows, labels, 2)
    }

    #[test]
    fn allowed_levels_in_table_order() {
        assert_eq!(allowed_confidence_levels(), vec![1.0, 0.75, 0.5, 0.25, 0.05, 0.005]);
    }

    #[test]
    fn from_value_requires_exact_match() {
        assert_eq!(ConfidenceLevel::from_value(1.0), Some(ConfidenceLevel::NO_PRUNING));
        assert_eq!(ConfidenceLevel::from_value(0.05).map(ConfidenceLevel::value), Some(0.05));
        assert!(ConfidenceLevel::from_value(0.1).is_none());
    }

    #[test]
    fn critical_values_cover_one_to_twelve() {
        let level = ConfidenceLevel::from_value(0.05).unwrap();
        assert_eq!(level.critical_value(0), None);
        assert_eq!(level.critical_value(1), Some(3.841));
        assert_eq!(level.critical_value(12), Some(21.026));
        assert_eq!(level.critical_value(13), None);
    }

    #[test]
    fn loosest_row_matches_standard_quantiles() {
        let level = ConfidenceLevel::from_value(0.75).unwrap();
        assert_eq!(level.critical_value(1), Some(0.102));
        assert_eq!(level.critical_value(7), Some(4.255));
        assert_eq!(level.critical_value(8), Some(5.071));
        assert_eq!(level.critical_value(9), Some(5.899));
    }

    #[test]
    fn critical_values_grow_with_strictness() {
        let levels: Vec<ConfidenceLevel> = ConfidenceLevel::all().collect();
        for dof in 1..=MAX_DEGREES_OF_FREEDOM {
            for pair in levels.windows(2) {
                assert!(pair[0].critical_value(dof) < pair[1].critical_value(dof));
            }
        }
    }

    #[test]
    fn critical_values_grow_with_degrees_of_freedom() {
        for level in ConfidenceLevel::all().filter(|l| l.is_pruning()) {
            for dof in 1..MAX_DEGREES_OF_FREEDOM {
                assert!(level.critical_value(dof) < level.critical_value(dof + 1), "{level}");
            }
        }
    }

    #[test]
    fn statistic_of_known_table() {
        // Expected counts are 5 everywhere; each cell deviates by 3.
        let chi = chi_square(&strong_split(), AttributeIndex::new(0)).unwrap();
        assert_eq!(chi.degrees_of_freedom, 1);
        assert!((chi.statistic - 7.2).abs() < 1e-12);
    }

    #[test]
    fn independent_split_has_zero_statistic() {
        let t = binary(vec![vec![0], vec![0], vec![1], vec![1]], vec![0, 1, 0, 1], 2);
        let chi = chi_square(&t, AttributeIndex::new(0)).unwrap();
        assert!(chi.statistic.abs() < 1e-12);
    }

    #[test]
    fn unobserved_values_do_not_count() {
        let t = binary(vec![vec![0], vec![0], vec![3], vec![3]], vec![0, 0, 1, 1], 5);
        let chi = chi_square(&t, AttributeIndex::new(0)).unwrap();
        assert_eq!(chi.degrees_of_freedom, 1);
        assert!((chi.statistic - 4.0).abs() < 1e-12);
    }

    #[test]
    fn no_pruning_level_never_prunes() {
        let t = binary(vec![vec![0], vec![0], vec![1], vec![1]], vec![0, 1, 0, 1], 2);
        assert!(!should_prune(&t, AttributeIndex::new(0), ConfidenceLevel::NO_PRUNING).unwrap());
    }

    #[test]
    fn no_pruning_level_skips_class_check() {
        let t = NominalTable::new(vec![vec![0], vec![1]], vec![0, 2], vec![2], 3).unwrap();
        assert!(!should_prune(&t, AttributeIndex::new(0), ConfidenceLevel::NO_PRUNING).unwrap());
    }

    #[test]
    fn strong_split_survives_strict_levels() {
        // 7.2 exceeds 3.841 (0.05) but not 7.879 (0.005).
        let t = strong_split();
        let a = AttributeIndex::new(0);
        assert!(!should_prune(&t, a, ConfidenceLevel::from_value(0.05).unwrap()).unwrap());
        assert!(should_prune(&t, a, ConfidenceLevel::from_value(0.005).unwrap()).unwrap());
    }

    #[test]
    fn stricter_levels_prune_at_least_as_often() {
        let a = AttributeIndex::new(0);
        for t in [strong_split(), weak_split()] {
            let decisions: Vec<bool> = ConfidenceLevel::all()
                .map(|level| should_prune(&t, a, level).unwrap())
                .collect();
            for pair in decisions.windows(2) {
                assert!(!pair[0] || pair[1], "{decisions:?}");
            }
        }
        let loose = ConfidenceLevel::from_value(0.25).unwrap();
        let strict = ConfidenceLevel::from_value(0.005).unwrap();
        // 2.0 lies between 1.323 (0.25) and 7.879 (0.005).
        assert!(!should_prune(&weak_split(), a, loose).unwrap());
        assert!(should_prune(&weak_split(), a, strict).unwrap());
    }

    #[test]
    fn single_observed_value_is_pruned() {
        let t = binary(vec![vec![1], vec![1]], vec![0, 1], 3);
        let level = ConfidenceLevel::from_value(0.75).unwrap();
        assert!(should_prune(&t, AttributeIndex::new(0), level).unwrap());
    }

    #[test]
    fn non_binary_class_is_rejected() {
        let t = NominalTable::new(vec![vec![0], vec![1]], vec![0, 2], vec![2], 3).unwrap();
        let level = ConfidenceLevel::from_value(0.5).unwrap();
        let err = should_prune(&t, AttributeIndex::new(0), level).unwrap_err();
        assert_eq!(err, TreeError::NonBinaryClass { n_classes: 3 });
    }

    #[test]
    fn too_many_degrees_of_freedom_is_rejected() {
        let rows: Vec<Vec<usize>> = (0..14).map(|v| vec![v]).collect();
        let labels: Vec<usize> = (0..14).map(|v| v % 2).collect();
        let t = binary(rows, labels, 14);
        let level = ConfidenceLevel::from_value(0.5).unwrap();
        let err = should_prune(&t, AttributeIndex::new(0), level).unwrap_err();
        assert!(matches!(
            err,
            TreeError::DegreesOfFreedomOutOfRange {
                degrees_of_freedom: 13,
                ..
            }
        ));
    }
}
