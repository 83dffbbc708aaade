use crate::dataset::TabularDataset;
use crate::profiler::distinct_count;
use crate::types::QualityMetrics;
use tracing::debug;

/// Penalty weight of the missing-cell ratio.
pub const MISSING_WEIGHT: f64 = 0.6;
/// Penalty weight of the duplicate-row ratio.
pub const DUPLICATE_WEIGHT: f64 = 0.3;
/// Penalty weight of the constant-column ratio.
pub const CONSTANT_WEIGHT: f64 = 0.1;

pub struct QualityScorer;

impl QualityScorer {
    /// Compute the composite quality score of a dataset.
    ///
    /// A dataset without rows or without columns scores 0 with a missing
    /// ratio of 1.0.
    pub fn score(dataset: &TabularDataset) -> QualityMetrics {
        let (n_rows, n_cols) = dataset.shape();
        if n_rows == 0 || n_cols == 0 {
            return QualityMetrics {
                missing_ratio: 1.0,
                duplicate_ratio: 0.0,
                constant_cols_ratio: 0.0,
                quality_score: 0.0,
            };
        }

        let total_cells = (n_rows * n_cols) as f64;
        let missing_ratio = dataset.missing_count() as f64 / total_cells;
        let duplicate_ratio = dataset.duplicate_count() as f64 / n_rows as f64;

        let constant_cols = dataset
            .columns()
            .iter()
            .filter(|column| distinct_count(column) <= 1)
            .count();
        let constant_cols_ratio = constant_cols as f64 / n_cols as f64;

        let quality_score = Self::weighted_score(missing_ratio, duplicate_ratio, constant_cols_ratio);

        debug!(
            missing_ratio,
            duplicate_ratio, constant_cols_ratio, quality_score, "Scored dataset"
        );

        QualityMetrics {
            missing_ratio,
            duplicate_ratio,
            constant_cols_ratio,
            quality_score,
        }
    }

    /// `100 × max(0, 1 − penalty)`, clamped to [0, 100].
    fn weighted_score(missing_ratio: f64, duplicate_ratio: f64, constant_cols_ratio: f64) -> f64 {
        let penalty = MISSING_WEIGHT * missing_ratio
            + DUPLICATE_WEIGHT * duplicate_ratio
            + CONSTANT_WEIGHT * constant_cols_ratio;
        (100.0 * (1.0 - penalty).max(0.0)).clamp(0.0, 100.0)
    }
}

/// Score a dataset. Shorthand for [`QualityScorer::score`].
pub fn score(dataset: &TabularDataset) -> QualityMetrics {
    QualityScorer::score(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, ColumnKind};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_complete_unique_dataset_scores_100() {
        let ds = TabularDataset::from_columns(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0)]),
            Column::categorical("b", vec![Some("x"), Some("y")]),
        ])
        .unwrap();
        let metrics = score(&ds);
        assert_eq!(metrics.missing_ratio, 0.0);
        assert_eq!(metrics.duplicate_ratio, 0.0);
        assert_eq!(metrics.constant_cols_ratio, 0.0);
        assert_eq!(metrics.quality_score, 100.0);
    }

    #[test]
    fn test_all_missing_ratio_is_one() {
        let ds = TabularDataset::from_columns(vec![
            Column::numeric("a", vec![None, None]),
            Column::categorical::<&str>("b", vec![None, None]),
        ])
        .unwrap();
        let metrics = score(&ds);
        assert_eq!(metrics.missing_ratio, 1.0);
        // second row duplicates the first, both columns constant
        assert_eq!(metrics.duplicate_ratio, 0.5);
        assert_eq!(metrics.constant_cols_ratio, 1.0);
        assert!(approx(metrics.quality_score, 100.0 * (1.0 - (0.6 + 0.15 + 0.1))));
    }

    #[test]
    fn test_weighted_formula() {
        // 4 rows x 2 cols, 1 missing cell, 1 duplicate row, 1 constant column
        let ds = TabularDataset::from_columns(vec![
            Column::numeric("a", vec![Some(1.0), Some(1.0), Some(2.0), Some(3.0)]),
            Column::categorical("b", vec![Some("k"), Some("k"), None, Some("k")]),
        ])
        .unwrap();
        let metrics = score(&ds);
        assert!(approx(metrics.missing_ratio, 1.0 / 8.0));
        assert!(approx(metrics.duplicate_ratio, 0.25));
        assert!(approx(metrics.constant_cols_ratio, 0.5));
        let expected = 100.0 * (1.0 - (0.6 * 0.125 + 0.3 * 0.25 + 0.1 * 0.5));
        assert!(approx(metrics.quality_score, expected));
    }

    #[test]
    fn test_empty_dataset_degenerate_case() {
        let ds = TabularDataset::empty(vec![
            ("a".to_string(), ColumnKind::Numeric),
            ("b".to_string(), ColumnKind::Categorical),
        ])
        .unwrap();
        let metrics = score(&ds);
        assert_eq!(metrics.quality_score, 0.0);
        assert_eq!(metrics.missing_ratio, 1.0);
        assert_eq!(metrics.duplicate_ratio, 0.0);
        assert_eq!(metrics.constant_cols_ratio, 0.0);
    }

    #[test]
    fn test_no_columns_degenerate_case() {
        let ds = TabularDataset::from_columns(Vec::new()).unwrap();
        assert_eq!(score(&ds).missing_ratio, 1.0);
    }

    #[test]
    fn test_score_stays_in_range() {
        assert_eq!(QualityScorer::weighted_score(1.0, 1.0, 1.0), 0.0);
        assert_eq!(QualityScorer::weighted_score(0.0, 0.0, 0.0), 100.0);
    }
}
