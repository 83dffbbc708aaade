//! Outlier handling module.
//!
//! Univariate z-score filtering: a row is dropped when any numeric column
//! holds a value whose distance from that column's mean exceeds the
//! threshold, measured in population standard deviations.

use crate::dataset::TabularDataset;
use crate::utils::{mean_and_population_std, present_numbers};
use tracing::debug;

/// Per-column z-score parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScoreStats {
    pub mean: f64,
    pub std: f64,
}

impl ZScoreStats {
    /// |z| of `value`, or `None` when the column has no spread.
    pub fn abs_zscore(&self, value: f64) -> Option<f64> {
        (self.std > 0.0).then(|| ((value - self.mean) / self.std).abs())
    }
}

/// Handles outlier detection and removal.
pub struct OutlierHandler;

impl OutlierHandler {
    /// `true` at every row whose |z| exceeds `threshold` in at least one
    /// numeric column.
    ///
    /// Missing cells never flag a row, and a column with zero standard
    /// deviation never flags a row.
    pub fn outlier_mask(dataset: &TabularDataset, threshold: f64) -> Vec<bool> {
        let mut mask = vec![false; dataset.n_rows()];

        for column in dataset.numeric_columns() {
            let Some(values) = column.as_numeric() else {
                continue;
            };
            let Some((mean, std)) = mean_and_population_std(&present_numbers(values)) else {
                continue;
            };
            let stats = ZScoreStats { mean, std };
            if stats.std == 0.0 {
                debug!("Column '{}' has zero variance, no outlier signal", column.name());
                continue;
            }

            let mut flagged = 0usize;
            for (row, value) in values.iter().enumerate() {
                let exceeds = value
                    .and_then(|v| stats.abs_zscore(v))
                    .is_some_and(|z| z > threshold);
                if exceeds {
                    flagged += 1;
                    mask[row] = true;
                }
            }
            debug!(
                "Column '{}': mean {:.4}, std {:.4}, {} values beyond |z| > {}",
                column.name(),
                stats.mean,
                stats.std,
                flagged,
                threshold
            );
        }

        mask
    }

    /// Remove outlier rows, preserving the order of the rest.
    ///
    /// Returns the filtered dataset and the number of rows removed.
    pub fn remove_zscore_outliers(dataset: &TabularDataset, threshold: f64) -> (TabularDataset, usize) {
        if dataset.numeric_columns().is_empty() {
            debug!("No numeric columns, skipping outlier removal");
            return (dataset.clone(), 0);
        }

        let mask = Self::outlier_mask(dataset, threshold);
        let removed = mask.iter().filter(|&&outlier| outlier).count();
        if removed == 0 {
            return (dataset.clone(), 0);
        }

        let keep: Vec<bool> = mask.iter().map(|&outlier| !outlier).collect();
        (dataset.filter_rows(&keep), removed)
    }
}
