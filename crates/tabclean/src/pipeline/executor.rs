//! Cleaning executor module.
//!
//! Each step takes a dataset and returns a new one; the input is never
//! modified.

use crate::config::ImputeStrategy;
use crate::dataset::TabularDataset;
use crate::imputers::{ImputedColumn, StatisticalImputer};
use crate::pipeline::outliers::OutlierHandler;
use tracing::{debug, info};

/// Executes the individual cleaning steps.
pub struct CleaningExecutor;

impl CleaningExecutor {
    /// Drop every row that equals an earlier row across all columns.
    ///
    /// Returns the deduplicated dataset and the number of rows dropped.
    pub fn drop_duplicates(&self, dataset: &TabularDataset) -> (TabularDataset, usize) {
        let duplicates = dataset.duplicate_mask();
        let removed = duplicates.iter().filter(|&&dup| dup).count();
        if removed == 0 {
            debug!("No duplicate rows found");
            return (dataset.clone(), 0);
        }

        let keep: Vec<bool> = duplicates.iter().map(|&dup| !dup).collect();
        info!("Dropped {} duplicate rows", removed);
        (dataset.filter_rows(&keep), removed)
    }

    /// Fill missing cells column by column with the strategy's fill value.
    pub fn impute(
        &self,
        dataset: &TabularDataset,
        strategy: ImputeStrategy,
    ) -> (TabularDataset, Vec<ImputedColumn>) {
        let (imputed, columns) = StatisticalImputer::impute_dataset(dataset, strategy);
        if !columns.is_empty() {
            let filled: usize = columns.iter().map(|c| c.cells_filled).sum();
            info!(
                "Imputed {} cells across {} columns using {}",
                filled,
                columns.len(),
                strategy
            );
        }
        (imputed, columns)
    }

    /// Drop rows with |z| > `threshold` in any numeric column.
    pub fn remove_outliers(&self, dataset: &TabularDataset, threshold: f64) -> (TabularDataset, usize) {
        let (filtered, removed) = OutlierHandler::remove_zscore_outliers(dataset, threshold);
        if removed > 0 {
            info!("Removed {} outlier rows (|z| > {})", removed, threshold);
        }
        (filtered, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    #[test]
    fn test_drop_duplicates_keeps_first() {
        let ds = TabularDataset::from_columns(vec![
            Column::numeric("id", vec![Some(1.0), Some(1.0), Some(2.0), Some(1.0)]),
            Column::categorical("tag", vec![Some("a"), Some("a"), Some("b"), Some("c")]),
        ])
        .unwrap();

        let (out, removed) = CleaningExecutor.drop_duplicates(&ds);
        assert_eq!(removed, 1);
        assert_eq!(out.n_rows(), 3);
        assert_eq!(
            out.column("tag").unwrap().as_categorical().unwrap(),
            &[Some("a".to_string()), Some("b".to_string()), Some("c".to_string())]
        );
    }

    #[test]
    fn test_drop_duplicates_missing_cells_match() {
        let ds = TabularDataset::from_columns(vec![Column::numeric("x", vec![None, None, Some(0.0)])])
            .unwrap();
        let (out, removed) = CleaningExecutor.drop_duplicates(&ds);
        assert_eq!(removed, 1);
        assert_eq!(out.n_rows(), 2);
    }

    #[test]
    fn test_drop_duplicates_idempotent() {
        let ds = TabularDataset::from_columns(vec![Column::categorical(
            "c",
            vec![Some("x"), Some("y"), Some("x"), Some("y")],
        )])
        .unwrap();
        let (once, _) = CleaningExecutor.drop_duplicates(&ds);
        let (twice, removed) = CleaningExecutor.drop_duplicates(&once);
        assert_eq!(removed, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_impute_reports_columns() {
        let ds = TabularDataset::from_columns(vec![
            Column::numeric("x", vec![Some(1.0), None, Some(5.0)]),
            Column::categorical("c", vec![Some("a"), Some("b"), Some("c")]),
        ])
        .unwrap();
        let (out, columns) = CleaningExecutor.impute(&ds, ImputeStrategy::Mean);
        assert_eq!(out.missing_count(), 0);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].column, "x");
        assert_eq!(columns[0].cells_filled, 1);
    }
}
