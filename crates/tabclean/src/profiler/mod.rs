//! Data profiling module for dataset analysis.
//!
//! Profiles every column independently: missing counts, distinct counts,
//! first-seen sample values and, for numeric columns, range and spread.
//! Profiling is a pure, single-pass read of the dataset.

mod statistics;

use crate::dataset::TabularDataset;
use crate::types::{ColumnProfile, DatasetProfile};
use tracing::debug;

pub(crate) use statistics::{distinct_count, distinct_values, numeric_summary};

/// Maximum number of sample values kept per column.
pub const MAX_SAMPLE_VALUES: usize = 5;

/// Data profiler for analyzing dataset structure.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile an entire dataset, one [`ColumnProfile`] per column in column
    /// order.
    pub fn profile_dataset(dataset: &TabularDataset) -> DatasetProfile {
        let columns: Vec<ColumnProfile> = dataset
            .columns()
            .iter()
            .map(|column| Self::profile_column(column, dataset.n_rows()))
            .collect();

        debug!(
            "Profiled {} columns over {} rows",
            columns.len(),
            dataset.n_rows()
        );

        DatasetProfile {
            n_rows: dataset.n_rows(),
            n_cols: dataset.n_cols(),
            columns,
        }
    }

    fn profile_column(column: &crate::dataset::Column, n_rows: usize) -> ColumnProfile {
        let n_missing = column.missing_count();
        let pct_missing = if n_rows == 0 {
            0.0
        } else {
            n_missing as f64 / n_rows as f64 * 100.0
        };

        let distinct = distinct_values(column);
        let sample_values = distinct
            .iter()
            .take(MAX_SAMPLE_VALUES)
            .map(|cell| cell.render())
            .collect();

        ColumnProfile {
            name: column.name().to_string(),
            dtype: column.kind().to_string(),
            n_missing,
            pct_missing,
            n_unique: distinct.len(),
            sample_values,
            numeric_summary: numeric_summary(column),
        }
    }
}

/// Profile a dataset. Shorthand for [`DataProfiler::profile_dataset`].
pub fn profile(dataset: &TabularDataset) -> DatasetProfile {
    DataProfiler::profile_dataset(dataset)
}
