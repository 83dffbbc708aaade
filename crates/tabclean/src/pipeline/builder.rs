//! Main cleaning pipeline module.
//!
//! This module provides the [`CleaningPipeline`] struct and its builder.

use crate::config::{CleaningOptions, ConfigValidationError};
use crate::dataset::TabularDataset;
use crate::error::Result;
use crate::pipeline::executor::CleaningExecutor;
use crate::pipeline::progress::{
    ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate,
};
use crate::types::{CleaningSummary, PreviewRow};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Number of output rows rendered into a summary preview.
pub const PREVIEW_ROWS: usize = 20;

/// Fraction of input rows whose loss triggers a warning.
const HEAVY_LOSS_RATIO: f64 = 0.3;

/// The cleaning pipeline.
///
/// Use [`CleaningPipeline::builder()`] to create a pipeline with custom options.
///
/// # Example
///
/// ```rust,ignore
/// use tabclean::{CleaningOptions, CleaningPipeline, ImputeStrategy};
///
/// let options = CleaningOptions::builder()
///     .impute_strategy(ImputeStrategy::Mode)
///     .outlier_zscore_threshold(2.5)
///     .build()?;
///
/// let (cleaned, summary) = CleaningPipeline::builder()
///     .options(options)
///     .build()?
///     .clean(&dataset)?;
/// ```
pub struct CleaningPipeline {
    options: CleaningOptions,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    executor: CleaningExecutor,
}

static_assertions::assert_impl_all!(CleaningPipeline: Send, Sync);

impl CleaningPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> CleaningPipelineBuilder {
        CleaningPipelineBuilder::default()
    }

    pub fn options(&self) -> &CleaningOptions {
        &self.options
    }

    /// Run deduplication, imputation and outlier removal, each gated by its
    /// option flag, and summarize what changed.
    ///
    /// Options were validated by [`CleaningPipelineBuilder::build`]. The
    /// input dataset is left untouched.
    pub fn clean(&self, dataset: &TabularDataset) -> Result<(TabularDataset, CleaningSummary)> {
        let start = Instant::now();
        let options = &self.options;
        let n_rows_before = dataset.n_rows();
        let n_missing_before = dataset.missing_count();

        info!(
            "Cleaning dataset: {} rows x {} columns, {} missing cells",
            n_rows_before,
            dataset.n_cols(),
            n_missing_before
        );
        self.report_progress(ProgressUpdate::new(
            CleaningStage::Initializing,
            n_rows_before,
            "Options validated",
        ));

        let mut current = dataset.clone();

        let mut duplicate_rows_removed = 0;
        if options.drop_duplicates {
            let (deduped, removed) = self.executor.drop_duplicates(&current);
            current = deduped;
            duplicate_rows_removed = removed;
            self.report_progress(ProgressUpdate::new(
                CleaningStage::Deduplication,
                current.n_rows(),
                format!("Removed {} duplicate rows", removed),
            ));
        } else {
            debug!("Duplicate removal disabled");
        }

        if options.impute_missing {
            let (imputed, columns) = self.executor.impute(&current, options.impute_strategy);
            current = imputed;
            self.report_progress(ProgressUpdate::new(
                CleaningStage::Imputation,
                current.n_rows(),
                format!(
                    "Imputed {} columns using {}",
                    columns.len(),
                    options.impute_strategy
                ),
            ));
        } else {
            debug!("Imputation disabled");
        }

        let mut outlier_rows_removed = 0;
        if options.remove_outliers {
            let (filtered, removed) = self
                .executor
                .remove_outliers(&current, options.outlier_zscore_threshold);
            current = filtered;
            outlier_rows_removed = removed;
            self.report_progress(ProgressUpdate::new(
                CleaningStage::OutlierRemoval,
                current.n_rows(),
                format!("Removed {} outlier rows", removed),
            ));
        } else {
            debug!("Outlier removal disabled");
        }

        let summary = CleaningSummary {
            n_rows_before,
            n_rows_after: current.n_rows(),
            n_missing_before,
            n_missing_after: current.missing_count(),
            duplicate_rows_removed,
            outlier_rows_removed,
            preview_rows: current
                .preview(PREVIEW_ROWS)
                .into_iter()
                .map(PreviewRow)
                .collect(),
        };

        if n_rows_before > 0 && summary.rows_removed() as f64 > n_rows_before as f64 * HEAVY_LOSS_RATIO {
            warn!(
                "Cleaning removed {:.1}% of rows ({} of {})",
                summary.rows_removed_percentage(),
                summary.rows_removed(),
                n_rows_before
            );
        }

        self.report_progress(ProgressUpdate::new(
            CleaningStage::Complete,
            summary.n_rows_after,
            "Cleaning complete",
        ));
        info!(
            "Cleaning finished in {:.2?}: {} -> {} rows, {} -> {} missing cells",
            start.elapsed(),
            summary.n_rows_before,
            summary.n_rows_after,
            summary.n_missing_before,
            summary.n_missing_after
        );

        Ok((current, summary))
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(ref reporter) = self.progress_reporter {
            reporter.report(update);
        }
    }
}

/// Clean `dataset` with `options` and no progress reporting.
pub fn clean(
    dataset: &TabularDataset,
    options: &CleaningOptions,
) -> Result<(TabularDataset, CleaningSummary)> {
    CleaningPipeline::builder()
        .options(options.clone())
        .build()?
        .clean(dataset)
}

/// Builder for [`CleaningPipeline`].
#[derive(Default)]
pub struct CleaningPipelineBuilder {
    options: Option<CleaningOptions>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(CleaningPipelineBuilder: Send);

impl CleaningPipelineBuilder {
    /// Set the cleaning options. Defaults apply when never called.
    pub fn options(mut self, options: CleaningOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Set a progress reporter for receiving one update per stage.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tabclean::{ProgressReporter, ProgressUpdate};
    /// use std::sync::Arc;
    ///
    /// struct StderrReporter;
    ///
    /// impl ProgressReporter for StderrReporter {
    ///     fn report(&self, update: ProgressUpdate) {
    ///         eprintln!("{}: {}", update.stage.display_name(), update.message);
    ///     }
    /// }
    ///
    /// let pipeline = CleaningPipeline::builder()
    ///     .progress_reporter(Arc::new(StderrReporter))
    ///     .build()?;
    /// ```
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// Shorthand for [`progress_reporter`](Self::progress_reporter) with a
    /// [`ClosureProgressReporter`].
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the options are invalid.
    pub fn build(self) -> std::result::Result<CleaningPipeline, ConfigValidationError> {
        let options = self.options.unwrap_or_default();
        options.validate()?;

        Ok(CleaningPipeline {
            options,
            progress_reporter: self.progress_reporter,
            executor: CleaningExecutor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImputeStrategy;
    use crate::dataset::Column;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn sample() -> TabularDataset {
        TabularDataset::from_columns(vec![
            Column::numeric("x", vec![Some(1.0), Some(1.0), None, Some(4.0)]),
            Column::categorical("c", vec![Some("a"), Some("a"), Some("b"), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = CleaningPipeline::builder().build().unwrap();
        assert_eq!(pipeline.options(), &CleaningOptions::default());
    }

    #[test]
    fn test_pipeline_builder_rejects_bad_threshold() {
        let mut options = CleaningOptions::default();
        options.outlier_zscore_threshold = -1.0;
        assert!(CleaningPipeline::builder().options(options).build().is_err());
    }

    #[test]
    fn test_clean_validates_before_running() {
        let mut options = CleaningOptions::default();
        options.outlier_zscore_threshold = f64::NAN;
        let err = clean(&sample(), &options).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIGURATION");
    }

    #[test]
    fn test_all_steps_disabled_is_identity() {
        let ds = sample();
        let (out, summary) = clean(&ds, &CleaningOptions::disabled()).unwrap();
        assert_eq!(out, ds);
        assert_eq!(summary.duplicate_rows_removed, 0);
        assert_eq!(summary.outlier_rows_removed, 0);
        assert_eq!(summary.n_missing_before, summary.n_missing_after);
        assert_eq!(summary.n_rows_before, summary.n_rows_after);
    }

    #[test]
    fn test_summary_counts() {
        let options = CleaningOptions::builder()
            .remove_outliers(false)
            .impute_strategy(ImputeStrategy::Mode)
            .build()
            .unwrap();
        let (out, summary) = clean(&sample(), &options).unwrap();
        assert_eq!(summary.n_rows_before, 4);
        assert_eq!(summary.duplicate_rows_removed, 1);
        assert_eq!(summary.n_rows_after, 3);
        assert_eq!(summary.n_missing_before, 2);
        assert_eq!(summary.n_missing_after, 0);
        assert_eq!(out.missing_count(), 0);
        assert_eq!(summary.preview_rows.len(), 3);
        assert_eq!(summary.preview_rows[1].get("x"), Some("1"));
        assert_eq!(summary.preview_rows[2].get("c"), Some("a"));
    }

    #[test]
    fn test_preview_is_capped() {
        let values: Vec<Option<f64>> = (0..50).map(|i| Some(i as f64)).collect();
        let ds = TabularDataset::from_columns(vec![Column::numeric("n", values)]).unwrap();
        let (_, summary) = clean(&ds, &CleaningOptions::default()).unwrap();
        assert_eq!(summary.preview_rows.len(), PREVIEW_ROWS);
        assert_eq!(summary.preview_rows[0].get("n"), Some("0"));
    }

    #[test]
    fn test_input_not_mutated() {
        let ds = sample();
        let before = ds.clone();
        let _ = clean(&ds, &CleaningOptions::default()).unwrap();
        assert_eq!(ds, before);
    }

    #[test]
    fn test_empty_dataset_flows_through() {
        let ds = TabularDataset::empty(vec![("x".to_string(), crate::dataset::ColumnKind::Numeric)])
            .unwrap();
        let (out, summary) = clean(&ds, &CleaningOptions::default()).unwrap();
        assert_eq!(out.n_rows(), 0);
        assert_eq!(summary.n_rows_after, 0);
        assert!(summary.preview_rows.is_empty());
    }

    #[test]
    fn test_pipeline_with_progress_callback() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let stages_clone = stages.clone();

        let pipeline = CleaningPipeline::builder()
            .options(CleaningOptions::builder().impute_missing(false).build().unwrap())
            .on_progress(move |update| {
                stages_clone.lock().unwrap().push(update.stage);
            })
            .build()
            .unwrap();
        pipeline.clean(&sample()).unwrap();

        assert_eq!(
            *stages.lock().unwrap(),
            vec![
                CleaningStage::Initializing,
                CleaningStage::Deduplication,
                CleaningStage::OutlierRemoval,
                CleaningStage::Complete,
            ]
        );
    }
}
