//! Tabular Dataset Cleaning Library
//!
//! Profiling, quality scoring and deterministic cleaning of in-memory tables
//! whose columns are either numeric or categorical.
//!
//! # Overview
//!
//! - **Profiling**: per-column missing counts, distinct counts, sample values
//!   and numeric summaries
//! - **Quality Scoring**: a 0-100 score weighted over missing cells,
//!   duplicate rows and constant columns
//! - **Cleaning**: duplicate removal, imputation (mean, median, mode or zero)
//!   and z-score outlier removal, each switchable
//! - **Ingestion**: CSV, TSV, Parquet and JSON readers behind an
//!   extension-keyed registry
//! - **Storage**: datasets persisted as JSON under UUID identities
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tabclean::{CleaningOptions, ImputeStrategy, ReaderRegistry};
//!
//! let registry = ReaderRegistry::with_defaults();
//! let dataset = registry.read("data.csv".as_ref())?;
//!
//! let profile = tabclean::profile(&dataset);
//! let metrics = tabclean::score(&dataset);
//! println!("quality: {:.1}", metrics.quality_score);
//!
//! let options = CleaningOptions::builder()
//!     .impute_strategy(ImputeStrategy::Mean)
//!     .outlier_zscore_threshold(2.5)
//!     .build()?;
//! let (cleaned, summary) = tabclean::clean(&dataset, &options)?;
//! println!("{} -> {} rows", summary.n_rows_before, summary.n_rows_after);
//! ```
//!
//! # Configuration
//!
//! [`CleaningOptions`] defaults to every step enabled, median imputation and a
//! z-score threshold of 3.0. Options can also be read from JSON:
//!
//! ```json
//! { "impute_strategy": "mode", "remove_outliers": false }
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod imputers;
pub mod ingest;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod storage;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    CleaningOptions, CleaningOptionsBuilder, ConfigValidationError, DEFAULT_ZSCORE_THRESHOLD,
    ImputeStrategy,
};
pub use dataset::{Cell, Column, ColumnData, ColumnKind, TabularDataset, Value};
pub use error::{Result as TabcleanResult, ResultExt, TabcleanError};
pub use imputers::{ImputedColumn, StatisticalImputer};
pub use ingest::{ReaderFn, ReaderRegistry};
pub use pipeline::{
    CleaningExecutor, CleaningPipeline, CleaningPipelineBuilder, CleaningStage,
    ClosureProgressReporter, OutlierHandler, ProgressReporter, ProgressUpdate, clean,
};
pub use profiler::{DataProfiler, profile};
pub use quality::{QualityScorer, score};
pub use storage::{DatasetId, DatasetStore, StoredDataset};
pub use types::{
    CleaningReport, CleaningSummary, ColumnProfile, DatasetProfile, NumericSummary, PreviewRow,
    ProfileReport, QualityMetrics, QualityRatios, QualityReport,
};
