//! Pipeline module.
//!
//! The cleaning pipeline: deduplication, imputation and z-score outlier
//! removal, in that order.

mod builder;
mod executor;
pub mod outliers;
pub mod progress;

pub use builder::{CleaningPipeline, CleaningPipelineBuilder, PREVIEW_ROWS, clean};
pub use executor::CleaningExecutor;
pub use outliers::{OutlierHandler, ZScoreStats};
pub use progress::{ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate};
