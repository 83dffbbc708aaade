//! Progress reporting for the cleaning pipeline.
//!
//! The pipeline is synchronous and runs to completion; progress updates let
//! a caller (a CLI spinner, a UI event bus) follow the three steps as they
//! finish.
//!
//! # Example
//!
//! ```rust,ignore
//! use tabclean::CleaningPipeline;
//!
//! let (cleaned, summary) = CleaningPipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .clean(&dataset)?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the cleaning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Options validated, before-counts measured
    Initializing,
    /// Removing duplicate rows
    Deduplication,
    /// Filling missing cells
    Imputation,
    /// Removing z-score outlier rows
    OutlierRemoval,
    /// Pipeline finished
    Complete,
}

impl CleaningStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::Deduplication => "Removing Duplicates",
            Self::Imputation => "Imputing Values",
            Self::OutlierRemoval => "Removing Outliers",
            Self::Complete => "Complete",
        }
    }

    /// Overall progress once this stage has finished.
    pub fn progress(&self) -> f32 {
        match self {
            Self::Initializing => 0.05,
            Self::Deduplication => 0.35,
            Self::Imputation => 0.70,
            Self::OutlierRemoval => 0.95,
            Self::Complete => 1.0,
        }
    }
}

/// A stage-completion notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Stage that just finished (or was skipped)
    pub stage: CleaningStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Human-readable message describing what happened
    pub message: String,

    /// Rows left after the stage
    pub rows_remaining: usize,
}

impl ProgressUpdate {
    pub fn new(stage: CleaningStage, rows_remaining: usize, message: impl Into<String>) -> Self {
        Self {
            stage,
            progress: stage.progress(),
            message: message.into(),
            rows_remaining,
        }
    }
}

/// Trait for receiving progress updates during cleaning.
///
/// Implementations must be `Send + Sync` so a pipeline can be shared across
/// threads.
pub trait ProgressReporter: Send + Sync {
    /// Called once per stage.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}
