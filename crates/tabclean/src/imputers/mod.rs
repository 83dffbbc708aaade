//! Imputation module for handling missing values.
//!
//! Provides the statistical fill strategies (mean, median, mode, zero).

mod statistical;

pub use statistical::{ImputedColumn, StatisticalImputer};
