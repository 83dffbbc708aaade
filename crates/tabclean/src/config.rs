//! Configuration types for the cleaning pipeline.
//!
//! [`CleaningOptions`] is an immutable value handed to the pipeline. It can be
//! assembled with the builder, deserialized from JSON, or taken from its
//! defaults. Every construction path validates before a pipeline sees it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default z-score magnitude above which a row counts as an outlier.
pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;

/// Strategy for computing the value that replaces missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ImputeStrategy {
    /// Arithmetic mean of present values (mode for categorical columns)
    Mean,
    /// Median of present values (mode for categorical columns)
    #[default]
    Median,
    /// Most frequent present value, ties broken by first appearance
    Mode,
    /// The number zero (the text "0" for categorical columns)
    Zero,
}

impl ImputeStrategy {
    /// All accepted strategies, in their canonical order.
    pub const ALL: [ImputeStrategy; 4] = [Self::Mean, Self::Median, Self::Mode, Self::Zero];

    /// The lowercase name used in configuration files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::Zero => "zero",
        }
    }
}

impl fmt::Display for ImputeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImputeStrategy {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| ConfigValidationError::UnknownStrategy(s.to_string()))
    }
}

impl TryFrom<String> for ImputeStrategy {
    type Error = ConfigValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Options controlling which cleaning steps run and how.
///
/// Use [`CleaningOptions::builder()`] for a validated configuration with a
/// fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use tabclean::config::{CleaningOptions, ImputeStrategy};
///
/// let options = CleaningOptions::builder()
///     .impute_strategy(ImputeStrategy::Mode)
///     .outlier_zscore_threshold(2.5)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CleaningOptionsRepr")]
pub struct CleaningOptions {
    /// Remove rows that exactly repeat an earlier row.
    /// Default: true
    pub drop_duplicates: bool,

    /// Replace missing cells with a per-column fill value.
    /// Default: true
    pub impute_missing: bool,

    /// How fill values are computed.
    /// Default: Median
    pub impute_strategy: ImputeStrategy,

    /// Remove rows whose z-score exceeds the threshold in any numeric column.
    /// Default: true
    pub remove_outliers: bool,

    /// Strictly positive z-score magnitude above which a value is an outlier.
    /// Default: 3.0
    pub outlier_zscore_threshold: f64,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            drop_duplicates: true,
            impute_missing: true,
            impute_strategy: ImputeStrategy::default(),
            remove_outliers: true,
            outlier_zscore_threshold: DEFAULT_ZSCORE_THRESHOLD,
        }
    }
}

impl CleaningOptions {
    /// Create a new options builder.
    pub fn builder() -> CleaningOptionsBuilder {
        CleaningOptionsBuilder::default()
    }

    /// Options with every step turned off.
    pub fn disabled() -> Self {
        Self {
            drop_duplicates: false,
            impute_missing: false,
            remove_outliers: false,
            ..Self::default()
        }
    }

    /// Parse options from a JSON document. Absent fields take their defaults.
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        let repr: CleaningOptionsRepr = serde_json::from_str(json)?;
        Ok(Self::try_from(repr)?)
    }

    /// Read options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let threshold = self.outlier_zscore_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "outlier_zscore_threshold".to_string(),
                value: threshold,
            });
        }

        Ok(())
    }
}

/// Wire form of [`CleaningOptions`]: the strategy stays raw text so an
/// unknown name surfaces as a [`ConfigValidationError`].
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CleaningOptionsRepr {
    drop_duplicates: bool,
    impute_missing: bool,
    impute_strategy: String,
    remove_outliers: bool,
    outlier_zscore_threshold: f64,
}

impl Default for CleaningOptionsRepr {
    fn default() -> Self {
        let defaults = CleaningOptions::default();
        Self {
            drop_duplicates: defaults.drop_duplicates,
            impute_missing: defaults.impute_missing,
            impute_strategy: defaults.impute_strategy.to_string(),
            remove_outliers: defaults.remove_outliers,
            outlier_zscore_threshold: defaults.outlier_zscore_threshold,
        }
    }
}

impl TryFrom<CleaningOptionsRepr> for CleaningOptions {
    type Error = ConfigValidationError;

    fn try_from(repr: CleaningOptionsRepr) -> Result<Self, Self::Error> {
        let options = CleaningOptions {
            drop_duplicates: repr.drop_duplicates,
            impute_missing: repr.impute_missing,
            impute_strategy: repr.impute_strategy.parse()?,
            remove_outliers: repr.remove_outliers,
            outlier_zscore_threshold: repr.outlier_zscore_threshold,
        };
        options.validate()?;
        Ok(options)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be a positive, finite number)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Unknown impute strategy '{0}' (expected one of: mean, median, mode, zero)")]
    UnknownStrategy(String),
}

impl ConfigValidationError {
    /// Name of the offending options field.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidThreshold { field, .. } => field,
            Self::UnknownStrategy(_) => "impute_strategy",
        }
    }
}

/// Builder for [`CleaningOptions`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningOptionsBuilder {
    drop_duplicates: Option<bool>,
    impute_missing: Option<bool>,
    impute_strategy: Option<ImputeStrategy>,
    remove_outliers: Option<bool>,
    outlier_zscore_threshold: Option<f64>,
}

impl CleaningOptionsBuilder {
    /// Enable or disable duplicate row removal.
    pub fn drop_duplicates(mut self, drop: bool) -> Self {
        self.drop_duplicates = Some(drop);
        self
    }

    /// Enable or disable missing-value imputation.
    pub fn impute_missing(mut self, impute: bool) -> Self {
        self.impute_missing = Some(impute);
        self
    }

    /// Set the imputation strategy.
    pub fn impute_strategy(mut self, strategy: ImputeStrategy) -> Self {
        self.impute_strategy = Some(strategy);
        self
    }

    /// Enable or disable z-score outlier removal.
    pub fn remove_outliers(mut self, remove: bool) -> Self {
        self.remove_outliers = Some(remove);
        self
    }

    /// Set the z-score magnitude above which a value is an outlier.
    ///
    /// # Arguments
    /// * `threshold` - Strictly positive (e.g., 3.0 = three standard deviations)
    pub fn outlier_zscore_threshold(mut self, threshold: f64) -> Self {
        self.outlier_zscore_threshold = Some(threshold);
        self
    }

    /// Build the options.
    ///
    /// Returns validated `CleaningOptions` or an error if validation fails.
    pub fn build(self) -> Result<CleaningOptions, ConfigValidationError> {
        let defaults = CleaningOptions::default();
        let options = CleaningOptions {
            drop_duplicates: self.drop_duplicates.unwrap_or(defaults.drop_duplicates),
            impute_missing: self.impute_missing.unwrap_or(defaults.impute_missing),
            impute_strategy: self.impute_strategy.unwrap_or_default(),
            remove_outliers: self.remove_outliers.unwrap_or(defaults.remove_outliers),
            outlier_zscore_threshold: self
                .outlier_zscore_threshold
                .unwrap_or(DEFAULT_ZSCORE_THRESHOLD),
        };

        options.validate()?;
        Ok(options)
    }
}
