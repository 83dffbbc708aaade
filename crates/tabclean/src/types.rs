use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Descriptive statistics of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub n_missing: usize,
    pub pct_missing: f64,
    pub n_unique: usize,
    pub sample_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub numeric_summary: Option<NumericSummary>,
}

/// Range and spread of a numeric column's present values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

/// Profiles of every column, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub n_rows: usize,
    pub n_cols: usize,
    pub columns: Vec<ColumnProfile>,
}

impl DatasetProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Composite quality score and the ratios it is built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub missing_ratio: f64,
    pub duplicate_ratio: f64,
    pub constant_cols_ratio: f64,
    pub quality_score: f64,
}

/// A profile tied to the stored identity of the profiled dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    pub dataset_id: String,
    #[serde(flatten)]
    pub profile: DatasetProfile,
}

/// The three ratios behind a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityRatios {
    pub missing_ratio: f64,
    pub duplicate_ratio: f64,
    pub constant_cols_ratio: f64,
}

impl From<&QualityMetrics> for QualityRatios {
    fn from(metrics: &QualityMetrics) -> Self {
        Self {
            missing_ratio: metrics.missing_ratio,
            duplicate_ratio: metrics.duplicate_ratio,
            constant_cols_ratio: metrics.constant_cols_ratio,
        }
    }
}

/// One preview row: `(column, rendered cell)` pairs in column order.
///
/// Serializes as a JSON object and deserializes back with its keys in the
/// order they appear. A `null` cell reads as empty text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreviewRow(pub Vec<(String, String)>);

impl PreviewRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}


impl Serialize for PreviewRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, value) in &self.0 {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

struct PreviewRowVisitor;

impl<'de> Visitor<'de> for PreviewRowVisitor {
    type Value = PreviewRow;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of column names to rendered cells")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PreviewRow, A::Error> {
        let mut cells = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((column, value)) = access.next_entry::<String, Option<String>>()? {
            cells.push((column, value.unwrap_or_default()));
        }
        Ok(PreviewRow(cells))
    }
}

impl<'de> Deserialize<'de> for PreviewRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PreviewRowVisitor)
    }
}

/// What a cleaning run changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub n_rows_before: usize,
    pub n_rows_after: usize,
    pub n_missing_before: usize,
    pub n_missing_after: usize,
    pub duplicate_rows_removed: usize,
    pub outlier_rows_removed: usize,
    pub preview_rows: Vec<PreviewRow>,
}

impl CleaningSummary {
    pub fn rows_removed(&self) -> usize {
        self.n_rows_before.saturating_sub(self.n_rows_after)
    }

    /// Percentage of input rows removed.
    pub fn rows_removed_percentage(&self) -> f64 {
        if self.n_rows_before == 0 {
            0.0
        } else {
            self.rows_removed() as f64 / self.n_rows_before as f64 * 100.0
        }
    }
}

/// A cleaning summary tied to the stored identities of its input and output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub source_dataset_id: String,
    pub cleaned_dataset_id: String,
    #[serde(flatten)]
    pub summary: CleaningSummary,
}

/// A quality score and its ratios, tied to a stored identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub dataset_id: String,
    pub quality_score: f64,
    pub metrics: QualityRatios,
}

impl QualityReport {
    pub fn new(dataset_id: impl Into<String>, metrics: &QualityMetrics) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            quality_score: metrics.quality_score,
            metrics: metrics.into(),
        }
    }
}
