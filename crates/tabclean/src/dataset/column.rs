//! Typed columns and cell values.

use crate::error::{Result, TabcleanError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a column, fixed when the column is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Real-valued cells
    Numeric,
    /// Text cells
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An owned, present cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Number(_) => ColumnKind::Numeric,
            Self::Text(_) => ColumnKind::Categorical,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// A borrowed view of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Number(f64),
    Text(&'a str),
    Missing,
}

impl<'a> Cell<'a> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Hashable identity of the cell under numeric / exact-text equality.
    pub fn key(&self) -> CellKey<'a> {
        match *self {
            Cell::Number(v) => CellKey::Number(number_bits(v)),
            Cell::Text(s) => CellKey::Text(s),
            Cell::Missing => CellKey::Missing,
        }
    }

    /// Text form of the cell; missing renders as empty text.
    pub fn render(&self) -> String {
        match self {
            Cell::Number(v) => format_number(*v),
            Cell::Text(s) => (*s).to_string(),
            Cell::Missing => String::new(),
        }
    }

    pub fn to_value(&self) -> Option<Value> {
        match self {
            Cell::Number(v) => Some(Value::Number(*v)),
            Cell::Text(s) => Some(Value::Text((*s).to_string())),
            Cell::Missing => None,
        }
    }
}

/// Hash/Eq key for a cell. Two cells are equal iff their keys are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKey<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
}

/// Bit pattern used for numeric equality; `-0.0` folds onto `0.0`.
#[inline]
pub fn number_bits(value: f64) -> u64 {
    if value == 0.0 { 0.0f64.to_bits() } else { value.to_bits() }
}

/// Render a number the way previews and samples show it (`3` rather than `3.0`).
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

/// Backing storage of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Build a numeric column. NaN and infinite values are rejected when the
    /// column becomes part of a dataset.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    /// Build a categorical column.
    pub fn categorical<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(
                values.into_iter().map(|v| v.map(Into::into)).collect(),
            ),
        }
    }

    /// Build a column of the declared kind from loosely typed cells.
    ///
    /// A cell whose type disagrees with `kind` is a malformed dataset; no
    /// coercion between kinds takes place.
    pub fn from_values(
        name: impl Into<String>,
        kind: ColumnKind,
        values: Vec<Option<Value>>,
    ) -> Result<Self> {
        let name = name.into();
        let data = match kind {
            ColumnKind::Numeric => {
                let mut out = Vec::with_capacity(values.len());
                for (row, value) in values.into_iter().enumerate() {
                    match value {
                        None => out.push(None),
                        Some(Value::Number(v)) => out.push(Some(v)),
                        Some(Value::Text(text)) => {
                            return Err(TabcleanError::malformed(
                                &name,
                                format!("row {row}: text value '{text}' in numeric column"),
                            ));
                        }
                    }
                }
                ColumnData::Numeric(out)
            }
            ColumnKind::Categorical => {
                let mut out = Vec::with_capacity(values.len());
                for (row, value) in values.into_iter().enumerate() {
                    match value {
                        None => out.push(None),
                        Some(Value::Text(text)) => out.push(Some(text)),
                        Some(Value::Number(v)) => {
                            return Err(TabcleanError::malformed(
                                &name,
                                format!("row {row}: numeric value {v} in categorical column"),
                            ));
                        }
                    }
                }
                ColumnData::Categorical(out)
            }
        };
        Ok(Self { name, data })
    }

    pub(crate) fn from_data(name: String, data: ColumnData) -> Self {
        Self { name, data }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell at `row`. Panics if `row` is out of bounds, like slice indexing.
    pub fn cell(&self, row: usize) -> Cell<'_> {
        match &self.data {
            ColumnData::Numeric(values) => values[row].map_or(Cell::Missing, Cell::Number),
            ColumnData::Categorical(values) => values[row]
                .as_deref()
                .map_or(Cell::Missing, Cell::Text),
        }
    }

    pub fn get(&self, row: usize) -> Option<Cell<'_>> {
        (row < self.len()).then(|| self.cell(row))
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell<'_>> + '_ {
        (0..self.len()).map(move |row| self.cell(row))
    }

    /// Whole column as optional owned values.
    pub fn values(&self) -> Vec<Option<Value>> {
        self.iter().map(|cell| cell.to_value()).collect()
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(values) => Some(values),
            ColumnData::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Categorical(values) => Some(values),
            ColumnData::Numeric(_) => None,
        }
    }

    pub fn missing_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Categorical(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    pub fn has_missing(&self) -> bool {
        self.missing_count() > 0
    }

    /// Check the per-cell invariants that the type system does not enforce.
    pub(crate) fn validate(&self) -> Result<()> {
        if let ColumnData::Numeric(values) = &self.data {
            if let Some(row) = values.iter().position(|v| v.is_some_and(|x| !x.is_finite())) {
                return Err(TabcleanError::malformed(
                    &self.name,
                    format!("row {row}: non-finite number (use a missing cell instead)"),
                ));
            }
        }
        Ok(())
    }

    /// Keep only the rows whose mask entry is `true`.
    pub(crate) fn filter(&self, keep: &[bool]) -> Column {
        let data = match &self.data {
            ColumnData::Numeric(values) => ColumnData::Numeric(
                values
                    .iter()
                    .zip(keep)
                    .filter_map(|(v, &k)| k.then_some(*v))
                    .collect(),
            ),
            ColumnData::Categorical(values) => ColumnData::Categorical(
                values
                    .iter()
                    .zip(keep)
                    .filter_map(|(v, k)| k.then(|| v.clone()))
                    .collect(),
            ),
        };
        Column::from_data(self.name.clone(), data)
    }
}
