//! In-memory tabular data model.
//!
//! A [`TabularDataset`] is an ordered set of uniquely named, typed columns of
//! equal length. It is validated once at construction and never mutated
//! afterwards; every transformation in this crate returns a new dataset.

mod column;

pub use column::{Cell, CellKey, Column, ColumnData, ColumnKind, Value, format_number, number_bits};

use crate::error::{Result, TabcleanError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An immutable, validated table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DatasetRepr", into = "DatasetRepr")]
pub struct TabularDataset {
    columns: Vec<Column>,
    n_rows: usize,
}

static_assertions::assert_impl_all!(TabularDataset: Send, Sync);

#[derive(Serialize, Deserialize)]
struct DatasetRepr {
    columns: Vec<Column>,
}

impl TryFrom<DatasetRepr> for TabularDataset {
    type Error = TabcleanError;

    fn try_from(repr: DatasetRepr) -> Result<Self> {
        TabularDataset::from_columns(repr.columns)
    }
}

impl From<TabularDataset> for DatasetRepr {
    fn from(dataset: TabularDataset) -> Self {
        DatasetRepr {
            columns: dataset.columns,
        }
    }
}

impl TabularDataset {
    /// Build a dataset from column-major input.
    ///
    /// Fails with [`TabcleanError::MalformedDataset`] on duplicate column names,
    /// columns of unequal length, or non-finite numbers.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, Column::len);

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(TabcleanError::malformed(
                    column.name(),
                    "duplicate column name",
                ));
            }
            if column.len() != n_rows {
                return Err(TabcleanError::malformed(
                    column.name(),
                    format!("has {} rows, expected {}", column.len(), n_rows),
                ));
            }
            column.validate()?;
        }

        Ok(Self { columns, n_rows })
    }

    /// Build a dataset from row-major input and a declared schema.
    ///
    /// Every row must have exactly one cell per schema entry, and every
    /// present cell must match its column's kind.
    pub fn from_rows(
        schema: Vec<(String, ColumnKind)>,
        rows: Vec<Vec<Option<Value>>>,
    ) -> Result<Self> {
        let width = schema.len();
        let mut buffers: Vec<Vec<Option<Value>>> =
            (0..width).map(|_| Vec::with_capacity(rows.len())).collect();

        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                let column = schema
                    .get(row.len().min(width.saturating_sub(1)))
                    .map(|(name, _)| name.clone())
                    .unwrap_or_default();
                return Err(TabcleanError::malformed(
                    column,
                    format!("row {row_index} has {} cells, expected {width}", row.len()),
                ));
            }
            for (buffer, cell) in buffers.iter_mut().zip(row) {
                buffer.push(cell);
            }
        }

        let columns = schema
            .into_iter()
            .zip(buffers)
            .map(|((name, kind), values)| Column::from_values(name, kind, values))
            .collect::<Result<Vec<_>>>()?;

        Self::from_columns(columns)
    }

    /// A dataset with the given columns and no rows.
    pub fn empty(schema: Vec<(String, ColumnKind)>) -> Result<Self> {
        Self::from_rows(schema, Vec::new())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn schema(&self) -> Vec<(String, ColumnKind)> {
        self.columns
            .iter()
            .map(|c| (c.name().to_string(), c.kind()))
            .collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_at(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.column(name).map(Column::kind)
    }

    /// Cell at (row, column index), `None` when either is out of range.
    pub fn cell(&self, row: usize, column: usize) -> Option<Cell<'_>> {
        self.columns.get(column).and_then(|c| c.get(row))
    }

    /// Cell at (row, column name).
    pub fn cell_by_name(&self, row: usize, column: &str) -> Result<Option<Cell<'_>>> {
        self.column(column)
            .map(|c| c.get(row))
            .ok_or_else(|| TabcleanError::ColumnNotFound(column.to_string()))
    }

    /// Whole column as a sequence of optional values.
    pub fn column_values(&self, name: &str) -> Result<Vec<Option<Value>>> {
        self.column(name)
            .map(Column::values)
            .ok_or_else(|| TabcleanError::ColumnNotFound(name.to_string()))
    }

    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns_of_kind(ColumnKind::Numeric)
    }

    pub fn categorical_columns(&self) -> Vec<&Column> {
        self.columns_of_kind(ColumnKind::Categorical)
    }

    fn columns_of_kind(&self, kind: ColumnKind) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.kind() == kind).collect()
    }

    /// Cells of one row, in column order.
    pub fn row(&self, row: usize) -> Option<Vec<Cell<'_>>> {
        (row < self.n_rows).then(|| self.columns.iter().map(|c| c.cell(row)).collect())
    }

    /// Hashable identity of a row: equal keys mean every cell compares equal,
    /// missing included, across all columns in column order.
    pub fn row_key(&self, row: usize) -> Vec<CellKey<'_>> {
        self.columns.iter().map(|c| c.cell(row).key()).collect()
    }

    /// `true` at every row that repeats an earlier row.
    pub fn duplicate_mask(&self) -> Vec<bool> {
        let mut seen = HashSet::with_capacity(self.n_rows);
        (0..self.n_rows)
            .map(|row| !seen.insert(self.row_key(row)))
            .collect()
    }

    /// Number of rows equal to some earlier row.
    pub fn duplicate_count(&self) -> usize {
        self.duplicate_mask().into_iter().filter(|&dup| dup).count()
    }

    /// Total missing cells over all columns.
    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// First `n` rows rendered as text, missing cells as empty text.
    pub fn preview(&self, n: usize) -> Vec<Vec<(String, String)>> {
        (0..self.n_rows.min(n))
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| (c.name().to_string(), c.cell(row).render()))
                    .collect()
            })
            .collect()
    }

    /// New dataset holding only the rows whose mask entry is `true`.
    pub(crate) fn filter_rows(&self, keep: &[bool]) -> TabularDataset {
        debug_assert_eq!(keep.len(), self.n_rows);
        let n_rows = keep.iter().filter(|&&k| k).count();
        TabularDataset {
            columns: self.columns.iter().map(|c| c.filter(keep)).collect(),
            n_rows,
        }
    }

    /// New dataset with the column data at each `(index, data)` swapped in.
    ///
    /// Replacement data must have the same kind and length as the column it
    /// replaces.
    pub(crate) fn replace_column_data(&self, replacements: Vec<(usize, ColumnData)>) -> TabularDataset {
        let mut columns = self.columns.clone();
        for (index, data) in replacements {
            debug_assert_eq!(data.len(), self.n_rows);
            debug_assert_eq!(data.kind(), columns[index].kind());
            columns[index] = Column::from_data(columns[index].name().to_string(), data);
        }
        TabularDataset {
            columns,
            n_rows: self.n_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> TabularDataset {
        TabularDataset::from_columns(vec![
            Column::numeric("id", vec![Some(1.0), Some(1.0), Some(2.0), None, None]),
            Column::categorical("tag", vec![Some("a"), Some("a"), Some("b"), None, None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape_and_views() {
        let ds = sample();
        assert_eq!(ds.shape(), (5, 2));
        assert_eq!(ds.column_names(), vec!["id", "tag"]);
        assert_eq!(ds.numeric_columns().len(), 1);
        assert_eq!(ds.categorical_columns()[0].name(), "tag");
        assert_eq!(ds.kind_of("id"), Some(ColumnKind::Numeric));
        assert_eq!(ds.cell(2, 1), Some(Cell::Text("b")));
        assert_eq!(ds.cell(9, 0), None);
    }

    #[test]
    fn test_duplicate_mask_includes_missing_equality() {
        let ds = sample();
        assert_eq!(ds.duplicate_mask(), vec![false, true, false, false, true]);
        assert_eq!(ds.duplicate_count(), 2);
    }

    #[test]
    fn test_length_mismatch_is_malformed() {
        let err = TabularDataset::from_columns(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0)]),
            Column::numeric("b", vec![Some(1.0)]),
        ])
        .unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_DATASET");
        assert_eq!(err.offending_field(), Some("b"));
    }

    #[test]
    fn test_duplicate_names_are_malformed() {
        let err = TabularDataset::from_columns(vec![
            Column::numeric("a", vec![]),
            Column::categorical::<&str>("a", vec![]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate column name"));
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let ds = TabularDataset::from_columns(vec![
            Column::numeric("a", vec![Some(1.0)]),
            Column::numeric("A", vec![Some(2.0)]),
        ])
        .unwrap();
        assert_eq!(ds.n_cols(), 2);
    }

    #[test]
    fn test_from_rows_matches_from_columns() {
        let schema = vec![
            ("id".to_string(), ColumnKind::Numeric),
            ("tag".to_string(), ColumnKind::Categorical),
        ];
        let rows = vec![
            vec![Some(Value::Number(1.0)), Some(Value::from("a"))],
            vec![Some(Value::Number(1.0)), Some(Value::from("a"))],
            vec![Some(Value::Number(2.0)), Some(Value::from("b"))],
            vec![None, None],
            vec![None, None],
        ];
        let ds = TabularDataset::from_rows(schema, rows).unwrap();
        assert_eq!(ds, sample());
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let schema = vec![
            ("a".to_string(), ColumnKind::Numeric),
            ("b".to_string(), ColumnKind::Numeric),
        ];
        let err = TabularDataset::from_rows(schema, vec![vec![Some(Value::Number(1.0))]])
            .unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn test_from_rows_rejects_kind_mismatch() {
        let schema = vec![("a".to_string(), ColumnKind::Numeric)];
        let err =
            TabularDataset::from_rows(schema, vec![vec![Some(Value::from("x"))]]).unwrap_err();
        assert_eq!(err.offending_field(), Some("a"));
    }

    #[test]
    fn test_empty_dataset_keeps_schema() {
        let ds = TabularDataset::empty(vec![
            ("a".to_string(), ColumnKind::Numeric),
            ("b".to_string(), ColumnKind::Categorical),
        ])
        .unwrap();
        assert_eq!(ds.shape(), (0, 2));
        assert!(ds.is_empty());
        assert_eq!(ds.duplicate_count(), 0);
    }

    #[test]
    fn test_filter_rows_preserves_order() {
        let ds = sample();
        let filtered = ds.filter_rows(&[true, false, true, true, false]);
        assert_eq!(filtered.n_rows(), 3);
        assert_eq!(
            filtered.column("id").unwrap().as_numeric().unwrap(),
            &[Some(1.0), Some(2.0), None]
        );
        // source untouched
        assert_eq!(ds.n_rows(), 5);
    }

    #[test]
    fn test_preview_renders_missing_as_empty() {
        let preview = sample().preview(20);
        assert_eq!(preview.len(), 5);
        assert_eq!(
            preview[3],
            vec![
                ("id".to_string(), String::new()),
                ("tag".to_string(), String::new())
            ]
        );
        assert_eq!(preview[0][0].1, "1");
    }

    #[test]
    fn test_serde_revalidates() {
        let json = serde_json::to_string(&sample()).unwrap();
        let back: TabularDataset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());

        let ragged = r#"{"columns":[
            {"name":"a","data":{"kind":"numeric","values":[1.0,2.0]}},
            {"name":"b","data":{"kind":"numeric","values":[1.0]}}
        ]}"#;
        assert!(serde_json::from_str::<TabularDataset>(ragged).is_err());
    }
}
