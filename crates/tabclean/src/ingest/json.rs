//! JSON readers: a top-level array of flat objects, or JSON Lines with one
//! object per line. Either way each object is one row.

use crate::dataset::{Column, TabularDataset};
use crate::error::{Result, TabcleanError};
use serde_json::Value as JsonValue;
use std::path::Path;

/// Read a JSON records file.
///
/// Columns appear in first-seen key order. A column whose present values are
/// all numbers is numeric; any other column is categorical, with numbers and
/// booleans rendered as text. `null` and absent keys are missing cells.
pub fn read_json(path: &Path) -> Result<TabularDataset> {
    let content = std::fs::read_to_string(path)?;
    let parsed: JsonValue = serde_json::from_str(&content)?;
    records_to_dataset(&parsed, &path.display().to_string())
}

/// Read a JSON Lines file: one object per non-blank line.
pub fn read_json_lines(path: &Path) -> Result<TabularDataset> {
    let content = std::fs::read_to_string(path)?;
    let source = path.display().to_string();

    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: JsonValue =
            serde_json::from_str(line).map_err(|e| TabcleanError::Ingestion {
                path: source.clone(),
                reason: format!("line {}: {}", index + 1, e),
            })?;
        records.push(record);
    }
    records_to_dataset(&JsonValue::Array(records), &source)
}

/// Build a dataset from a parsed array of objects; `source` names the input
/// in errors.
pub fn records_to_dataset(value: &JsonValue, source: &str) -> Result<TabularDataset> {
    let shape_error = |reason: String| TabcleanError::Ingestion {
        path: source.to_string(),
        reason,
    };
    let records = value
        .as_array()
        .ok_or_else(|| shape_error("expected a top-level array of objects".to_string()))?;

    let mut names: Vec<String> = Vec::new();
    for (row, record) in records.iter().enumerate() {
        let object = record
            .as_object()
            .ok_or_else(|| shape_error(format!("record {row} is not an object")))?;
        for key in object.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let cells: Vec<Option<&JsonValue>> = records
                .iter()
                .map(|record| record.get(&name).filter(|v| !v.is_null()))
                .collect();
            build_column(name, &cells)
        })
        .collect();

    TabularDataset::from_columns(columns)
}

fn build_column(name: String, cells: &[Option<&JsonValue>]) -> Column {
    let all_numbers = cells.iter().flatten().all(|v| v.is_number());
    if all_numbers {
        Column::numeric(
            name,
            cells
                .iter()
                .map(|cell| cell.and_then(JsonValue::as_f64))
                .collect(),
        )
    } else {
        Column::categorical(name, cells.iter().map(|cell| cell.map(render_json)))
    }
}

fn render_json(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColumnKind;
    use serde_json::json;

    #[test]
    fn test_records_to_dataset() {
        let value = json!([
            {"id": 1, "city": "Oslo", "flag": true},
            {"id": 2.5, "city": null},
            {"city": "Rome", "id": 3, "flag": false}
        ]);
        let ds = records_to_dataset(&value, "test").unwrap();
        assert_eq!(ds.column_names(), vec!["id", "city", "flag"]);
        assert_eq!(ds.kind_of("id"), Some(ColumnKind::Numeric));
        assert_eq!(ds.column("city").unwrap().missing_count(), 1);
        assert_eq!(
            ds.column("flag").unwrap().as_categorical().unwrap(),
            &[Some("true".to_string()), None, Some("false".to_string())]
        );
    }

    #[test]
    fn test_mixed_column_is_categorical() {
        let value = json!([{"v": 1}, {"v": "two"}]);
        let ds = records_to_dataset(&value, "test").unwrap();
        assert_eq!(ds.kind_of("v"), Some(ColumnKind::Categorical));
        assert_eq!(ds.column("v").unwrap().as_categorical().unwrap()[0].as_deref(), Some("1"));
    }

    #[test]
    fn test_read_json_lines_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        std::fs::write(&path, "{\"id\": 1, \"kind\": \"a\"}\n\n{\"id\": 2}\n").unwrap();

        let ds = read_json_lines(&path).unwrap();
        assert_eq!(ds.shape(), (2, 2));
        assert_eq!(ds.column_names(), vec!["id", "kind"]);
        assert_eq!(ds.column("id").unwrap().as_numeric().unwrap(), &[Some(1.0), Some(2.0)]);
        assert_eq!(ds.column("kind").unwrap().missing_count(), 1);
    }

    #[test]
    fn test_read_json_lines_reports_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        std::fs::write(&path, "{\"id\": 1}\n{oops\n").unwrap();

        let err = read_json_lines(&path).unwrap_err();
        assert_eq!(err.error_code(), "INGESTION_FAILED");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_rejects_non_array() {
        let err = records_to_dataset(&json!({"a": 1}), "test").unwrap_err();
        assert_eq!(err.error_code(), "INGESTION_FAILED");
    }
}
