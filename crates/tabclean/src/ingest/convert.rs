//! Conversion between polars DataFrames and [`TabularDataset`].

use crate::dataset::{Column, ColumnData, TabularDataset};
use crate::error::Result;
use polars::prelude::{DataFrame, DataType, IntoColumn, NamedFrom, Series};
use tracing::warn;

/// Check if a polars dtype maps onto a numeric column.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Convert a DataFrame into a dataset.
///
/// Numeric dtypes become numeric columns (NaN and infinities become missing
/// cells); every other dtype is cast to text and becomes categorical.
pub fn dataframe_to_dataset(df: &DataFrame) -> Result<TabularDataset> {
    let mut columns = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let series = col.as_materialized_series();
        let name = series.name().to_string();

        if is_numeric_dtype(series.dtype()) {
            let floats = series.cast(&DataType::Float64)?;
            let mut non_finite = 0usize;
            let values: Vec<Option<f64>> = floats
                .f64()?
                .into_iter()
                .map(|v| match v {
                    Some(x) if !x.is_finite() => {
                        non_finite += 1;
                        None
                    }
                    other => other,
                })
                .collect();
            if non_finite > 0 {
                warn!("Column '{}': {} non-finite values read as missing", name, non_finite);
            }
            columns.push(Column::numeric(name, values));
        } else {
            let text = series.cast(&DataType::String)?;
            let values: Vec<Option<String>> =
                text.str()?.into_iter().map(|v| v.map(str::to_string)).collect();
            columns.push(Column::categorical(name, values));
        }
    }

    TabularDataset::from_columns(columns)
}

/// Convert a dataset into a DataFrame with `Float64` and `String` columns.
pub fn dataset_to_dataframe(dataset: &TabularDataset) -> Result<DataFrame> {
    let columns = dataset
        .columns()
        .iter()
        .map(|column| {
            let series = match column.data() {
                ColumnData::Numeric(values) => Series::new(column.name().into(), values.clone()),
                ColumnData::Categorical(values) => {
                    Series::new(column.name().into(), values.clone())
                }
            };
            series.into_column()
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColumnKind;

    #[test]
    fn test_dataframe_to_dataset_kinds() {
        let df = DataFrame::new(vec![
            Series::new("age".into(), &[Some(30i64), None, Some(41)]).into_column(),
            Series::new("score".into(), &[1.5f64, f64::NAN, 2.0]).into_column(),
            Series::new("city".into(), &[Some("Oslo"), Some("Rome"), None]).into_column(),
            Series::new("active".into(), &[true, false, true]).into_column(),
        ])
        .unwrap();

        let ds = dataframe_to_dataset(&df).unwrap();
        assert_eq!(
            ds.schema(),
            vec![
                ("age".to_string(), ColumnKind::Numeric),
                ("score".to_string(), ColumnKind::Numeric),
                ("city".to_string(), ColumnKind::Categorical),
                ("active".to_string(), ColumnKind::Categorical),
            ]
        );
        assert_eq!(ds.column("age").unwrap().as_numeric().unwrap(), &[Some(30.0), None, Some(41.0)]);
        assert_eq!(ds.column("score").unwrap().missing_count(), 1);
        assert_eq!(ds.column("city").unwrap().missing_count(), 1);
        assert_eq!(
            ds.column("active").unwrap().as_categorical().unwrap()[0].as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_dataset_to_dataframe() {
        let ds = TabularDataset::from_columns(vec![
            Column::numeric("x", vec![Some(1.0), None]),
            Column::categorical("c", vec![None, Some("b")]),
        ])
        .unwrap();

        let df = dataset_to_dataframe(&ds).unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("x").unwrap().null_count(), 1);
        assert_eq!(df.column("c").unwrap().dtype(), &DataType::String);

        let back = dataframe_to_dataset(&df).unwrap();
        assert_eq!(back, ds);
    }
}
