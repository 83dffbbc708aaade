//! Statistical imputation methods.
//!
//! Every column is imputed independently with a single fill value computed
//! from its own present cells. Mean and median are undefined for text, so
//! categorical columns fall back to the mode for those strategies.

use crate::config::ImputeStrategy;
use crate::dataset::{Column, ColumnData, TabularDataset, Value, format_number};
use crate::utils::{mean, median, numeric_mode, present_numbers, text_mode};
use serde::Serialize;
use tracing::debug;

/// Record of one imputed column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputedColumn {
    pub column: String,
    pub fill_value: Value,
    pub cells_filled: usize,
}

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill value for a column under `strategy`.
    ///
    /// A column without present values falls back to `0` (numeric) or empty
    /// text (categorical), whatever the strategy.
    pub fn fill_value(column: &Column, strategy: ImputeStrategy) -> Value {
        match column.data() {
            ColumnData::Numeric(values) => {
                let present = present_numbers(values);
                let fill = match strategy {
                    ImputeStrategy::Zero => Some(0.0),
                    ImputeStrategy::Mode => numeric_mode(values),
                    ImputeStrategy::Mean => mean(&present),
                    ImputeStrategy::Median => median(&present),
                };
                Value::Number(fill.unwrap_or(0.0))
            }
            ColumnData::Categorical(values) => match strategy {
                ImputeStrategy::Zero => Value::Text(format_number(0.0)),
                ImputeStrategy::Mode | ImputeStrategy::Mean | ImputeStrategy::Median => {
                    Value::Text(text_mode(values).unwrap_or_default().to_string())
                }
            },
        }
    }

    /// Column data with every missing cell replaced, or `None` when the
    /// column has nothing to fill.
    pub fn impute_column(column: &Column, strategy: ImputeStrategy) -> Option<(ColumnData, Value)> {
        if !column.has_missing() {
            return None;
        }

        let fill = Self::fill_value(column, strategy);
        let data = match (column.data(), &fill) {
            (ColumnData::Numeric(values), Value::Number(v)) => {
                ColumnData::Numeric(values.iter().map(|cell| Some(cell.unwrap_or(*v))).collect())
            }
            (ColumnData::Categorical(values), Value::Text(t)) => ColumnData::Categorical(
                values
                    .iter()
                    .map(|cell| Some(cell.clone().unwrap_or_else(|| t.clone())))
                    .collect(),
            ),
            // fill_value always matches the column kind
            _ => return None,
        };
        Some((data, fill))
    }

    /// Impute every column of a dataset that has missing cells.
    ///
    /// Columns without missing cells are carried over unchanged.
    pub fn impute_dataset(
        dataset: &TabularDataset,
        strategy: ImputeStrategy,
    ) -> (TabularDataset, Vec<ImputedColumn>) {
        let mut replacements = Vec::new();
        let mut imputed = Vec::new();

        for (index, column) in dataset.columns().iter().enumerate() {
            let cells_filled = column.missing_count();
            if let Some((data, fill_value)) = Self::impute_column(column, strategy) {
                debug!(
                    "Filled {} cells in '{}' with {} value {:?}",
                    cells_filled,
                    column.name(),
                    strategy,
                    fill_value
                );
                replacements.push((index, data));
                imputed.push(ImputedColumn {
                    column: column.name().to_string(),
                    fill_value,
                    cells_filled,
                });
            }
        }

        (dataset.replace_column_data(replacements), imputed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_numeric() {
        let col = Column::numeric("x", vec![Some(1.0), None, Some(3.0)]);
        let (data, fill) = StatisticalImputer::impute_column(&col, ImputeStrategy::Median).unwrap();
        assert_eq!(fill, Value::Number(2.0));
        assert_eq!(data, ColumnData::Numeric(vec![Some(1.0), Some(2.0), Some(3.0)]));
    }

    #[test]
    fn test_mean_numeric() {
        let col = Column::numeric("x", vec![Some(1.0), None, Some(2.0), Some(6.0)]);
        assert_eq!(
            StatisticalImputer::fill_value(&col, ImputeStrategy::Mean),
            Value::Number(3.0)
        );
    }

    #[test]
    fn test_huge_values_give_finite_fill() {
        let ds = TabularDataset::from_columns(vec![Column::numeric(
            "x",
            vec![Some(1e308), Some(1e308), None],
        )])
        .unwrap();

        for strategy in [ImputeStrategy::Mean, ImputeStrategy::Median] {
            let (out, _) = StatisticalImputer::impute_dataset(&ds, strategy);
            assert_eq!(
                out.column("x").unwrap().as_numeric().unwrap(),
                &[Some(1e308), Some(1e308), Some(1e308)]
            );
            assert_eq!(out.missing_count(), 0);
            // the output still satisfies the construction invariants
            assert!(TabularDataset::from_columns(out.columns().to_vec()).is_ok());
        }
    }

    #[test]
    fn test_mode_categorical() {
        let col = Column::categorical("c", vec![Some("x"), Some("x"), Some("y"), None]);
        let (data, fill) = StatisticalImputer::impute_column(&col, ImputeStrategy::Mode).unwrap();
        assert_eq!(fill, Value::Text("x".to_string()));
        assert_eq!(col.len(), data.len());
        assert_eq!(
            data,
            ColumnData::Categorical(vec![
                Some("x".to_string()),
                Some("x".to_string()),
                Some("y".to_string()),
                Some("x".to_string())
            ])
        );
    }

    #[test]
    fn test_mean_and_median_fall_back_to_mode_for_text() {
        let col = Column::categorical("c", vec![Some("b"), Some("a"), Some("a"), None]);
        for strategy in [ImputeStrategy::Mean, ImputeStrategy::Median] {
            assert_eq!(
                StatisticalImputer::fill_value(&col, strategy),
                Value::Text("a".to_string())
            );
        }
    }

    #[test]
    fn test_zero_strategy_by_kind() {
        let num = Column::numeric("x", vec![Some(5.0), None]);
        let text = Column::categorical("c", vec![Some("q"), None]);
        assert_eq!(StatisticalImputer::fill_value(&num, ImputeStrategy::Zero), Value::Number(0.0));
        assert_eq!(
            StatisticalImputer::fill_value(&text, ImputeStrategy::Zero),
            Value::Text("0".to_string())
        );
    }

    #[test]
    fn test_all_missing_columns_fall_back() {
        let num = Column::numeric("x", vec![None, None]);
        let text = Column::categorical::<&str>("c", vec![None]);
        for strategy in ImputeStrategy::ALL {
            assert_eq!(StatisticalImputer::fill_value(&num, strategy), Value::Number(0.0));
        }
        assert_eq!(
            StatisticalImputer::fill_value(&text, ImputeStrategy::Mode),
            Value::Text(String::new())
        );
    }

    #[test]
    fn test_complete_column_untouched() {
        let col = Column::numeric("x", vec![Some(1.0), Some(2.0)]);
        assert!(StatisticalImputer::impute_column(&col, ImputeStrategy::Mean).is_none());
    }

    #[test]
    fn test_impute_dataset_records_filled_columns() {
        let ds = TabularDataset::from_columns(vec![
            Column::numeric("full", vec![Some(1.0), Some(2.0)]),
            Column::numeric("gappy", vec![None, Some(4.0)]),
        ])
        .unwrap();
        let (out, imputed) = StatisticalImputer::impute_dataset(&ds, ImputeStrategy::Median);
        assert_eq!(out.missing_count(), 0);
        assert_eq!(out.column("full"), ds.column("full"));
        assert_eq!(imputed.len(), 1);
        assert_eq!(imputed[0].column, "gappy");
        assert_eq!(imputed[0].cells_filled, 1);
        assert_eq!(imputed[0].fill_value, Value::Number(4.0));
    }
}
