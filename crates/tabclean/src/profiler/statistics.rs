//! Statistical analysis functions for column profiling.

use crate::dataset::{Cell, Column};
use crate::types::NumericSummary;
use crate::utils::{mean_and_population_std, min_max, present_numbers};
use std::collections::HashSet;

/// Distinct present cells of a column, in first-seen order.
pub(crate) fn distinct_values(column: &Column) -> Vec<Cell<'_>> {
    let mut seen = HashSet::new();
    column
        .iter()
        .filter(|cell| !cell.is_missing() && seen.insert(cell.key()))
        .collect()
}

/// Number of distinct present values.
pub(crate) fn distinct_count(column: &Column) -> usize {
    let mut seen = HashSet::new();
    column
        .iter()
        .filter(|cell| !cell.is_missing() && seen.insert(cell.key()))
        .count()
}

/// Range and spread of a numeric column; `None` for categorical columns and
/// for numeric columns without present values.
pub(crate) fn numeric_summary(column: &Column) -> Option<NumericSummary> {
    let values = present_numbers(column.as_numeric()?);
    let (min, max) = min_max(&values)?;
    let (mean, std) = mean_and_population_std(&values)?;
    Some(NumericSummary {
        min,
        max,
        mean,
        std,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_numeric_equality() {
        let column = Column::numeric("x", vec![Some(0.0), Some(-0.0), None, Some(1.0)]);
        assert_eq!(distinct_count(&column), 2);
        assert_eq!(distinct_values(&column), vec![Cell::Number(0.0), Cell::Number(1.0)]);
    }

    #[test]
    fn test_distinct_text_is_exact() {
        let column = Column::categorical("c", vec![Some("a"), Some("A"), Some("a "), None]);
        assert_eq!(distinct_count(&column), 3);
    }

    #[test]
    fn test_numeric_summary_none_cases() {
        assert!(numeric_summary(&Column::categorical("c", vec![Some("a")])).is_none());
        assert!(numeric_summary(&Column::numeric("x", vec![None, None])).is_none());
    }
}
