//! Shared statistical helpers.
//!
//! These are the primitives the profiler, the imputers and the outlier
//! filter agree on: mean, median, population standard deviation and a mode
//! with first-seen tie-breaking. All of them ignore missing cells.

use crate::dataset::number_bits;
use std::collections::HashMap;
use std::hash::Hash;

// =============================================================================
// Numeric Statistics
// =============================================================================

/// Present values of a numeric column, in row order.
pub fn present_numbers(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

/// Arithmetic mean, `None` for an empty slice.
///
/// The result always lies within the input's range, even when the plain
/// sum would overflow.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let naive = values.iter().sum::<f64>() / n;
    if naive.is_finite() {
        return Some(naive);
    }

    // overflowed: average the values scaled into [-1, 1]
    let scale = max_abs(values);
    Some(values.iter().map(|v| v / scale).sum::<f64>() / n * scale)
}

/// Median; the midpoint of the two middle values for even-length input.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(sorted[mid - 1] / 2.0 + sorted[mid] / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Mean and population standard deviation (divisor N).
///
/// Both stay finite for any finite input.
pub fn mean_and_population_std(values: &[f64]) -> Option<(f64, f64)> {
    let mean = mean(values)?;
    let n = values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    if variance.is_finite() {
        return Some((mean, variance.sqrt()));
    }

    let scale = max_abs(values);
    let scaled_mean = mean / scale;
    let scaled_variance = values
        .iter()
        .map(|v| (v / scale - scaled_mean).powi(2))
        .sum::<f64>()
        / n;
    Some((mean, scaled_variance.sqrt() * scale))
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc: f64, v| acc.max(v.abs()))
}

/// Population standard deviation (divisor N).
pub fn population_std(values: &[f64]) -> Option<f64> {
    mean_and_population_std(values).map(|(_, std)| std)
}

/// Smallest and largest value.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

// =============================================================================
// Frequency Utilities
// =============================================================================

/// Most frequent item by `key`; ties go to the item seen first.
pub fn first_seen_mode<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Option<T>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    // key -> (count, index into `firsts`)
    let mut counts: HashMap<K, (usize, usize)> = HashMap::new();
    let mut firsts: Vec<T> = Vec::new();

    for item in items {
        let k = key(&item);
        match counts.get_mut(&k) {
            Some((count, _)) => *count += 1,
            None => {
                counts.insert(k, (1, firsts.len()));
                firsts.push(item);
            }
        }
    }

    let (_, winner) = counts
        .into_values()
        .max_by(|(count_a, idx_a), (count_b, idx_b)| {
            count_a.cmp(count_b).then_with(|| idx_b.cmp(idx_a))
        })?;
    firsts.into_iter().nth(winner)
}

/// Mode of a numeric column's present values.
pub fn numeric_mode(values: &[Option<f64>]) -> Option<f64> {
    first_seen_mode(values.iter().flatten().copied(), |v| number_bits(*v))
}

/// Mode of a categorical column's present values.
pub fn text_mode(values: &[Option<String>]) -> Option<&str> {
    first_seen_mode(values.iter().flatten().map(String::as_str), |s| *s)
}

// =============================================================================
// Tests
// =============================================================================
