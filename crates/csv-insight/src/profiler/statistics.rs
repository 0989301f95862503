//! Descriptive statistics for column profiling.

use crate::error::Result;
use crate::types::{CategoricalSummary, NumericSummary};
use polars::prelude::*;
use std::collections::HashMap;

/// Summarize a numeric column, skipping missing values.
///
/// Every statistic but `count` is `None` for an all-missing column, and
/// `std` is `None` for fewer than two values.
pub(crate) fn numeric_summary(series: &Series) -> Result<NumericSummary> {
    let non_null = series.drop_nulls();
    let count = non_null.len();

    if count == 0 {
        return Ok(NumericSummary {
            count,
            mean: None,
            std: None,
            min: None,
            q1: None,
            median: None,
            q3: None,
            max: None,
        });
    }

    let float_series = non_null.cast(&DataType::Float64)?;
    let sorted: Vec<f64> = float_series
        .sort(SortOptions::default())?
        .f64()?
        .into_iter()
        .flatten()
        .collect();

    Ok(NumericSummary {
        count,
        mean: float_series.mean(),
        std: calculate_std(&float_series)?,
        min: sorted.first().copied(),
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied(),
    })
}

/// Summarize a non-numeric column: count, distinct values, most frequent
/// value and its frequency. Ties go to the value seen first.
pub(crate) fn categorical_summary(values: &[Option<String>]) -> CategoricalSummary {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for value in values.iter().flatten() {
        let entry = counts.entry(value.as_str()).or_insert(0);
        if *entry == 0 {
            first_seen.push(value.as_str());
        }
        *entry += 1;
    }

    let mut top: Option<(&str, usize)> = None;
    for value in &first_seen {
        let freq = counts[value];
        if top.is_none_or(|(_, best)| freq > best) {
            top = Some((value, freq));
        }
    }

    CategoricalSummary {
        count: values.iter().flatten().count(),
        unique: first_seen.len(),
        top: top.map(|(value, _)| value.to_string()),
        freq: top.map(|(_, freq)| freq),
    }
}

/// Sample standard deviation (n - 1 denominator) of a null-free series.
///
/// `None` for fewer than two values, or when an infinite value makes the
/// variance undefined.
pub(crate) fn calculate_std(series: &Series) -> Result<Option<f64>> {
    let n = series.len();
    if n < 2 {
        return Ok(None);
    }
    let Some(mean) = series.mean() else {
        return Ok(None);
    };

    let variance: f64 = series
        .f64()?
        .into_iter()
        .flatten()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / (n - 1) as f64;

    let std = variance.sqrt();
    Ok(std.is_finite().then_some(std))
}

/// Quantile of sorted data using linear interpolation between closest ranks.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
