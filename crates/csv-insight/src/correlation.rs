//! Pairwise correlation analysis.
//!
//! The correlation set is every numeric column plus, when it is not numeric
//! already, the table's last column coerced value by value. A coerced column
//! with no surviving number is dropped silently. Coefficients are Pearson's r
//! over pairwise-complete observations: each pair only uses rows where both
//! sides are present.

use crate::table::Table;
use crate::types::{ColumnKind, CorrelationPair};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Symmetric correlation matrix over the correlation set.
///
/// A `None` cell is undefined: fewer than two complete pairs, or a side with
/// zero variance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Coefficient for a column pair, if both are present and it is defined.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Output of the correlation analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub matrix: CorrelationMatrix,
    /// Strongest unordered pairs by absolute coefficient, descending.
    pub top: Vec<CorrelationPair>,
    /// Name of the last column when it entered the set through coercion.
    pub coerced_column: Option<String>,
}

/// Computes correlations and ranks the strongest pairs.
pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    /// Analyze a table, keeping at most `top_n` ranked pairs.
    ///
    /// With fewer than two usable columns both the matrix and the ranking
    /// are empty.
    pub fn analyze(table: &Table, top_n: usize) -> CorrelationReport {
        let (series, coerced_column) = Self::correlation_set(table);

        if series.len() < 2 {
            debug!(
                "Only {} numeric column(s); skipping correlation analysis",
                series.len()
            );
            return CorrelationReport {
                coerced_column,
                ..Default::default()
            };
        }

        let matrix = Self::pearson_matrix(&series);
        let top = Self::top_pairs(&matrix, top_n);

        CorrelationReport {
            matrix,
            top,
            coerced_column,
        }
    }

    /// Numeric columns in table order, followed by the coerced last column
    /// when it qualifies.
    fn correlation_set(table: &Table) -> (Vec<(String, Vec<Option<f64>>)>, Option<String>) {
        let mut series: Vec<(String, Vec<Option<f64>>)> = table
            .numeric_column_names()
            .into_iter()
            .filter_map(|name| {
                let values = table.numeric_values(&name)?;
                Some((name, values))
            })
            .collect();

        let mut coerced_column = None;
        if let Some(last) = table.last_column()
            && table.kind(&last) == Some(ColumnKind::NonNumeric)
        {
            match viable_coercion(table, &last) {
                Some(values) => {
                    debug!("Coerced last column '{}' into the correlation set", last);
                    series.push((last.clone(), values));
                    coerced_column = Some(last);
                }
                None => {
                    warn!(
                        "Last column '{}' has no numeric values; excluded from correlations",
                        last
                    );
                }
            }
        }

        (series, coerced_column)
    }

    fn pearson_matrix(series: &[(String, Vec<Option<f64>>)]) -> CorrelationMatrix {
        let n = series.len();
        let mut values = vec![vec![None; n]; n];

        for i in 0..n {
            for j in i..n {
                let r = pearson(&series[i].1, &series[j].1);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        CorrelationMatrix {
            columns: series.iter().map(|(name, _)| name.clone()).collect(),
            values,
        }
    }

    /// Rank unordered pairs `(i, j)` with `i < j`, skipping undefined and
    /// non-finite cells.
    ///
    /// Self-pairs never appear and each unordered pair appears once. Ties keep
    /// matrix order.
    pub fn top_pairs(matrix: &CorrelationMatrix, top_n: usize) -> Vec<CorrelationPair> {
        let mut pairs: Vec<CorrelationPair> = Vec::new();
        let n = matrix.columns.len();

        for i in 0..n {
            for j in (i + 1)..n {
                if let Some(r) = matrix.values[i][j].filter(|r| r.is_finite()) {
                    pairs.push(CorrelationPair {
                        left: matrix.columns[i].clone(),
                        right: matrix.columns[j].clone(),
                        strength: r.abs(),
                    });
                }
            }
        }

        pairs.sort_by(|a, b| b.strength.total_cmp(&a.strength));
        pairs.truncate(top_n);
        pairs
    }
}

/// Coerce a column to numbers; `None` if nothing survives.
pub(crate) fn viable_coercion(table: &Table, name: &str) -> Option<Vec<Option<f64>>> {
    let values = table.coerced_values(name)?;
    if values.iter().any(Option::is_some) {
        Some(values)
    } else {
        None
    }
}

/// Pearson correlation over rows where both values are present.
pub(crate) fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return None;
    }

    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    // Infinite inputs turn the sums into NaN
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if !r.is_finite() {
        return None;
    }
    Some(r.clamp(-1.0, 1.0))
}
