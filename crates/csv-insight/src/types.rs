//! Data model shared across the analysis pipeline.
//!
//! Everything here is created fresh per upload and is read-only once built.
//! All types serialize so a display layer can consume them directly.

use serde::{Deserialize, Serialize};

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every non-missing value parses as a number (vacuously true for
    /// all-missing columns).
    Numeric,
    /// At least one value is not a number.
    NonNumeric,
}

impl ColumnKind {
    /// dtype label used in the schema summary.
    pub fn dtype_name(&self) -> &'static str {
        match self {
            Self::Numeric => "float64",
            Self::NonNumeric => "object",
        }
    }
}

/// Descriptive statistics of a numeric column. `None` marks an undefined value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// Descriptive statistics of a non-numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStatistics {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

impl ColumnStatistics {
    /// Number of non-missing values.
    pub fn count(&self) -> usize {
        match self {
            Self::Numeric(s) => s.count,
            Self::Categorical(s) => s.count,
        }
    }
}

/// Per-column type inference and descriptive statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing_count: usize,
    pub statistics: ColumnStatistics,
}

/// One row of the missing-value report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingEntry {
    pub column: String,
    pub count: usize,
}

/// Missing-value counts restricted to columns with at least one missing
/// value, in table column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingReport {
    pub entries: Vec<MissingEntry>,
}

impl MissingReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all missing counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Missing count for a column; `None` when the column has none.
    pub fn get(&self, column: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.column == column)
            .map(|e| e.count)
    }
}

/// One ranked correlation pair. `strength` is the absolute coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub left: String,
    pub right: String,
    pub strength: f64,
}

/// Schema line of the info summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub kind: ColumnKind,
}

/// Schema/info summary of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    /// Number of columns of each kind, as `(numeric, non_numeric)`.
    pub fn kind_counts(&self) -> (usize, usize) {
        let numeric = self
            .columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .count();
        (numeric, self.columns.len() - numeric)
    }
}

/// The first rows of a table, as cells and as CSV text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRows {
    pub header: Vec<String>,
    /// Display text per cell; `None` is a missing value.
    pub rows: Vec<Vec<Option<String>>>,
    /// The same rows written as CSV with a header line.
    pub csv: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_report_queries() {
        let report = MissingReport {
            entries: vec![
                MissingEntry {
                    column: "Age".to_string(),
                    count: 3,
                },
                MissingEntry {
                    column: "Cabin".to_string(),
                    count: 7,
                },
            ],
        };

        assert_eq!(report.total(), 10);
        assert_eq!(report.get("Cabin"), Some(7));
        assert_eq!(report.get("Fare"), None);
        assert!(!report.is_empty());
        assert!(MissingReport::default().is_empty());
    }

    #[test]
    fn test_kind_counts() {
        let info = TableInfo {
            rows: 2,
            columns: vec![
                ColumnInfo {
                    name: "a".to_string(),
                    non_null: 2,
                    kind: ColumnKind::Numeric,
                },
                ColumnInfo {
                    name: "b".to_string(),
                    non_null: 1,
                    kind: ColumnKind::NonNumeric,
                },
            ],
        };
        assert_eq!(info.kind_counts(), (1, 1));
    }

    #[test]
    fn test_statistics_serialize_tagged() {
        let stats = ColumnStatistics::Categorical(CategoricalSummary {
            count: 4,
            unique: 2,
            top: Some("male".to_string()),
            freq: Some(3),
        });
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"kind\":\"categorical\""));
        assert_eq!(stats.count(), 4);
    }
}
