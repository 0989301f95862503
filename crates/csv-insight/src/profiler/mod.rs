//! Column profiling for uploaded tables.
//!
//! This module provides:
//! - Type inference results per column (numeric vs. non-numeric)
//! - Descriptive statistics (`describe`-style)
//! - Missing-value counts and the filtered [`MissingReport`]
//! - The schema/info summary
//!
//! Values that cannot be summarized show up as absent statistics rather
//! than errors; profiling only fails if the table itself is inconsistent.

mod statistics;

use crate::error::{InsightError, Result};
use crate::table::Table;
use crate::types::{
    ColumnInfo, ColumnKind, ColumnProfile, ColumnStatistics, MissingEntry, MissingReport,
    TableInfo,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub(crate) use statistics::quantile_sorted;
use statistics::{categorical_summary, numeric_summary};

/// Result of profiling a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub info: TableInfo,
    /// One profile per column, in table order.
    pub columns: Vec<ColumnProfile>,
    pub missing: MissingReport,
}

impl DatasetProfile {
    /// Profile for a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Profiler for computing schema info, statistics and missing counts.
pub struct Profiler;

impl Profiler {
    /// Profile every column of a table.
    pub fn profile(table: &Table) -> Result<DatasetProfile> {
        let columns = table
            .column_names()
            .iter()
            .map(|name| Self::profile_column(table, name))
            .collect::<Result<Vec<ColumnProfile>>>()?;

        let missing = Self::missing_report(&columns);
        let info = Self::table_info(table.height(), &columns);

        Ok(DatasetProfile {
            info,
            columns,
            missing,
        })
    }

    fn profile_column(table: &Table, name: &str) -> Result<ColumnProfile> {
        let series = table
            .series(name)
            .ok_or_else(|| InsightError::ColumnNotFound(name.to_string()))?;
        let kind = table.kind(name).unwrap_or(ColumnKind::NonNumeric);
        let missing_count = table.missing_count(name)?;

        let statistics = match kind {
            ColumnKind::Numeric => ColumnStatistics::Numeric(numeric_summary(series)?),
            ColumnKind::NonNumeric => {
                let values = table.text_values(name).unwrap_or_default();
                ColumnStatistics::Categorical(categorical_summary(&values))
            }
        };

        debug!(
            "Profiled '{}': {} present, {} missing",
            name,
            statistics.count(),
            missing_count
        );

        Ok(ColumnProfile {
            name: name.to_string(),
            kind,
            missing_count,
            statistics,
        })
    }

    /// Missing counts filtered to non-zero, in column order.
    pub fn missing_report(columns: &[ColumnProfile]) -> MissingReport {
        MissingReport {
            entries: columns
                .iter()
                .filter(|c| c.missing_count > 0)
                .map(|c| MissingEntry {
                    column: c.name.clone(),
                    count: c.missing_count,
                })
                .collect(),
        }
    }

    fn table_info(rows: usize, columns: &[ColumnProfile]) -> TableInfo {
        TableInfo {
            rows,
            columns: columns
                .iter()
                .map(|c| ColumnInfo {
                    name: c.name.clone(),
                    non_null: c.statistics.count(),
                    kind: c.kind,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::TabularLoader;

    #[test]
    fn test_one_profile_per_column() {
        let table =
            TabularLoader::load_bytes(b"a,b,c\n1,x,\n2,,5\n,z,6\n").unwrap();
        let profile = Profiler::profile(&table).unwrap();

        assert_eq!(profile.columns.len(), 3);
        let per_column: usize = profile.columns.iter().map(|c| c.missing_count).sum();
        assert_eq!(profile.missing.total(), per_column);
        assert_eq!(profile.missing.total(), 3);
    }

    #[test]
    fn test_single_column_with_missing() {
        let table = TabularLoader::load_bytes(b"x\n1\n2\n2\n3\nNA\n").unwrap();
        let profile = Profiler::profile(&table).unwrap();
        let x = profile.column("x").unwrap();

        assert_eq!(x.missing_count, 1);
        assert_eq!(profile.missing.get("x"), Some(1));
        assert_eq!(profile.missing.entries.len(), 1);
        match &x.statistics {
            ColumnStatistics::Numeric(stats) => {
                assert_eq!(stats.count, 4);
                assert_eq!(stats.mean, Some(2.0));
            }
            other => panic!("expected numeric statistics, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_report_order_and_filter() {
        let table = TabularLoader::load_bytes(b"z,a,m\nNA,1,\n1,2,\n").unwrap();
        let profile = Profiler::profile(&table).unwrap();

        let columns: Vec<&str> = profile
            .missing
            .entries
            .iter()
            .map(|e| e.column.as_str())
            .collect();
        assert_eq!(columns, vec!["z", "m"]);
        assert_eq!(profile.missing.get("z"), Some(1));
        assert_eq!(profile.missing.get("m"), Some(2));
        assert_eq!(profile.missing.get("a"), None);
    }

    #[test]
    fn test_all_missing_column_reports_absent_stats() {
        let table = TabularLoader::load_bytes(b"id,empty\n1,\n2,\n").unwrap();
        let profile = Profiler::profile(&table).unwrap();
        let empty = profile.column("empty").unwrap();

        assert_eq!(empty.kind, ColumnKind::Numeric);
        assert_eq!(empty.missing_count, 2);
        match &empty.statistics {
            ColumnStatistics::Numeric(stats) => {
                assert_eq!(stats.count, 0);
                assert!(stats.mean.is_none());
            }
            other => panic!("expected numeric statistics, got {:?}", other),
        }
    }

    #[test]
    fn test_table_info() {
        let table = TabularLoader::load_bytes(b"n,s\n1,a\n,b\n").unwrap();
        let profile = Profiler::profile(&table).unwrap();

        assert_eq!(profile.info.rows, 2);
        assert_eq!(profile.info.columns[0].non_null, 1);
        assert_eq!(profile.info.columns[0].kind, ColumnKind::Numeric);
        assert_eq!(profile.info.columns[1].kind, ColumnKind::NonNumeric);
        assert_eq!(profile.info.kind_counts(), (1, 1));
    }
}
