//! Distribution planning for box plots.
//!
//! The planner picks at most one target column and decides, per numeric
//! column, between a plain distribution and one grouped by the target. It
//! computes the box statistics a renderer needs but draws nothing itself.

use crate::correlation::viable_coercion;
use crate::profiler::quantile_sorted;
use crate::table::Table;
use crate::types::ColumnKind;
use crate::utils::format_number;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Label-like column names tried before the last-column fallback, in order.
/// The first numeric match wins.
pub const TARGET_CANDIDATES: [&str; 4] = ["Survived", "target", "label", "outcome"];

/// Five-number summary plus whiskers for one box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest value within `q1 - 1.5 * IQR`.
    pub whisker_low: f64,
    /// Highest value within `q3 + 1.5 * IQR`.
    pub whisker_high: f64,
    /// Values beyond the whiskers.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Box statistics for present finite values; `None` if there are none.
    ///
    /// Infinite values have no place on a plot axis and are left out.
    pub fn from_values(values: &[Option<f64>]) -> Option<Self> {
        let mut sorted: Vec<f64> = values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = quantile_sorted(&sorted, 0.25)?;
        let median = quantile_sorted(&sorted, 0.5)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let inside: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|v| *v >= low_fence && *v <= high_fence)
            .collect();
        let outliers: Vec<f64> = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            count: sorted.len(),
            q1,
            median,
            q3,
            whisker_low: inside.first().copied().unwrap_or(q1),
            whisker_high: inside.last().copied().unwrap_or(q3),
            outliers,
        })
    }
}

/// One box of a grouped view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBox {
    /// Target value this group holds.
    pub key: f64,
    pub label: String,
    pub stats: Option<BoxStats>,
}

/// Rendering plan for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DistributionView {
    /// Plain single-column distribution.
    Single {
        column: String,
        stats: Option<BoxStats>,
    },
    /// Distribution split by each distinct target value.
    Grouped {
        column: String,
        by: String,
        groups: Vec<GroupBox>,
    },
}

impl DistributionView {
    pub fn column(&self) -> &str {
        match self {
            Self::Single { column, .. } | Self::Grouped { column, .. } => column,
        }
    }

    /// Title a renderer can put above the plot.
    pub fn title(&self) -> String {
        match self {
            Self::Single { column, .. } => format!("{} Distribution", column),
            Self::Grouped { column, by, .. } => format!("{} by {}", column, by),
        }
    }
}

/// Plans for every numeric column except the target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionPlan {
    pub target: Option<String>,
    pub views: Vec<DistributionView>,
}

/// Decides target column and per-column views.
pub struct DistributionPlanner;

impl DistributionPlanner {
    /// Choose the target column.
    ///
    /// Tries [`TARGET_CANDIDATES`] in order and then the last column. A
    /// candidate qualifies when it exists and is numeric; the last column
    /// also qualifies when it can be coerced to numbers.
    pub fn infer_target(table: &Table) -> Option<String> {
        let last = table.last_column();
        let candidates = TARGET_CANDIDATES
            .iter()
            .map(|name| name.to_string())
            .chain(last.clone());

        for candidate in candidates {
            match table.kind(&candidate) {
                Some(ColumnKind::Numeric) => return Some(candidate),
                Some(ColumnKind::NonNumeric)
                    if last.as_deref() == Some(candidate.as_str())
                        && viable_coercion(table, &candidate).is_some() =>
                {
                    return Some(candidate);
                }
                _ => {}
            }
        }
        None
    }

    /// Build the plan for a table.
    pub fn plan(table: &Table) -> DistributionPlan {
        let target = Self::infer_target(table);
        match &target {
            Some(name) => info!("Target column: '{}'", name),
            None => info!("No target column found; planning ungrouped distributions"),
        }

        let target_values = target
            .as_deref()
            .and_then(|name| table.coerced_values(name));

        let views = table
            .numeric_column_names()
            .into_iter()
            .filter(|name| target.as_deref() != Some(name.as_str()))
            .filter_map(|name| {
                let values = table.numeric_values(&name)?;
                let view = match (&target, &target_values) {
                    (Some(by), Some(keys)) => DistributionView::Grouped {
                        groups: group_boxes(&values, keys),
                        column: name,
                        by: by.clone(),
                    },
                    _ => DistributionView::Single {
                        stats: BoxStats::from_values(&values),
                        column: name,
                    },
                };
                debug!("Planned view: {}", view.title());
                Some(view)
            })
            .collect();

        DistributionPlan { target, views }
    }
}

/// Split `values` by distinct target keys, ascending. Rows with a missing
/// or infinite key are left out.
fn group_boxes(values: &[Option<f64>], keys: &[Option<f64>]) -> Vec<GroupBox> {
    let mut distinct: Vec<f64> = keys
        .iter()
        .flatten()
        .copied()
        .filter(|k| k.is_finite())
        .collect();
    distinct.sort_by(|a, b| a.total_cmp(b));
    distinct.dedup();

    distinct
        .into_iter()
        .map(|key| {
            let members: Vec<Option<f64>> = values
                .iter()
                .zip(keys)
                .filter(|(_, k)| **k == Some(key))
                .map(|(v, _)| *v)
                .collect();
            GroupBox {
                key,
                label: format_number(key),
                stats: BoxStats::from_values(&members),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::TabularLoader;

    fn load(csv: &str) -> Table {
        TabularLoader::load_bytes(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_named_target_beats_last_column() {
        let table = load("A,Survived,B\n1,0,5\n2,1,6\n3,0,7\n");
        assert_eq!(
            DistributionPlanner::infer_target(&table).as_deref(),
            Some("Survived")
        );
    }

    #[test]
    fn test_priority_order() {
        let table = load("outcome,label,x\n1,0,5\n0,1,6\n");
        assert_eq!(
            DistributionPlanner::infer_target(&table).as_deref(),
            Some("label")
        );
    }

    #[test]
    fn test_non_numeric_named_candidate_skipped() {
        let table = load("target,x,y\nyes,1,5\nno,2,6\n");
        assert_eq!(DistributionPlanner::infer_target(&table).as_deref(), Some("y"));
    }

    #[test]
    fn test_last_column_fallback_with_coercion() {
        let table = load("x,grade\n1,3\n2,unknown\n3,4\n");
        assert_eq!(
            DistributionPlanner::infer_target(&table).as_deref(),
            Some("grade")
        );
    }

    #[test]
    fn test_no_target() {
        let table = load("x,name\n1,alice\n2,bob\n");
        assert_eq!(DistributionPlanner::infer_target(&table), None);

        let plan = DistributionPlanner::plan(&table);
        assert_eq!(plan.views.len(), 1);
        assert!(matches!(
            &plan.views[0],
            DistributionView::Single { column, stats: Some(_) } if column == "x"
        ));
        assert_eq!(plan.views[0].title(), "x Distribution");
    }

    #[test]
    fn test_grouped_plan_excludes_target() {
        let table = load("age,fare,Survived\n22,7.25,0\n38,71.28,1\n26,7.92,1\n35,53.1,1\n");
        let plan = DistributionPlanner::plan(&table);

        assert_eq!(plan.target.as_deref(), Some("Survived"));
        assert_eq!(plan.views.len(), 2);
        assert!(plan.views.iter().all(|v| v.column() != "Survived"));

        match &plan.views[0] {
            DistributionView::Grouped { column, by, groups } => {
                assert_eq!(column, "age");
                assert_eq!(by, "Survived");
                let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
                assert_eq!(labels, vec!["0", "1"]);
                assert_eq!(groups[0].stats.as_ref().unwrap().count, 1);
                assert_eq!(groups[1].stats.as_ref().unwrap().count, 3);
            }
            other => panic!("expected grouped view, got {:?}", other),
        }
        assert_eq!(plan.views[1].title(), "fare by Survived");
    }

    #[test]
    fn test_box_stats_outliers() {
        let values: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]
            .iter()
            .map(|v| Some(*v))
            .collect();
        let stats = BoxStats::from_values(&values).unwrap();

        assert_eq!(stats.count, 10);
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 9.0);
    }

    #[test]
    fn test_box_stats_empty() {
        assert!(BoxStats::from_values(&[None, None]).is_none());
    }

    #[test]
    fn test_box_stats_skip_infinite_values() {
        let stats =
            BoxStats::from_values(&[Some(1.0), Some(f64::INFINITY), Some(3.0), None]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.median, 2.0);
        assert!(stats.outliers.is_empty());

        assert!(BoxStats::from_values(&[Some(f64::NEG_INFINITY)]).is_none());
    }
}
