//! Plain-text renderers for analysis artifacts.
//!
//! The same renderers feed the summary prompt and the CLI, so the model sees
//! exactly what the user sees.

use crate::types::{
    ColumnProfile, ColumnStatistics, CorrelationPair, MissingReport, TableInfo,
};
use crate::utils::format_number;

/// Marker printed when the correlation ranking is empty.
pub const NO_CORRELATIONS: &str = "No correlations found";

/// Marker printed when no column has a missing value.
pub const NO_MISSING_VALUES: &str = "No missing values found";

const ABSENT: &str = "NaN";

/// Row labels of the describe table, in order.
const DESCRIBE_ROWS: [&str; 11] = [
    "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max",
];

/// Schema summary: row count, one line per column, dtype counts.
pub fn render_info(info: &TableInfo) -> String {
    let mut grid = vec![vec![
        " #".to_string(),
        "Column".to_string(),
        "Non-Null Count".to_string(),
        "Dtype".to_string(),
    ]];
    grid.push(vec![
        "---".to_string(),
        "------".to_string(),
        "--------------".to_string(),
        "-----".to_string(),
    ]);
    for (idx, column) in info.columns.iter().enumerate() {
        grid.push(vec![
            format!(" {}", idx),
            column.name.clone(),
            format!("{} non-null", column.non_null),
            column.kind.dtype_name().to_string(),
        ]);
    }

    let mut out = String::new();
    if info.rows == 0 {
        out.push_str("RangeIndex: 0 entries\n");
    } else {
        out.push_str(&format!(
            "RangeIndex: {} entries, 0 to {}\n",
            info.rows,
            info.rows - 1
        ));
    }
    out.push_str(&format!(
        "Data columns (total {} columns):\n",
        info.columns.len()
    ));
    out.push_str(&align_left(&grid));

    let (numeric, non_numeric) = info.kind_counts();
    let mut dtypes = Vec::new();
    if numeric > 0 {
        dtypes.push(format!("float64({})", numeric));
    }
    if non_numeric > 0 {
        dtypes.push(format!("object({})", non_numeric));
    }
    out.push_str(&format!("dtypes: {}\n", dtypes.join(", ")));
    out
}

/// `describe(include=all)`-style table: one column per table column.
pub fn render_describe(columns: &[ColumnProfile]) -> String {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(DESCRIBE_ROWS.len() + 1);

    let mut header = vec![String::new()];
    header.extend(columns.iter().map(|c| c.name.clone()));
    grid.push(header);

    for (row_idx, label) in DESCRIBE_ROWS.iter().enumerate() {
        let mut row = vec![label.to_string()];
        row.extend(columns.iter().map(|c| describe_cell(&c.statistics, row_idx)));
        grid.push(row);
    }

    align_right(&grid)
}

fn describe_cell(statistics: &ColumnStatistics, row_idx: usize) -> String {
    let number = |value: Option<f64>| value.map(format_number).unwrap_or_else(|| ABSENT.to_string());
    match statistics {
        ColumnStatistics::Numeric(s) => match row_idx {
            0 => s.count.to_string(),
            4 => number(s.mean),
            5 => number(s.std),
            6 => number(s.min),
            7 => number(s.q1),
            8 => number(s.median),
            9 => number(s.q3),
            10 => number(s.max),
            _ => ABSENT.to_string(),
        },
        ColumnStatistics::Categorical(s) => match row_idx {
            0 => s.count.to_string(),
            1 => s.unique.to_string(),
            2 => s.top.clone().unwrap_or_else(|| ABSENT.to_string()),
            3 => s
                .freq
                .map(|f| f.to_string())
                .unwrap_or_else(|| ABSENT.to_string()),
            _ => ABSENT.to_string(),
        },
    }
}

/// `column: count` lines, or [`NO_MISSING_VALUES`].
pub fn render_missing(report: &MissingReport) -> String {
    if report.is_empty() {
        return NO_MISSING_VALUES.to_string();
    }
    report
        .entries
        .iter()
        .map(|e| format!("{}: {}", e.column, e.count))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `A vs B: |r|` lines, or [`NO_CORRELATIONS`].
pub fn render_correlations(pairs: &[CorrelationPair]) -> String {
    if pairs.is_empty() {
        return NO_CORRELATIONS.to_string();
    }
    pairs
        .iter()
        .map(|p| format!("{} vs {}: {:.3}", p.left, p.right, p.strength))
        .collect::<Vec<_>>()
        .join("\n")
}

fn column_widths(grid: &[Vec<String>]) -> Vec<usize> {
    let columns = grid.iter().map(Vec::len).max().unwrap_or(0);
    (0..columns)
        .map(|c| {
            grid.iter()
                .filter_map(|row| row.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn align_left(grid: &[Vec<String>]) -> String {
    let widths = column_widths(grid);
    let mut out = String::new();
    for row in grid {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn align_right(grid: &[Vec<String>]) -> String {
    let widths = column_widths(grid);
    let mut out = String::new();
    for row in grid {
        let line = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(idx, (cell, w))| {
                if idx == 0 {
                    format!("{:<width$}", cell, width = *w)
                } else {
                    format!("{:>width$}", cell, width = *w)
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
