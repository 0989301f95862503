//! In-memory table built from an upload.
//!
//! A [`Table`] wraps a polars [`DataFrame`] whose columns have been
//! normalised once: numeric columns are `Float64`, every other column is
//! `String` holding the raw cell text. Missing markers are nulls in both.
//! polars guarantees the rectangular shape and unique column names.

use crate::error::{InsightError, Result};
use crate::types::{ColumnKind, SampleRows};
use crate::utils::{CellValue, classify_value, coerce_numeric, format_number, is_numeric_dtype};
use polars::prelude::*;
use tracing::debug;

/// Rectangular dataset with named, typed columns.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
}

impl Table {
    /// Build a table from a frame of raw text columns.
    ///
    /// Each column is classified value by value: it becomes numeric iff no
    /// non-missing value fails to parse.
    pub fn from_raw(raw: &DataFrame) -> Result<Self> {
        let mut columns: Vec<Column> = Vec::with_capacity(raw.width());

        for column in raw.get_columns() {
            let series = column.as_materialized_series();
            let name = series.name().clone();
            let text_series = series.cast(&DataType::String)?;
            let text = text_series.str()?;

            let is_numeric = text
                .into_iter()
                .all(|raw| !matches!(classify_value(raw), CellValue::NonNumeric(_)));

            let normalised = if is_numeric {
                Series::new(name, coerce_numeric(text.into_iter()))
            } else {
                let values: Vec<Option<String>> = text
                    .into_iter()
                    .map(|raw| match classify_value(raw) {
                        CellValue::Missing => None,
                        _ => raw.map(str::to_string),
                    })
                    .collect();
                Series::new(name, values)
            };

            debug!(
                "Column '{}' classified as {}",
                normalised.name(),
                if is_numeric { "numeric" } else { "non-numeric" }
            );
            columns.push(Column::from(normalised));
        }

        let frame = DataFrame::new(columns)?;
        Ok(Self { frame })
    }

    /// The underlying polars frame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Name of the last column, if any.
    pub fn last_column(&self) -> Option<String> {
        self.frame
            .get_column_names()
            .last()
            .map(|name| name.to_string())
    }

    /// Inferred kind of a column, or `None` if absent.
    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        let column = self.frame.column(name).ok()?;
        if is_numeric_dtype(column.dtype()) {
            Some(ColumnKind::Numeric)
        } else {
            Some(ColumnKind::NonNumeric)
        }
    }

    /// Names of numeric columns in table order.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.column_names()
            .into_iter()
            .filter(|name| self.kind(name) == Some(ColumnKind::Numeric))
            .collect()
    }

    /// The normalised column as a series.
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.frame
            .column(name)
            .ok()
            .map(|column| column.as_materialized_series())
    }

    /// Values of a numeric column; `None` if the column is absent or not numeric.
    pub fn numeric_values(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let column = self.frame.column(name).ok()?;
        let values = column.as_materialized_series().f64().ok()?;
        Some(values.into_iter().collect())
    }

    /// Values of a non-numeric column; `None` if absent or numeric.
    pub fn text_values(&self, name: &str) -> Option<Vec<Option<String>>> {
        let column = self.frame.column(name).ok()?;
        let values = column.as_materialized_series().str().ok()?;
        Some(
            values
                .into_iter()
                .map(|value| value.map(str::to_string))
                .collect(),
        )
    }

    /// Values of a column coerced to numbers.
    ///
    /// Numeric columns are returned as-is; for non-numeric columns every
    /// value that fails to parse becomes missing.
    pub fn coerced_values(&self, name: &str) -> Option<Vec<Option<f64>>> {
        match self.kind(name)? {
            ColumnKind::Numeric => self.numeric_values(name),
            ColumnKind::NonNumeric => {
                let column = self.frame.column(name).ok()?;
                let values = column.as_materialized_series().str().ok()?;
                Some(coerce_numeric(values.into_iter()))
            }
        }
    }

    /// Number of missing values in a column.
    pub fn missing_count(&self, name: &str) -> Result<usize> {
        let column = self
            .frame
            .column(name)
            .map_err(|_| InsightError::ColumnNotFound(name.to_string()))?;
        Ok(column.null_count())
    }

    /// Row-major missing mask for the missing-value heatmap.
    pub fn missing_mask(&self) -> Vec<Vec<bool>> {
        let mut mask = vec![vec![false; self.width()]; self.height()];
        for (col_idx, column) in self.frame.get_columns().iter().enumerate() {
            let nulls = column.as_materialized_series().is_null();
            for (row_idx, is_null) in nulls.into_iter().enumerate() {
                if is_null.unwrap_or(false) {
                    mask[row_idx][col_idx] = true;
                }
            }
        }
        mask
    }

    /// The first `n` rows as display text and as CSV.
    ///
    /// Numbers are printed the way the text reports print them, so a
    /// whole-valued float reads `22` rather than `22.0`.
    pub fn head(&self, n: usize) -> Result<SampleRows> {
        let head = self.frame.head(Some(n));

        let mut display: Vec<Column> = Vec::with_capacity(head.width());
        for column in head.get_columns() {
            let series = column.as_materialized_series();
            let cells: Vec<Option<String>> = match series.f64() {
                Ok(values) => values.into_iter().map(|v| v.map(format_number)).collect(),
                Err(_) => series
                    .str()?
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect(),
            };
            display.push(Column::from(Series::new(series.name().clone(), cells)));
        }
        let mut display = DataFrame::new(display)?;

        let mut buffer: Vec<u8> = Vec::new();
        CsvWriter::new(&mut buffer)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut display)?;

        let header = self.column_names();
        let mut rows = vec![Vec::with_capacity(header.len()); display.height()];
        for column in display.get_columns() {
            let cells = column.as_materialized_series().str()?;
            for (row, cell) in rows.iter_mut().zip(cells.into_iter()) {
                row.push(cell.map(str::to_string));
            }
        }

        Ok(SampleRows {
            header,
            rows,
            csv: String::from_utf8(buffer)
                .map_err(|e| PolarsError::ComputeError(e.to_string().into()))?,
        })
    }
}
