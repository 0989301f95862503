//! Shared utilities for value classification.
//!
//! Every cell of an uploaded table goes through [`classify_value`] exactly
//! once. Column typing, coercion of the target column and missing-value
//! counts are all derived from the tagged [`CellValue`] it returns.

use polars::prelude::*;

// =============================================================================
// Cell Classification
// =============================================================================

/// Tokens read as a missing value (compared after trimming, case-sensitive).
pub const MISSING_MARKERS: [&str; 19] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A",
    "#N/A N/A", "#NA", "<NA>", "1.#QNAN", "-1.#QNAN", "1.#IND", "-1.#IND",
];

/// Tagged result of parsing a single raw cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    /// Parsed as a finite or infinite floating-point number.
    Numeric(f64),
    /// Empty or one of [`MISSING_MARKERS`].
    Missing,
    /// Anything else; carries the trimmed text.
    NonNumeric(&'a str),
}

impl CellValue<'_> {
    /// The numeric value, treating non-numeric text as missing.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

/// Check if a raw cell is a missing-value marker.
///
/// # Example
///
/// ```rust,ignore
/// use csv_insight::utils::is_missing_marker;
///
/// assert!(is_missing_marker("NA"));
/// assert!(is_missing_marker("   "));
/// assert!(!is_missing_marker("0"));
/// ```
pub fn is_missing_marker(s: &str) -> bool {
    let trimmed = s.trim();
    MISSING_MARKERS.iter().any(|&marker| trimmed == marker)
}

/// Parse and classify a raw cell. `None` (a null from the CSV reader) is missing.
pub fn classify_value(raw: Option<&str>) -> CellValue<'_> {
    let Some(raw) = raw else {
        return CellValue::Missing;
    };
    if is_missing_marker(raw) {
        return CellValue::Missing;
    }
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if !v.is_nan() => CellValue::Numeric(v),
        _ => CellValue::NonNumeric(trimmed),
    }
}

/// Coerce raw cells to numbers; anything that fails becomes missing.
pub fn coerce_numeric<'a, I>(values: I) -> Vec<Option<f64>>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    values
        .into_iter()
        .map(|raw| classify_value(raw).as_number())
        .collect()
}

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Render a float the way the text reports print it: integers without a
/// fractional part, everything else with at most six decimals.
pub fn format_number(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let formatted = format!("{:.6}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_numeric() {
        assert_eq!(classify_value(Some("42")), CellValue::Numeric(42.0));
        assert_eq!(classify_value(Some(" -3.5 ")), CellValue::Numeric(-3.5));
        assert_eq!(classify_value(Some("1e3")), CellValue::Numeric(1000.0));
    }

    #[test]
    fn test_classify_missing() {
        assert!(classify_value(None).is_missing());
        assert!(classify_value(Some("")).is_missing());
        assert!(classify_value(Some("  ")).is_missing());
        assert!(classify_value(Some("NA")).is_missing());
        assert!(classify_value(Some("NaN")).is_missing());
        assert!(classify_value(Some("null")).is_missing());
    }

    #[test]
    fn test_classify_non_numeric() {
        assert_eq!(classify_value(Some(" male ")), CellValue::NonNumeric("male"));
        // Formatting characters are not stripped
        assert_eq!(classify_value(Some("$12")), CellValue::NonNumeric("$12"));
        assert_eq!(classify_value(Some("1,000")), CellValue::NonNumeric("1,000"));
    }

    #[test]
    fn test_missing_markers_are_case_sensitive() {
        assert!(is_missing_marker("NULL"));
        assert!(!is_missing_marker("Null"));
        assert!(!is_missing_marker("missing"));
    }

    #[test]
    fn test_coerce_numeric() {
        let raw = vec![Some("1"), Some("two"), None, Some("4.5")];
        assert_eq!(coerce_numeric(raw), vec![Some(1.0), None, None, Some(4.5)]);
    }

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
        assert_eq!(format_number(-0.25), "-0.25");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }
}
