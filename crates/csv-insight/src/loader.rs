//! Tabular loader: raw upload bytes to a [`Table`].
//!
//! Decoding tries strict UTF-8 first and retries with the byte-order mark
//! removed; bytes that are still not UTF-8 are a malformed upload.
//! Whitespace-only content is rejected before any parsing. Parsing
//! is comma-delimited with the first row as header; every column is read as
//! text so that typing happens per column downstream.

use crate::error::{InsightError, Result, ResultExt};
use crate::table::Table;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Loads CSV uploads into tables.
pub struct TabularLoader;

impl TabularLoader {
    /// Decode raw bytes to text.
    ///
    /// A leading byte-order mark is dropped in both paths.
    ///
    /// # Errors
    ///
    /// [`InsightError::MalformedCsv`] if the bytes are not UTF-8 with or
    /// without the mark.
    pub fn decode(bytes: &[u8]) -> Result<String> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string()),
            Err(e) => {
                warn!(
                    "Upload is not valid UTF-8 ({}), retrying with BOM-tolerant decoding",
                    e
                );
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                let text = std::str::from_utf8(body).map_err(|e| {
                    InsightError::MalformedCsv(format!("upload is not valid UTF-8: {}", e))
                })?;
                Ok(text.to_string())
            }
        }
    }

    /// Decode and parse an upload.
    ///
    /// # Errors
    ///
    /// - [`InsightError::EmptyInput`] if the decoded text is blank
    /// - [`InsightError::MalformedCsv`] if it cannot be parsed into a
    ///   rectangular table
    pub fn load_bytes(bytes: &[u8]) -> Result<Table> {
        let content = Self::decode(bytes)?;
        if content.trim().is_empty() {
            return Err(InsightError::EmptyInput);
        }

        let raw = Self::parse_csv(content)?;
        info!("Parsed upload: {} rows x {} columns", raw.height(), raw.width());
        Table::from_raw(&raw)
    }

    /// Read a file from disk and load it.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(InsightError::from)
            .context(format!("Reading {}", path.display()))?;
        Self::load_bytes(&bytes)
    }

    fn parse_csv(content: String) -> Result<DataFrame> {
        let cursor = Cursor::new(content.into_bytes());

        // Schema inference is disabled so every column arrives as text
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(cursor)
            .finish()
            .map_err(|e| {
                debug!("CSV parsing failed: {}", e);
                InsightError::MalformedCsv(e.to_string())
            })?;

        if frame.width() == 0 {
            return Err(InsightError::MalformedCsv(
                "no header row found".to_string(),
            ));
        }

        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnKind;

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            TabularLoader::load_bytes(b""),
            Err(InsightError::EmptyInput)
        ));
        assert!(matches!(
            TabularLoader::load_bytes(b"  \n\t \r\n"),
            Err(InsightError::EmptyInput)
        ));
    }

    #[test]
    fn test_basic_load() {
        let table = TabularLoader::load_bytes(b"a,b,c\n1,x,2.5\n2,y,3.5\n").unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.column_names(), vec!["a", "b", "c"]);
        assert_eq!(table.kind("a"), Some(ColumnKind::Numeric));
        assert_eq!(table.kind("b"), Some(ColumnKind::NonNumeric));
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"id,value\n1,10\n");
        let table = TabularLoader::load_bytes(&bytes).unwrap();
        assert_eq!(table.column_names(), vec!["id", "value"]);
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let result = TabularLoader::load_bytes(b"name,score\ncaf\xe9,3\n");
        assert!(matches!(result, Err(InsightError::MalformedCsv(_))));

        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"name,score\ncaf\xe9,3\n");
        let err = TabularLoader::decode(&bytes).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_CSV");
        assert!(err.is_load_error());
    }

    #[test]
    fn test_bom_with_accented_text() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("name,score\ncafé,3\n".as_bytes());
        assert_eq!(TabularLoader::decode(&bytes).unwrap(), "name,score\ncafé,3\n");

        let table = TabularLoader::load_bytes(&bytes).unwrap();
        assert_eq!(table.text_values("name"), Some(vec![Some("café".to_string())]));
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        let result = TabularLoader::load_bytes(b"a,b\n1,2\n3,4,5,6\n");
        assert!(matches!(result, Err(InsightError::MalformedCsv(_))));
    }

    #[test]
    fn test_header_only_gives_empty_table() {
        let table = TabularLoader::load_bytes(b"a,b\n").unwrap();
        assert_eq!(table.height(), 0);
        assert_eq!(table.width(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = TabularLoader::load_path("/definitely/not/here.csv");
        let err = result.unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(!err.is_load_error());
    }
}
