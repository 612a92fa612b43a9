use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use super::table::{Cell, Table};
use crate::error::{CleanError, CleanResult};

/// Tokens read as missing in addition to empty cells
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>",
];

/// Loads a headed CSV file into a [`Table`]
pub struct CsvTableReader {
    na_values: HashSet<String>,
}

impl CsvTableReader {
    pub fn new() -> Self {
        Self::with_na_values(DEFAULT_NA_VALUES.iter().map(|s| s.to_string()))
    }

    pub fn with_na_values<I: IntoIterator<Item = String>>(na_values: I) -> Self {
        Self {
            na_values: na_values.into_iter().collect(),
        }
    }

    pub fn read_path(&self, path: &Path) -> CleanResult<Table> {
        let shown = path.display().to_string();
        if !path.is_file() {
            return Err(CleanError::not_found(shown));
        }

        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CleanError::not_found(shown.clone()),
            _ => CleanError::processing_with_source(format!("failed to open {}", shown), e),
        })?;

        let table = self.read_from(file)?;
        info!(
            "📥 Loaded {} rows x {} columns from {}",
            table.height(),
            table.width(),
            shown
        );
        Ok(table)
    }

    pub fn read_from<R: Read>(&self, reader: R) -> CleanResult<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| CleanError::processing_with_source("failed to read CSV header", e))?
            .iter()
            .map(|h| h.to_string())
            .collect();
        if headers.is_empty() {
            return Err(CleanError::processing("input has no columns"));
        }
        debug!("CSV header: {:?}", headers);

        let mut table = Table::new(headers);
        for (i, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| {
                CleanError::processing_with_source(format!("malformed CSV record {}", i + 1), e)
            })?;
            let row = record.iter().map(|field| self.parse_cell(field)).collect();
            table.push_row(row)?;
        }

        Ok(table)
    }

    fn parse_cell(&self, field: &str) -> Cell {
        let trimmed = field.trim();
        if trimmed.is_empty() || self.na_values.contains(trimmed) {
            return Cell::Missing;
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_nan() => Cell::Missing,
            Ok(value) => Cell::Number {
                value,
                raw: trimmed.to_string(),
            },
            Err(_) => Cell::Text(field.to_string()),
        }
    }
}

impl Default for CsvTableReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_headers_and_typed_cells() {
        let data = "Date,Close,Note\n2024-01-02,101.5,ok\n2024-01-03,,NA\n";
        let table = CsvTableReader::new().read_from(data.as_bytes()).unwrap();

        assert_eq!(table.columns(), &["Date", "Close", "Note"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.rows()[0][0], Cell::text("2024-01-02"));
        assert_eq!(table.rows()[0][1].as_f64(), Some(101.5));
        assert_eq!(table.rows()[0][1].render(), "101.5");
        assert!(table.rows()[1][1].is_missing());
        assert!(table.rows()[1][2].is_missing());
        assert_eq!(table.missing_count(), 2);
    }

    #[test]
    fn test_ragged_record_is_processing_error() {
        let data = "a,b\n1,2\n3\n";
        let err = CsvTableReader::new().read_from(data.as_bytes()).unwrap_err();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("malformed CSV record 2"));
    }

    #[test]
    fn test_empty_input_has_no_columns() {
        let err = CsvTableReader::new().read_from("".as_bytes()).unwrap_err();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("input has no columns"));
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = CsvTableReader::new().read_path(&path).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_custom_na_tokens() {
        let reader = CsvTableReader::with_na_values(vec!["-".to_string()]);
        let table = reader.read_from("x\n-\nNA\n".as_bytes()).unwrap();
        assert!(table.rows()[0][0].is_missing());
        assert_eq!(table.rows()[1][0], Cell::text("NA"));
    }
}
