pub mod table;
pub mod reader;
pub mod dates;
pub mod formatter;
pub mod cleaner;

pub use cleaner::{clean, normalize_column_name, TableCleaner};
pub use table::{Cell, Table};
pub use reader::CsvTableReader;
pub use dates::DateParser;
pub use formatter::{TableFormatter, ColumnAlignment};

use serde::Serialize;

/// Counts gathered while cleaning. Reported, never persisted.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CleaningReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub date_indexed: bool,
    pub duplicates_removed: usize,
    pub duplicates_after_fill: usize,
    pub zeros_replaced: usize,
    pub missing_in_input: usize,
    pub missing_before_fill: usize,
    pub values_filled: usize,
    pub residual_rows_dropped: usize,
    pub missing_after_clean: usize,
    /// Conditions that did not stop the run but were logged as warnings
    pub warnings: Vec<String>,
}

impl CleaningReport {
    /// Best-effort diagnostic: missing values present before forward-fill minus
    /// those still present at the end. Counts cells dropped with their rows as handled.
    pub fn missing_handled(&self) -> usize {
        self.missing_before_fill
            .saturating_sub(self.missing_after_clean)
    }

    pub fn summary(&self) -> String {
        format!(
            "Cleaned {} rows into {}: removed {} duplicates, replaced {} zeros, handled {} missing values ({} forward-filled, {} rows dropped).",
            self.rows_in,
            self.rows_out,
            self.duplicates_removed + self.duplicates_after_fill,
            self.zeros_replaced,
            self.missing_handled(),
            self.values_filled,
            self.residual_rows_dropped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let report = CleaningReport {
            rows_in: 10,
            rows_out: 7,
            duplicates_removed: 2,
            zeros_replaced: 3,
            missing_before_fill: 4,
            values_filled: 3,
            residual_rows_dropped: 1,
            ..Default::default()
        };
        assert_eq!(report.missing_handled(), 4);
        assert_eq!(
            report.summary(),
            "Cleaned 10 rows into 7: removed 2 duplicates, replaced 3 zeros, handled 4 missing values (3 forward-filled, 1 rows dropped)."
        );
    }
}
