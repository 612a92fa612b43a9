use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::dates::DateParser;
use super::table::{Cell, Table};
use super::CleaningReport;
use crate::config::CleaningConfig;
use crate::error::{CleanError, CleanResult};
use crate::logging::PerformanceTimer;

/// Trim, lowercase, and replace each space with an underscore
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Runs the cleaning pipeline over a borrowed table and returns a new one
pub struct TableCleaner {
    date_column: String,
    critical_columns: Vec<String>,
    dates: DateParser,
}

impl TableCleaner {
    pub fn new() -> Self {
        Self::with_config(&CleaningConfig::default())
    }

    pub fn with_config(config: &CleaningConfig) -> Self {
        Self {
            date_column: normalize_column_name(&config.date_column),
            critical_columns: config
                .critical_columns
                .iter()
                .map(|c| normalize_column_name(c))
                .collect(),
            dates: DateParser::with_formats(config.date_formats.clone()),
        }
    }

    pub fn clean(&self, raw: &Table) -> CleanResult<(Table, CleaningReport)> {
        let _timer = PerformanceTimer::start("clean table");
        let mut table = raw.clone();
        let mut report = CleaningReport {
            rows_in: raw.height(),
            missing_in_input: raw.missing_count(),
            ..Default::default()
        };

        self.normalize_columns(&mut table)?;
        report.date_indexed = self.index_by_date(&mut table)?;
        if !report.date_indexed {
            let message = format!(
                "no '{}' column found; skipping date indexing",
                self.date_column
            );
            warn!("⚠️  {}", message);
            report.warnings.push(message);
        }
        report.duplicates_removed = self.drop_duplicates(&mut table);
        report.zeros_replaced = self.replace_zeros(&mut table)?;
        report.missing_before_fill = table.missing_count();
        report.values_filled = self.forward_fill(&mut table);
        report.residual_rows_dropped = self.drop_incomplete(&mut table);
        // Forward-fill can recreate rows identical to their predecessor
        report.duplicates_after_fill = self.drop_duplicates(&mut table);
        report.missing_after_clean = table.missing_count();
        report.rows_out = table.height();

        info!("🧹 {}", report.summary());
        Ok((table, report))
    }

    fn normalize_columns(&self, table: &mut Table) -> CleanResult<()> {
        let mut seen = HashSet::new();
        for column in table.columns.iter_mut() {
            let normalized = normalize_column_name(column);
            if !seen.insert(normalized.clone()) {
                return Err(CleanError::processing(format!(
                    "column '{}' collides with another column after normalization ('{}')",
                    column, normalized
                )));
            }
            *column = normalized;
        }
        debug!("Normalized columns: {:?}", table.columns);
        Ok(())
    }

    /// Parse the date column, make it the ordering key, and stable-sort by it.
    /// Returns false when the table has no date column.
    fn index_by_date(&self, table: &mut Table) -> CleanResult<bool> {
        let Some(idx) = table.column_index(&self.date_column) else {
            return Ok(false);
        };

        for (i, row) in table.rows.iter_mut().enumerate() {
            let parsed = match &row[idx] {
                Cell::Missing => Cell::Missing,
                Cell::Date(dt) => Cell::Date(*dt),
                other => {
                    let text = other.render();
                    let dt = self.dates.parse(&text).ok_or_else(|| {
                        CleanError::processing(format!(
                            "unparseable date '{}' in row {}",
                            text,
                            i + 1
                        ))
                    })?;
                    Cell::Date(dt)
                }
            };
            row[idx] = parsed;
        }

        // Missing dates sort after every dated row; sort_by is stable
        table.rows.sort_by(|a, b| {
            let key = |cell: &Cell| match cell {
                Cell::Date(dt) => (false, Some(*dt)),
                _ => (true, None),
            };
            key(&a[idx]).cmp(&key(&b[idx]))
        });
        table.index = Some(idx);

        debug!("Indexed {} rows by '{}'", table.height(), self.date_column);
        Ok(true)
    }

    fn drop_duplicates(&self, table: &mut Table) -> usize {
        let before = table.rows.len();
        let keep: Vec<bool> = {
            let mut seen = HashSet::with_capacity(before);
            table
                .rows
                .iter()
                .map(|row| seen.insert(row.iter().map(Cell::key).collect::<Vec<_>>()))
                .collect()
        };

        let mut keep = keep.into_iter();
        table.rows.retain(|_| keep.next().unwrap_or(true));
        before - table.rows.len()
    }

    fn replace_zeros(&self, table: &mut Table) -> CleanResult<usize> {
        let mut replaced = 0;

        for name in &self.critical_columns {
            let Some(idx) = table.column_index(name) else {
                continue;
            };

            for (i, row) in table.rows.iter_mut().enumerate() {
                let is_zero = match &row[idx] {
                    Cell::Text(text) => {
                        return Err(CleanError::processing(format!(
                            "non-numeric value '{}' in column '{}' at row {}",
                            text,
                            name,
                            i + 1
                        )));
                    }
                    cell => cell.is_zero(),
                };
                if is_zero {
                    row[idx] = Cell::Missing;
                    replaced += 1;
                }
            }
        }

        Ok(replaced)
    }

    fn forward_fill(&self, table: &mut Table) -> usize {
        let mut filled = 0;

        for idx in 0..table.columns.len() {
            let mut last: Option<Cell> = None;
            for row in table.rows.iter_mut() {
                if row[idx].is_missing() {
                    if let Some(value) = &last {
                        row[idx] = value.clone();
                        filled += 1;
                    }
                } else {
                    last = Some(row[idx].clone());
                }
            }
        }

        filled
    }

    fn drop_incomplete(&self, table: &mut Table) -> usize {
        let before = table.rows.len();
        table.rows.retain(|row| !row.iter().any(Cell::is_missing));
        let dropped = before - table.rows.len();
        if dropped > 0 {
            warn!("Dropped {} rows with unresolvable missing values", dropped);
        }
        dropped
    }
}

impl Default for TableCleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Clean with the default configuration
pub fn clean(raw: &Table) -> CleanResult<(Table, CleaningReport)> {
    TableCleaner::new().clean(raw)
}
