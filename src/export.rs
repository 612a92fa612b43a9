use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{CleanError, CleanResult, ErrorContext};
use crate::table_cleaner::{Cell, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, serde::Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Parquet => "parquet",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Writes cleaned tables to disk. Output lands in a temp file next to the
/// destination and is renamed into place only once fully written.
pub struct TableExporter;

impl TableExporter {
    pub fn export(table: &Table, output_path: &Path, format: OutputFormat) -> CleanResult<()> {
        info!("💾 Exporting {} rows to {} ({})", table.height(), output_path.display(), format);

        let dir = match output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context("failed to create temporary output file")?;

        match format {
            OutputFormat::Csv => Self::write_csv(table, tmp.as_file_mut())?,
            OutputFormat::Json => Self::write_json(table, tmp.as_file_mut())?,
            OutputFormat::Parquet => Self::write_parquet(table, tmp.as_file_mut())?,
        }

        tmp.persist(output_path).map_err(|e| {
            CleanError::processing_with_source(
                format!("failed to move output into place at {}", output_path.display()),
                e.error,
            )
        })?;

        info!("✅ Export completed: {}", output_path.display());
        Ok(())
    }

    /// Header row of normalized names, then one record per row. Index column first.
    pub fn write_csv<W: Write>(table: &Table, writer: W) -> CleanResult<()> {
        let order = table.output_order();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer
            .write_record(order.iter().map(|&i| table.columns()[i].as_str()))
            .with_context("failed to write CSV header")?;
        for row in table.rows() {
            csv_writer
                .write_record(order.iter().map(|&i| row[i].render().into_owned()))
                .with_context("failed to write CSV record")?;
        }
        csv_writer.flush().with_context("failed to flush CSV output")?;
        Ok(())
    }

    /// JSON array of records with keys in output column order
    pub fn write_json<W: Write>(table: &Table, writer: W) -> CleanResult<()> {
        let order = table.output_order();
        let records: Vec<JsonRecord<'_>> = table
            .rows()
            .iter()
            .map(|row| JsonRecord {
                columns: table.columns(),
                row,
                order: &order,
            })
            .collect();

        serde_json::to_writer_pretty(writer, &records).with_context("failed to write JSON output")
    }

    #[cfg(feature = "data_export")]
    pub fn write_parquet<W: Write>(table: &Table, writer: W) -> CleanResult<()> {
        use polars::prelude::*;

        let order = table.output_order();
        let mut columns = Vec::with_capacity(order.len());
        for &i in &order {
            let name = table.columns()[i].as_str();
            let numeric = table
                .rows()
                .iter()
                .all(|row| matches!(row[i], Cell::Number { .. } | Cell::Missing));

            let series = if numeric {
                let values: Vec<Option<f64>> = table.rows().iter().map(|row| row[i].as_f64()).collect();
                Series::new(name, values)
            } else {
                let values: Vec<Option<String>> = table
                    .rows()
                    .iter()
                    .map(|row| match &row[i] {
                        Cell::Missing => None,
                        cell => Some(cell.render().into_owned()),
                    })
                    .collect();
                Series::new(name, values)
            };
            columns.push(series);
        }

        let mut df = DataFrame::new(columns)
            .map_err(|e| CleanError::processing_with_source("failed to build DataFrame", e))?;
        ParquetWriter::new(writer)
            .finish(&mut df)
            .map_err(|e| CleanError::processing_with_source("failed to write Parquet output", e))?;
        Ok(())
    }

    #[cfg(not(feature = "data_export"))]
    pub fn write_parquet<W: Write>(_table: &Table, _writer: W) -> CleanResult<()> {
        Err(CleanError::configuration(
            "Parquet output requires the `data_export` feature",
        ))
    }
}

struct JsonRecord<'a> {
    columns: &'a [String],
    row: &'a [Cell],
    order: &'a [usize],
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for &i in self.order {
            match &self.row[i] {
                Cell::Missing => map.serialize_entry(&self.columns[i], &None::<f64>)?,
                Cell::Number { value, .. } => map.serialize_entry(&self.columns[i], value)?,
                cell => map.serialize_entry(&self.columns[i], &*cell.render())?,
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn indexed_table() -> Table {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut table = Table::from_rows(
            vec!["close".into(), "date".into(), "note".into()],
            vec![vec![Cell::number(10.5), Cell::Date(day), Cell::text("a, b")]],
        )
        .unwrap();
        table.index = Some(1);
        table
    }

    #[test]
    fn test_csv_writes_index_first_and_quotes() {
        let mut out = Vec::new();
        TableExporter::write_csv(&indexed_table(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "date,close,note\n2024-01-02,10.5,\"a, b\"\n"
        );
    }

    #[test]
    fn test_json_records_keep_column_order() {
        let mut out = Vec::new();
        TableExporter::write_json(&indexed_table(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let date_pos = text.find("\"date\"").unwrap();
        let close_pos = text.find("\"close\"").unwrap();
        assert!(date_pos < close_pos);

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["close"], serde_json::json!(10.5));
        assert_eq!(parsed[0]["date"], serde_json::json!("2024-01-02"));
    }

    #[test]
    fn test_export_replaces_destination_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale").unwrap();

        TableExporter::export(&indexed_table(), &path, OutputFormat::Csv).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("date,close,note\n"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::default(), OutputFormat::Csv);
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
