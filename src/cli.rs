use std::path::PathBuf;
use tracing::info;

use crate::config::CleanerConfig;
use crate::error::CleanResult;
use crate::export::TableExporter;
use crate::logging::PerformanceTimer;
use crate::table_cleaner::{CleaningReport, CsvTableReader, Table, TableCleaner, TableFormatter};

/// Result of a successful clean run
#[derive(Debug)]
pub struct CleanOutcome {
    pub table: Table,
    pub report: CleaningReport,
    pub output: PathBuf,
}

/// Load, clean, and export the configured input file, then print a summary
/// and a preview. Nothing is written unless every step succeeds.
pub fn clean_command(config: &CleanerConfig) -> CleanResult<CleanOutcome> {
    let timer = PerformanceTimer::start("clean command");
    info!("📈 Cleaning stock data: {}", config.io.input.display());

    let reader = CsvTableReader::with_na_values(config.cleaning.na_values.iter().cloned());
    let raw = reader.read_path(&config.io.input)?;
    timer.checkpoint("loaded");

    let cleaner = TableCleaner::with_config(&config.cleaning);
    let (table, report) = cleaner.clean(&raw)?;
    timer.checkpoint("cleaned");

    TableExporter::export(&table, &config.io.output, config.io.format)?;
    timer.checkpoint("exported");

    println!("🎉 Cleaning Complete!");
    println!("   Input file: {:?}", config.io.input);
    println!("   Output file: {:?}", config.io.output);
    println!(
        "   Date index: {}",
        table.index_column().unwrap_or("none (no date column)")
    );
    println!("   Duplicates removed: {}", report.duplicates_removed + report.duplicates_after_fill);
    println!("   Zero values treated as missing: {}", report.zeros_replaced);
    println!("   Missing values handled: {}", report.missing_handled());
    println!("   Rows: {} -> {}", report.rows_in, report.rows_out);
    for warning in &report.warnings {
        println!("   ⚠️  {}", warning);
    }

    if config.io.preview_rows > 0 {
        println!();
        println!(
            "{}",
            TableFormatter::new().format_preview(&table, config.io.preview_rows)
        );
    }

    Ok(CleanOutcome {
        table,
        report,
        output: config.io.output.clone(),
    })
}
