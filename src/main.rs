use std::path::PathBuf;
use std::process::ExitCode;
use clap::Parser;
use anyhow::Result;

use stock_cleaner::cli;
use stock_cleaner::config::CleanerConfig;
use stock_cleaner::error::CleanResult;
use stock_cleaner::export::OutputFormat;
use stock_cleaner::log_error;
use stock_cleaner::logging::{init_logging, LoggingConfig};

#[derive(Parser)]
#[command(name = "stock_cleaner")]
#[command(about = "Clean a daily stock price CSV: normalize headers, index by date, dedupe, fill gaps")]
struct Cli {
    /// Input CSV file (defaults to stock_data.csv)
    input: Option<PathBuf>,

    /// Output file (defaults to cleaned_stock_data.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of cleaned rows to preview (0 disables the preview)
    #[arg(short = 'n', long)]
    preview_rows: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Also write logs to daily files in this directory (advanced_logging feature)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Exit with a non-zero status when cleaning fails
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    let logging = LoggingConfig {
        level: if args.verbose { "debug" } else { "info" }.to_string(),
        log_dir: args.log_dir.clone().unwrap_or_else(|| PathBuf::from("logs")),
        enable_file_logging: args.log_dir.is_some(),
        enable_json_format: args.json_logs,
    };
    let _guard = init_logging(&logging)?;

    let result = resolve_config(&args).and_then(|config| cli::clean_command(&config));

    match result {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            log_error!(e, "clean");
            println!("{}", e.user_message());
            if args.strict {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Defaults, then config file, then environment, then command-line flags
fn resolve_config(args: &Cli) -> CleanResult<CleanerConfig> {
    let mut config = match &args.config {
        Some(path) => CleanerConfig::load_from_file(path)?.with_env_overrides()?,
        None => CleanerConfig::load_from_env()?,
    };

    if let Some(input) = &args.input {
        config.io.input = input.clone();
    }
    if let Some(format) = args.format {
        config.io.format = format;
        if args.output.is_none() {
            config.io.output.set_extension(format.extension());
        }
    }
    if let Some(output) = &args.output {
        config.io.output = output.clone();
    }
    if let Some(rows) = args.preview_rows {
        config.io.preview_rows = rows;
    }

    Ok(config)
}
