use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CleanError, CleanResult};
use crate::export::OutputFormat;
use crate::table_cleaner::dates::DEFAULT_DATE_FORMATS;
use crate::table_cleaner::reader::DEFAULT_NA_VALUES;

pub const DEFAULT_INPUT: &str = "stock_data.csv";
pub const DEFAULT_OUTPUT: &str = "cleaned_stock_data.csv";

/// Price/volume columns where an exact zero means "no data"
pub const CRITICAL_COLUMNS: &[&str] = &["open", "high", "low", "close", "volume", "adj_close"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CleanerConfig {
    pub io: IoConfig,
    pub cleaning: CleaningConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// CSV file to read
    pub input: PathBuf,

    /// Where the cleaned table is written
    pub output: PathBuf,

    pub format: OutputFormat,

    /// Rows shown in the console preview after a successful run
    pub preview_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Column used as the ordering key, matched after name normalization
    pub date_column: String,

    /// Columns whose zero values are treated as missing
    pub critical_columns: Vec<String>,

    /// Cell values read as missing in addition to empty cells
    pub na_values: Vec<String>,

    /// chrono formats tried in order when parsing the date column
    pub date_formats: Vec<String>,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            format: OutputFormat::Csv,
            preview_rows: 5,
        }
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            critical_columns: CRITICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            na_values: DEFAULT_NA_VALUES.iter().map(|v| v.to_string()).collect(),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl CleanerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CleanResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CleanError::configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: CleanerConfig = toml::from_str(&content)
            .map_err(|e| CleanError::configuration(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn load_from_env() -> CleanResult<Self> {
        Self::default().with_env_overrides()
    }

    /// Override with environment variables
    pub fn with_env_overrides(mut self) -> CleanResult<Self> {
        if let Ok(input) = std::env::var("STOCK_CLEANER_INPUT") {
            self.io.input = PathBuf::from(input);
        }

        if let Ok(output) = std::env::var("STOCK_CLEANER_OUTPUT") {
            self.io.output = PathBuf::from(output);
        }

        if let Ok(rows) = std::env::var("STOCK_CLEANER_PREVIEW_ROWS") {
            self.io.preview_rows = rows.parse::<usize>().map_err(|_| {
                CleanError::configuration(format!(
                    "STOCK_CLEANER_PREVIEW_ROWS must be a non-negative integer, got '{}'",
                    rows
                ))
            })?;
        }

        Ok(self)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> CleanResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CleanError::configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| CleanError::configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> CleanResult<()> {
        if self.cleaning.date_column.trim().is_empty() {
            return Err(CleanError::configuration("date_column must not be empty"));
        }
        if self.cleaning.date_formats.is_empty() {
            return Err(CleanError::configuration("date_formats must list at least one format"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = CleanerConfig::default();
        assert_eq!(config.io.input, PathBuf::from("stock_data.csv"));
        assert_eq!(config.io.output, PathBuf::from("cleaned_stock_data.csv"));
        assert_eq!(config.io.preview_rows, 5);
        assert_eq!(config.cleaning.critical_columns.len(), 6);
        assert!(config.cleaning.critical_columns.contains(&"adj_close".to_string()));
    }

    #[test]
    fn test_config_serialization() {
        let mut config = CleanerConfig::default();
        config.io.format = OutputFormat::Json;
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        config.save_to_file(&config_path).unwrap();

        let loaded_config = CleanerConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded_config, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[io]\npreview_rows = 10\n\n[cleaning]\ncritical_columns = [\"close\"]\n",
        )
        .unwrap();

        let config = CleanerConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.io.preview_rows, 10);
        assert_eq!(config.io.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(config.cleaning.critical_columns, vec!["close".to_string()]);
        assert_eq!(config.cleaning.date_column, "date");
    }

    #[test]
    fn test_env_overrides_defaults() {
        std::env::set_var("STOCK_CLEANER_INPUT", "prices.csv");
        std::env::set_var("STOCK_CLEANER_PREVIEW_ROWS", "many");
        let err = CleanerConfig::load_from_env().unwrap_err();
        assert!(matches!(err, CleanError::Configuration { .. }));

        std::env::set_var("STOCK_CLEANER_PREVIEW_ROWS", "2");
        let config = CleanerConfig::load_from_env().unwrap();
        std::env::remove_var("STOCK_CLEANER_INPUT");
        std::env::remove_var("STOCK_CLEANER_PREVIEW_ROWS");

        assert_eq!(config.io.input, PathBuf::from("prices.csv"));
        assert_eq!(config.io.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.io.preview_rows, 2);
    }

    #[test]
    fn test_invalid_file_is_configuration_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[cleaning]\ndate_column = \"\"\n").unwrap();

        let err = CleanerConfig::load_from_file(&config_path).unwrap_err();
        assert!(matches!(err, CleanError::Configuration { .. }));
    }
}
