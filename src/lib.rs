// Public module exports for the binary crate
pub mod error;
pub mod logging;
pub mod config;
pub mod table_cleaner;
pub mod export;
pub mod cli;

pub use error::{CleanError, CleanResult};
pub use config::CleanerConfig;
pub use export::{OutputFormat, TableExporter};
pub use table_cleaner::{clean, CleaningReport, Table, TableCleaner};
