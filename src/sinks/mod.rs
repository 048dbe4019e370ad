//! Row sinks: append-only destinations for a mapped row

pub mod csv;
pub mod sheets;

pub use self::csv::CsvSink;
pub use self::sheets::SpreadsheetSink;

use crate::error::Result;
use crate::logging::Logger;
use crate::models::{Config, Row};
use crate::output::Progress;
use async_trait::async_trait;

/// An append-only destination for rows
#[async_trait]
pub trait RowSink: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Append one row, reporting each step on `progress`
    async fn append(&self, row: &Row, progress: &Progress) -> Result<()>;
}

/// Sinks enabled by the configuration, in execution order: CSV first, then
/// the spreadsheet.
pub fn sinks_for_config(config: &Config, logger: &Logger) -> Result<Vec<Box<dyn RowSink>>> {
    let mut sinks: Vec<Box<dyn RowSink>> = Vec::new();

    if config.save_to_local_csv {
        sinks.push(Box::new(CsvSink::new(
            config.csv_file.clone(),
            config.header.clone(),
            logger.child("csv"),
        )));
    }

    if config.save_to_google {
        sinks.push(Box::new(SpreadsheetSink::from_config(config, logger.child("sheets"))?));
    }

    Ok(sinks)
}
