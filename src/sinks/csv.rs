//! Local CSV file sink
//!
//! The file is created with a header line when absent; existing regular
//! files only get the row appended. A path that exists but is not a regular
//! file is truncated and given a header, which the OS rejects for
//! directories.

use crate::error::{AppError, ErrorContext, Result};
use crate::logging::Logger;
use crate::models::Row;
use crate::output::Progress;
use crate::sinks::RowSink;
use async_trait::async_trait;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;

/// Whether an append also wrote the header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvAppend {
    /// File was created (or recreated) with a header line
    Created,
    /// Row appended to an existing file
    Appended,
}

/// Appends rows to a CSV file
pub struct CsvSink {
    path: PathBuf,
    header: Vec<String>,
    logger: Logger,
}

impl CsvSink {
    pub fn new(path: PathBuf, header: Vec<String>, logger: Logger) -> Self {
        Self { path, header, logger }
    }

    /// Append one row, writing the header first if the file is new
    pub fn append_row(&self, row: &Row) -> Result<CsvAppend> {
        let (file, outcome) = self
            .open()
            .map_err(|e| AppError::csv(e.to_string()))
            .with_context(|| format!("Opening '{}'", self.path.display()))?;

        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(::csv::Terminator::Any(b'\n'))
            .from_writer(file);

        if outcome == CsvAppend::Created {
            writer.write_record(&self.header)?;
        }
        writer.write_record(row.to_record(&self.header))?;
        writer
            .flush()
            .map_err(|e| AppError::csv(e.to_string()))
            .with_context(|| format!("Writing '{}'", self.path.display()))?;

        self.logger
            .debug("Appended CSV row")
            .field("path", self.path.display().to_string())
            .field("header_written", outcome == CsvAppend::Created)
            .log();

        Ok(outcome)
    }

    fn open(&self) -> io::Result<(File, CsvAppend)> {
        match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(file) => Ok((file, CsvAppend::Created)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                match fs::metadata(&self.path) {
                    Ok(meta) if meta.is_file() => {
                        let file = OpenOptions::new().append(true).open(&self.path)?;
                        Ok((file, CsvAppend::Appended))
                    }
                    _ => {
                        self.logger
                            .warn("CSV path exists but is not a regular file")
                            .field("path", self.path.display().to_string())
                            .log();
                        Ok((File::create(&self.path)?, CsvAppend::Created))
                    }
                }
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl RowSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn append(&self, row: &Row, progress: &Progress) -> Result<()> {
        let display = self.path.display();
        progress.start(format!("Saving to CSV (file: {})...", display));
        self.append_row(row)?;
        progress.succeed(format!("Saved to CSV (file: {}) OK.", display));
        Ok(())
    }
}
