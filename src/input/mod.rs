//! Report loading from stdin with an input-file fallback

use crate::error::{AppError, Result};
use crate::logging::Logger;
use crate::output::Progress;
use serde_json::Value;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

/// Loads the JSON report document
pub struct ReportLoader<'a> {
    input_file: Option<PathBuf>,
    progress: &'a Progress,
    logger: Logger,
}

impl<'a> ReportLoader<'a> {
    pub fn new(input_file: Option<PathBuf>, progress: &'a Progress, logger: Logger) -> Self {
        Self {
            input_file,
            progress,
            logger,
        }
    }

    /// Read the report from the process stdin, unless it is a terminal
    pub fn load(&self) -> Result<Value> {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            self.logger.debug("stdin is a terminal, not reading it").log();
            self.load_from(None::<io::Stdin>)
        } else {
            self.load_from(Some(stdin))
        }
    }

    /// Parse `stdin` as JSON, falling back to the input file when it is
    /// absent, empty, unreadable or not JSON.
    pub fn load_from<R: Read>(&self, stdin: Option<R>) -> Result<Value> {
        match stdin.map(parse_reader) {
            Some(Ok(value)) => {
                self.logger.debug("Read JSON report from stdin").log();
                Ok(value)
            }
            Some(Err(e)) => {
                self.logger
                    .debug("No usable JSON on stdin")
                    .field("reason", e.to_string())
                    .log();
                self.load_fallback()
            }
            None => self.load_fallback(),
        }
    }

    fn load_fallback(&self) -> Result<Value> {
        let Some(path) = self.input_file.as_deref() else {
            return Err(AppError::input("No JSON in stdin and no input file given"));
        };

        self.progress.info(format!(
            "No JSON in stdin; trying filename '{}'...",
            path.display()
        ));
        let value = read_json_file(path)?;
        self.progress
            .succeed(format!("Read JSON from filename '{}' OK.", path.display()));
        Ok(value)
    }
}

fn parse_reader<R: Read>(mut reader: R) -> Result<Value> {
    let mut buffer = String::new();
    reader
        .read_to_string(&mut buffer)
        .map_err(|e| AppError::input(format!("Failed to read stdin: {}", e)))?;
    if buffer.trim().is_empty() {
        return Err(AppError::input("stdin is empty"));
    }
    Ok(serde_json::from_str(&buffer)?)
}

fn read_json_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::input(format!("Failed to read input file '{}': {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        AppError::input(format!("Invalid JSON in input file '{}': {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::SharedBuffer;
    use serde_json::json;
    use std::io::Cursor;
    use tempfile::TempDir;

    const LOG_JSON: &str = r#"{"type":"log","timestamp":"t1","isp":"ACME","message":"ok","level":"info"}"#;

    fn capturing(buffer: &SharedBuffer) -> Progress {
        Progress::with_writer(Box::new(buffer.clone()), false, false)
    }

    #[test]
    fn test_stdin_json_is_preferred() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("report.json");
        std::fs::write(&file, r#"{"type":"log","message":"from file"}"#).unwrap();

        let buffer = SharedBuffer::default();
        let progress = capturing(&buffer);
        let loader = ReportLoader::new(Some(file), &progress, Logger::new("input"));

        let value = loader.load_from(Some(Cursor::new(LOG_JSON))).unwrap();
        assert_eq!(value["message"], "ok");
        assert_eq!(buffer.contents(), "");
    }

    #[test]
    fn test_empty_stdin_falls_back_to_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("report.json");
        std::fs::write(&file, LOG_JSON).unwrap();

        let buffer = SharedBuffer::default();
        let progress = capturing(&buffer);
        let loader = ReportLoader::new(Some(file.clone()), &progress, Logger::new("input"));

        let value = loader.load_from(Some(Cursor::new(""))).unwrap();
        assert_eq!(value, serde_json::from_str::<Value>(LOG_JSON).unwrap());

        let output = buffer.contents();
        assert!(output.contains(&format!("No JSON in stdin; trying filename '{}'...", file.display())));
        assert!(output.contains(&format!("Read JSON from filename '{}' OK.", file.display())));
    }

    #[test]
    fn test_invalid_stdin_falls_back_to_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("report.json");
        std::fs::write(&file, r#"{"type":"log","message":"from file"}"#).unwrap();

        let progress = Progress::silent();
        let loader = ReportLoader::new(Some(file), &progress, Logger::new("input"));

        let value = loader.load_from(Some(Cursor::new("not json at all"))).unwrap();
        assert_eq!(value, json!({"type": "log", "message": "from file"}));
    }

    #[test]
    fn test_terminal_stdin_goes_straight_to_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("report.json");
        std::fs::write(&file, LOG_JSON).unwrap();

        let progress = Progress::silent();
        let loader = ReportLoader::new(Some(file), &progress, Logger::new("input"));
        assert!(loader.load_from(None::<Cursor<&str>>).is_ok());
    }

    #[test]
    fn test_both_sources_failing_is_input_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("report.json");
        std::fs::write(&file, "{ broken").unwrap();

        let progress = Progress::silent();
        let loader = ReportLoader::new(Some(file), &progress, Logger::new("input"));
        let error = loader.load_from(Some(Cursor::new(""))).unwrap_err();
        assert!(matches!(error, AppError::Input(_)));
        assert!(error.to_string().contains("Invalid JSON in input file"));
    }

    #[test]
    fn test_missing_file_is_input_error() {
        let dir = TempDir::new().unwrap();
        let progress = Progress::silent();
        let loader = ReportLoader::new(Some(dir.path().join("nope.json")), &progress, Logger::new("input"));
        let error = loader.load_from(None::<Cursor<&str>>).unwrap_err();
        assert!(matches!(error, AppError::Input(_)));
    }

    #[test]
    fn test_no_stdin_and_no_file() {
        let progress = Progress::silent();
        let loader = ReportLoader::new(None, &progress, Logger::new("input"));
        let error = loader.load_from(Some(Cursor::new(""))).unwrap_err();
        assert!(error.to_string().contains("no input file given"));
    }
}
