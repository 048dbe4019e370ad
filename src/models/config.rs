//! Configuration data model and validation

use crate::error::{AppError, Result};
use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Fallback input file when stdin carries no report
    #[serde(default)]
    pub input_file: Option<PathBuf>,

    /// Google spreadsheet document ID
    #[serde(default = "default_spreadsheet_id")]
    pub spreadsheet_id: String,

    /// Worksheet (tab) the row is appended to
    pub worksheet_name: String,

    /// Append the row to the Google spreadsheet
    #[serde(default)]
    pub save_to_google: bool,

    /// Service account key file
    #[serde(default = "default_google_creds_file")]
    pub google_creds_file: PathBuf,

    /// Append the row to the local CSV file
    #[serde(default = "default_save_to_local_csv")]
    pub save_to_local_csv: bool,

    /// Local CSV file
    #[serde(default = "default_csv_file")]
    pub csv_file: PathBuf,

    /// Column names, in output order
    #[serde(default = "crate::defaults::default_header")]
    pub header: Vec<String>,

    /// Base URL of the Sheets REST API
    #[serde(default = "default_sheets_api_url")]
    pub sheets_api_url: String,

    /// HTTP request timeout for Sheets API calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Format of log entries on stderr
    #[serde(default)]
    pub log_format: LogFormat,

    /// Exit non-zero when the run fails
    #[serde(default)]
    pub fail_on_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: None,
            spreadsheet_id: default_spreadsheet_id(),
            worksheet_name: previous_month_label(chrono::Local::now().date_naive()),
            save_to_google: crate::defaults::DEFAULT_SAVE_TO_GOOGLE,
            google_creds_file: default_google_creds_file(),
            save_to_local_csv: default_save_to_local_csv(),
            csv_file: default_csv_file(),
            header: crate::defaults::default_header(),
            sheets_api_url: default_sheets_api_url(),
            timeout_seconds: default_timeout_secs(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            log_format: LogFormat::default(),
            fail_on_error: false,
        }
    }
}

impl Config {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Whether any sink is enabled
    pub fn has_sink(&self) -> bool {
        self.save_to_local_csv || self.save_to_google
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.header.is_empty() {
            return Err(AppError::config("Header must contain at least one column"));
        }

        let mut seen = HashSet::new();
        for column in &self.header {
            if column.trim().is_empty() {
                return Err(AppError::config("Header column names cannot be empty"));
            }
            if !seen.insert(column.as_str()) {
                return Err(AppError::config(format!("Duplicate header column: '{}'", column)));
            }
        }

        if self.worksheet_name.trim().is_empty() {
            return Err(AppError::config("Worksheet name cannot be empty"));
        }

        if self.save_to_local_csv && self.csv_file.as_os_str().is_empty() {
            return Err(AppError::config("CSV file path cannot be empty"));
        }

        if self.save_to_google {
            if self.spreadsheet_id.trim().is_empty() {
                return Err(AppError::config("Spreadsheet ID cannot be empty"));
            }
            if self.google_creds_file.as_os_str().is_empty() {
                return Err(AppError::config("Google credentials file path cannot be empty"));
            }
        }

        match url::Url::parse(&self.sheets_api_url) {
            Ok(parsed) if parsed.scheme() == "https" || parsed.scheme() == "http" => {}
            Ok(parsed) => {
                return Err(AppError::config(format!(
                    "Sheets API URL must use http or https, got '{}'",
                    parsed.scheme()
                )));
            }
            Err(e) => {
                return Err(AppError::config(format!(
                    "Invalid Sheets API URL '{}': {}",
                    self.sheets_api_url, e
                )));
            }
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > 300 {
            return Err(AppError::config("Timeout cannot exceed 300 seconds"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(header) = std::env::var("SPEEDTEST_HEADER") {
            let columns: Vec<String> = header
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !columns.is_empty() {
                self.header = columns;
            }
        }

        if let Ok(enable_color) = std::env::var("SPEEDTEST_ENABLE_COLOR") {
            self.enable_color = enable_color.parse().map_err(|e| {
                AppError::config(format!("Invalid SPEEDTEST_ENABLE_COLOR value '{}': {}", enable_color, e))
            })?;
        }

        if let Ok(format) = std::env::var("SPEEDTEST_LOG_FORMAT") {
            self.log_format = format.parse()?;
        }

        Ok(())
    }
}

/// Default worksheet name: the calendar month before `today`, as `YYYY-MM`.
pub fn previous_month_label(today: chrono::NaiveDate) -> String {
    use chrono::Datelike;

    let (year, month) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    format!("{:04}-{:02}", year, month)
}

// Default value functions for serde
fn default_spreadsheet_id() -> String {
    crate::defaults::DEFAULT_SPREADSHEET_ID.to_string()
}

fn default_google_creds_file() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_GOOGLE_CREDS_FILE)
}

fn default_save_to_local_csv() -> bool {
    crate::defaults::DEFAULT_SAVE_TO_LOCAL_CSV
}

fn default_csv_file() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_CSV_FILE)
}

fn default_sheets_api_url() -> String {
    crate::defaults::DEFAULT_SHEETS_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
