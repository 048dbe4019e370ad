//! Environment variable handling and .env file loading

use crate::error::{AppError, Result};
use std::path::Path;

/// Name of the optional environment file in the working directory
pub const ENV_FILE: &str = ".env";

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load `.env` from the working directory if it exists. Must run before
    /// argument parsing so env-backed options see its values.
    pub fn load_env_file() -> Result<bool> {
        Self::load_env_file_from(Path::new(ENV_FILE))
    }

    /// Load an environment file. Variables already set in the process win.
    pub fn load_env_file_from(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        dotenv::from_path(path).map_err(|e| {
            AppError::config(format!("Failed to load {} file: {}", path.display(), e))
        })?;
        Ok(true)
    }

    /// Supported environment variables with descriptions and examples
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("SPEEDTEST_SPREADSHEET_ID", "Google spreadsheet document ID", "18KzsHwRy_57ojkfIaX23-eDHCixd6pj_M5GZVThmZqA"),
            ("SPEEDTEST_WORKSHEET", "Worksheet name", "2026-09"),
            ("SPEEDTEST_GOOGLE_CREDS_FILE", "Service account key file", ".account.json"),
            ("SPEEDTEST_CSV_FILE", "Local CSV file", "results.csv"),
            ("SPEEDTEST_SHEETS_API_URL", "Sheets API base URL", "https://sheets.googleapis.com"),
            ("SPEEDTEST_HEADER", "Comma-separated column names", "When,Type,ISP,DL Bandw,UL Bandw"),
            ("SPEEDTEST_ENABLE_COLOR", "Enable colored output", "true"),
            ("SPEEDTEST_LOG_FORMAT", "Log format (console, json, compact)", "json"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<28} {}\n", var, description));
            help.push_str(&format!("  {:<28} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate an environment variable value before it is used
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "SPEEDTEST_SHEETS_API_URL" => {
                let parsed = url::Url::parse(value).map_err(|e| {
                    AppError::config(format!("Invalid {} value '{}': {}", key, value, e))
                })?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(AppError::config(format!("{} must use http or https: {}", key, value)));
                }
            }
            "SPEEDTEST_ENABLE_COLOR" => {
                value.parse::<bool>().map_err(|e| {
                    AppError::config(format!("Invalid {} value '{}': {}", key, value, e))
                })?;
            }
            "SPEEDTEST_LOG_FORMAT" => {
                value.parse::<crate::logging::LogFormat>()?;
            }
            "SPEEDTEST_HEADER" => {
                if value.split(',').all(|c| c.trim().is_empty()) {
                    return Err(AppError::config(format!("{} must name at least one column", key)));
                }
            }
            _ => {
                if value.trim().is_empty() {
                    return Err(AppError::config(format!("{} cannot be empty", key)));
                }
            }
        }
        Ok(())
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(name, _, _)| {
                let value = std::env::var(name).ok()?;
                Self::validate_env_var(name, &value)
                    .err()
                    .map(|e| format!("Warning: {}", e.message()))
            })
            .collect()
    }
}
