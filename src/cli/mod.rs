//! Command-line interface

use crate::logging::LogFormat;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Append a speedtest JSON report to a local CSV file and/or a Google spreadsheet.
///
/// The report is read from stdin; when stdin carries no JSON, INPUT_FILE is
/// read instead.
#[derive(Parser, Debug, Clone)]
#[command(name = "speedtest-sink")]
#[command(version, about, long_about = None)]
#[command(disable_help_flag = true)]
#[command(after_long_help = crate::config::EnvManager::display_env_help())]
pub struct Cli {
    /// JSON report file, read when stdin is empty or not JSON
    #[arg(value_name = "INPUT_FILE")]
    pub input_file: Option<PathBuf>,

    /// Google spreadsheet document ID
    #[arg(value_name = "SPREADSHEET_ID", env = "SPEEDTEST_SPREADSHEET_ID")]
    pub spreadsheet_id: Option<String>,

    /// Worksheet name [default: previous month, YYYY-MM]
    #[arg(value_name = "WORKSHEET_NAME", env = "SPEEDTEST_WORKSHEET")]
    pub worksheet_name: Option<String>,

    /// Save the row to the Google spreadsheet (`-g`, `-g=false`)
    #[arg(
        short = 'g',
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set,
        default_value_t = false
    )]
    pub save_to_google: bool,

    /// Google service account key file
    #[arg(
        short = 'k',
        long,
        value_name = "FILE",
        env = "SPEEDTEST_GOOGLE_CREDS_FILE",
        default_value = crate::defaults::DEFAULT_GOOGLE_CREDS_FILE
    )]
    pub google_creds_file: PathBuf,

    /// Save the row to the local CSV file (`-c`, `-c=false`)
    #[arg(
        short = 'c',
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set,
        default_value_t = crate::defaults::DEFAULT_SAVE_TO_LOCAL_CSV
    )]
    pub save_to_local_csv: bool,

    /// Local CSV file
    #[arg(
        short = 'f',
        long,
        value_name = "FILE",
        env = "SPEEDTEST_CSV_FILE",
        default_value = crate::defaults::DEFAULT_CSV_FILE
    )]
    pub csv_file: PathBuf,

    /// Column names, in output order [default: all known columns]
    #[arg(short = 'h', long, value_name = "NAME", num_args = 1..)]
    pub header: Vec<String>,

    /// HTTP request timeout in seconds for Sheets API calls
    #[arg(long, value_parser = parse_duration, default_value_t = crate::defaults::DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Sheets API base URL
    #[arg(
        long,
        value_name = "URL",
        env = "SPEEDTEST_SHEETS_API_URL",
        default_value = crate::defaults::DEFAULT_SHEETS_API_URL
    )]
    pub sheets_api_url: String,

    /// Exit with the error's exit code when the run fails
    #[arg(long)]
    pub fail_on_error: bool,

    /// Log entry format on stderr
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl Cli {
    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        !self.no_color && supports_color()
    }
}

/// Parse duration from seconds string
fn parse_duration(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > 300 {
                Err("Duration cannot exceed 300 seconds".to_string())
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
pub fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    cfg!(unix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_positionals() {
        let cli = Cli::parse_from(["speedtest-sink", "report.json", "doc-1", "2026-09"]);
        assert_eq!(cli.input_file, Some(PathBuf::from("report.json")));
        assert_eq!(cli.spreadsheet_id.as_deref(), Some("doc-1"));
        assert_eq!(cli.worksheet_name.as_deref(), Some("2026-09"));
    }

    #[test]
    fn test_short_options() {
        let cli = Cli::parse_from([
            "speedtest-sink",
            "-g",
            "-k", "key.json",
            "-c=false",
            "-f", "out.csv",
            "-h", "When", "Type",
        ]);
        assert!(cli.save_to_google);
        assert_eq!(cli.google_creds_file, PathBuf::from("key.json"));
        assert!(!cli.save_to_local_csv);
        assert_eq!(cli.csv_file, PathBuf::from("out.csv"));
        assert_eq!(cli.header, vec!["When", "Type"]);
    }

    #[test]
    fn test_flag_defaults() {
        let cli = Cli::parse_from(["speedtest-sink"]);
        assert!(!cli.save_to_google);
        assert!(cli.save_to_local_csv);
        assert!(cli.header.is_empty());
        assert_eq!(cli.timeout, 30);
        assert!(!cli.fail_on_error);
        assert!(cli.log_format.is_none());
    }

    #[test]
    fn test_long_options() {
        let cli = Cli::parse_from([
            "speedtest-sink",
            "--save-to-local-csv=true",
            "--timeout", "5",
            "--log-format", "json",
            "--fail-on-error",
            "--no-color",
            "--verbose",
            "--debug",
        ]);
        assert!(cli.save_to_local_csv);
        assert_eq!(cli.timeout, 5);
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert!(cli.fail_on_error);
        assert!(cli.no_color);
        assert!(cli.verbose);
        assert!(cli.debug);
        assert!(!cli.use_colors());
    }

    #[test]
    fn test_long_help_only() {
        let err = Cli::try_parse_from(["speedtest-sink", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

        // -h takes column names, so a bare -h is missing its values
        assert!(Cli::try_parse_from(["speedtest-sink", "-h"]).is_err());
    }

    #[test]
    fn test_invalid_bool_for_csv_flag() {
        assert!(Cli::try_parse_from(["speedtest-sink", "-c=maybe"]).is_err());
        assert!(Cli::try_parse_from(["speedtest-sink", "--save-to-google=maybe"]).is_err());
    }

    #[test]
    fn test_bool_option_forms() {
        let cli = Cli::parse_from(["speedtest-sink", "-g", "-c"]);
        assert!(cli.save_to_google);
        assert!(cli.save_to_local_csv);

        let cli = Cli::parse_from(["speedtest-sink", "-g=false", "-c=false"]);
        assert!(!cli.save_to_google);
        assert!(!cli.save_to_local_csv);

        let cli = Cli::parse_from(["speedtest-sink", "--save-to-google=true", "--save-to-local-csv=false"]);
        assert!(cli.save_to_google);
        assert!(!cli.save_to_local_csv);
    }

    #[test]
    fn test_bare_bool_option_leaves_positionals_alone() {
        let cli = Cli::parse_from(["speedtest-sink", "-g", "report.json", "doc-1"]);
        assert!(cli.save_to_google);
        assert_eq!(cli.input_file, Some(PathBuf::from("report.json")));
        assert_eq!(cli.spreadsheet_id.as_deref(), Some("doc-1"));

        let cli = Cli::parse_from(["speedtest-sink", "-c", "report.json"]);
        assert!(cli.save_to_local_csv);
        assert_eq!(cli.input_file, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn test_long_help_lists_env_vars() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("SPEEDTEST_CSV_FILE"));
        assert!(help.contains("Configuration Priority"));
    }

    #[test]
    fn test_duration_parsing() {
        assert_eq!(parse_duration("10"), Ok(10));
        assert_eq!(parse_duration("300"), Ok(300));
        assert!(parse_duration("0").is_err());
        assert!(parse_duration("301").is_err());
        assert!(parse_duration("+5").is_err());
        assert!(parse_duration("0x10").is_err());
        assert!(parse_duration("abc").is_err());
    }
}
