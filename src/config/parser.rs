//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Build the configuration: defaults, then environment, then CLI
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;

        if config.debug {
            for warning in EnvManager::validate_current_env() {
                eprintln!("{}", warning);
            }
        }

        Ok(config)
    }

    fn apply_cli_overrides(&self, config: &mut Config) {
        let cli = &self.cli;

        config.input_file = cli.input_file.clone();

        if let Some(ref id) = cli.spreadsheet_id {
            config.spreadsheet_id = id.clone();
        }
        if let Some(ref name) = cli.worksheet_name {
            config.worksheet_name = name.clone();
        }

        config.save_to_google = cli.save_to_google;
        config.google_creds_file = cli.google_creds_file.clone();
        config.save_to_local_csv = cli.save_to_local_csv;
        config.csv_file = cli.csv_file.clone();

        // An empty list means -h was not given
        if !cli.header.is_empty() {
            config.header = cli.header.clone();
        }

        config.sheets_api_url = cli.sheets_api_url.clone();
        config.timeout_seconds = cli.timeout;
        config.fail_on_error = cli.fail_on_error;

        if let Some(format) = cli.log_format {
            config.log_format = format;
        }

        if !cli.use_colors() {
            config.enable_color = false;
        }

        config.verbose = cli.verbose;
        config.debug = cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Configuration summary for debug output
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    if let Some(ref input) = config.input_file {
        summary.push(format!("Input file: {}", input.display()));
    }
    summary.push(format!("Save to CSV: {}", config.save_to_local_csv));
    if config.save_to_local_csv {
        summary.push(format!("CSV file: {}", config.csv_file.display()));
    }
    summary.push(format!("Save to Google: {}", config.save_to_google));
    if config.save_to_google {
        summary.push(format!("Spreadsheet ID: {}", config.spreadsheet_id));
        summary.push(format!("Worksheet: {}", config.worksheet_name));
        summary.push(format!("Credentials: {}", config.google_creds_file.display()));
        summary.push(format!("Sheets API: {}", config.sheets_api_url));
        summary.push(format!("Timeout: {}s", config.timeout_seconds));
    }
    summary.push(format!("Header: {}", config.header.join(", ")));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
