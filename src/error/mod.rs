//! Error handling for speedtest-sink

use thiserror::Error;

/// Custom error types for speedtest-sink
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No usable JSON report on stdin or in the input file
    #[error("Input error: {0}")]
    Input(String),

    /// Parsed report does not have the expected shape
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Local CSV sink errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Credential loading and token exchange errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Remote spreadsheet API errors
    #[error("Spreadsheet error: {0}")]
    Sheets(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new input error
    pub fn input<S: Into<String>>(message: S) -> Self {
        Self::Input(message.into())
    }

    /// Create a new mapping error
    pub fn mapping<S: Into<String>>(message: S) -> Self {
        Self::Mapping(message.into())
    }

    /// Create a new CSV sink error
    pub fn csv<S: Into<String>>(message: S) -> Self {
        Self::Csv(message.into())
    }

    /// Create a new authentication error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth(message.into())
    }

    /// Create a new spreadsheet error
    pub fn sheets<S: Into<String>>(message: S) -> Self {
        Self::Sheets(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Input(_) => "INPUT",
            Self::Mapping(_) => "MAPPING",
            Self::Csv(_) => "CSV",
            Self::Auth(_) => "AUTH",
            Self::Sheets(_) => "SHEETS",
            Self::Io(_) => "IO",
        }
    }

    /// The bare message without the category prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Config(msg)
            | Self::Input(msg)
            | Self::Mapping(msg)
            | Self::Csv(msg)
            | Self::Auth(msg)
            | Self::Sheets(msg)
            | Self::Io(msg) => msg,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or command line arguments.", msg)
            }
            Self::Input(msg) => {
                format!("No report could be read: {}\n\nSuggestion: Pipe the output of `speedtest --format=json` into this tool or pass a JSON file path.", msg)
            }
            Self::Mapping(msg) => {
                format!("The report has an unexpected shape: {}\n\nSuggestion: Make sure the input is a speedtest result or log entry in JSON format.", msg)
            }
            Self::Csv(msg) => {
                format!("Writing the CSV file failed: {}\n\nSuggestion: Check that the CSV path is a regular file and writable.", msg)
            }
            Self::Auth(msg) => {
                format!("Authentication failed: {}\n\nSuggestion: Check the service account key file passed with --google-creds-file.", msg)
            }
            Self::Sheets(msg) => {
                format!("Spreadsheet request failed: {}\n\nSuggestion: Check the spreadsheet ID and that it is shared with the service account.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check file permissions and disk space.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 1,
            Self::Input(_) => 2,
            Self::Mapping(_) => 3,
            Self::Csv(_) => 4,
            Self::Auth(_) => 5,
            Self::Sheets(_) => 6,
            Self::Io(_) => 7,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Input(_) | Self::Mapping(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Auth(_) | Self::Sheets(_) => {
                    format!("[{}] {}", category.magenta().bold(), message.magenta())
                }
                Self::Csv(_) | Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::config(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::input(format!("JSON parse error: {}", error))
    }
}

impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        Self::csv(error.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::sheets(format!("request timed out: {}", error))
        } else {
            Self::sheets(error.to_string())
        }
    }
}

impl From<yup_oauth2::Error> for AppError {
    fn from(error: yup_oauth2::Error) -> Self {
        Self::auth(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error, keeping its category
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let error: AppError = e.into();
            let message = format!("{}: {}", f(), error.message());
            match error {
                AppError::Config(_) => AppError::Config(message),
                AppError::Input(_) => AppError::Input(message),
                AppError::Mapping(_) => AppError::Mapping(message),
                AppError::Csv(_) => AppError::Csv(message),
                AppError::Auth(_) => AppError::Auth(message),
                AppError::Sheets(_) => AppError::Sheets(message),
                AppError::Io(_) => AppError::Io(message),
            }
        })
    }
}

/// Error reporter for the top-level failure dump
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Render the detail block printed after a failure
    pub fn format_error(&self, error: &AppError) -> String {
        let mut out = error.format_for_console(self.use_color);
        out.push_str(&format!("\n  category: {}", error.category()));
        out.push_str(&format!("\n  exit code: {}", error.exit_code()));
        out.push_str(&format!("\n  detail: {:?}", error));
        if self.verbose {
            out.push_str("\n\n");
            out.push_str(&error.user_friendly_message());
        }
        out
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.format_error(error));
    }
}
