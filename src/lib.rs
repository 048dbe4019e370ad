//! speedtest-sink
//!
//! Reads one speedtest JSON report (or log event), flattens it into a row
//! and appends that row to a local CSV file and/or a Google spreadsheet
//! worksheet.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod models;
pub mod output;
pub mod sinks;

// Re-export commonly used types
pub use app::App;
pub use error::{AppError, Result};
pub use models::{Cell, Config, Row, TestReport, BYTES_PER_MBPS};
pub use output::Progress;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_SPREADSHEET_ID: &str = "18KzsHwRy_57ojkfIaX23-eDHCixd6pj_M5GZVThmZqA";
    pub const DEFAULT_GOOGLE_CREDS_FILE: &str = ".account.json";
    pub const DEFAULT_CSV_FILE: &str = "results.csv";
    pub const DEFAULT_SAVE_TO_GOOGLE: bool = false;
    pub const DEFAULT_SAVE_TO_LOCAL_CSV: bool = true;
    pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Column order shared by the CSV file and the worksheet. Covers both the
    /// speedtest and the log row shapes.
    pub const DEFAULT_HEADER: &[&str] = &[
        "When",
        "Type",
        "ISP",
        "DL Bandw",
        "DL Bytes",
        "DL Elapsed",
        "UL Bandw",
        "UL Bytes",
        "UL Elapsed",
        "Ping Jitter",
        "Ping Latency",
        "Source IP",
        "Source MAC",
        "Dest ID",
        "Dest Name",
        "Dest Loc",
        "Dest Host",
        "Dest IP",
        "Dest Port",
        "Result ID",
        "Result URL",
        "Message",
        "Level",
    ];

    pub fn default_header() -> Vec<String> {
        DEFAULT_HEADER.iter().map(|s| s.to_string()).collect()
    }
}
