//! Data models for speedtest-sink

pub mod config;
pub mod report;
pub mod row;

// Re-export main model types
pub use config::Config;
pub use report::{LogReport, SpeedTestReport, TestReport};
pub use row::{Cell, Row, BYTES_PER_MBPS};
