//! Speedtest report data model
//!
//! A report is either a log event (`"type": "log"`) or a full speedtest
//! result. The two shapes are discriminated only by the `type` field; any
//! value other than `"log"`, including a missing one, selects the speedtest
//! shape.

use crate::error::{AppError, Result};
use crate::models::row::Cell;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminator value of log events
pub const LOG_TYPE: &str = "log";

/// One parsed report
#[derive(Debug, Clone, PartialEq)]
pub enum TestReport {
    /// Log event emitted by the speedtest CLI
    Log(LogReport),
    /// Full speedtest measurement
    SpeedTest(Box<SpeedTestReport>),
}

/// Log event fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogReport {
    #[serde(default)]
    pub timestamp: Option<Cell>,
    #[serde(default)]
    pub isp: Option<Cell>,
    #[serde(default)]
    pub message: Option<Cell>,
    #[serde(default)]
    pub level: Option<Cell>,
}

/// Speedtest result fields, as produced by `speedtest --format=json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedTestReport {
    #[serde(rename = "type", default)]
    pub kind: Option<Cell>,
    #[serde(default)]
    pub timestamp: Option<Cell>,
    #[serde(default)]
    pub isp: Option<Cell>,
    pub download: Transfer,
    pub upload: Transfer,
    pub ping: Ping,
    pub interface: Interface,
    pub server: Server,
    pub result: ResultLink,
}

/// Download or upload phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    /// Bytes per second
    pub bandwidth: f64,
    /// Bytes transferred
    pub bytes: f64,
    /// Milliseconds
    #[serde(default)]
    pub elapsed: Option<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ping {
    #[serde(default)]
    pub jitter: Option<Cell>,
    #[serde(default)]
    pub latency: Option<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    #[serde(default)]
    pub external_ip: Option<Cell>,
    #[serde(default)]
    pub mac_addr: Option<Cell>,
}

/// Test server the measurement ran against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    #[serde(default)]
    pub id: Option<Cell>,
    #[serde(default)]
    pub name: Option<Cell>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub host: Option<Cell>,
    #[serde(default)]
    pub ip: Option<Cell>,
    #[serde(default)]
    pub port: Option<Cell>,
}

/// Link to the published result page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultLink {
    #[serde(default)]
    pub id: Option<Cell>,
    #[serde(default)]
    pub url: Option<Cell>,
}

impl TestReport {
    /// Build a report from an already parsed JSON document.
    ///
    /// Fails with a mapping error when the document is valid JSON but lacks
    /// the structure its `type` calls for.
    pub fn from_json(value: Value) -> Result<Self> {
        let is_log = value.get("type").and_then(Value::as_str) == Some(LOG_TYPE);

        if is_log {
            serde_json::from_value(value)
                .map(TestReport::Log)
                .map_err(|e| AppError::mapping(format!("Invalid log report: {}", e)))
        } else {
            serde_json::from_value(value)
                .map(|report| TestReport::SpeedTest(Box::new(report)))
                .map_err(|e| AppError::mapping(format!("Invalid speedtest report: {}", e)))
        }
    }

    /// Whether this is a log event
    pub fn is_log(&self) -> bool {
        matches!(self, TestReport::Log(_))
    }
}

impl TryFrom<Value> for TestReport {
    type Error = AppError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_json(value)
    }
}
