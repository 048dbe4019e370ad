//! Flat row representation of a report and the report-to-row mapping

use crate::models::report::{LogReport, SpeedTestReport, TestReport, Transfer, LOG_TYPE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes per second in one megabit per second.
///
/// Bandwidth and byte counts are divided by this value; their columns keep
/// the `Bandw`/`Bytes` labels.
pub const BYTES_PER_MBPS: f64 = 125_000.0;

/// A single scalar cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Integer(i) => write!(f, "{}", i),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

/// One output row: column names in mapping order, each with an optional
/// value. A column listed with no value was produced by the mapping but was
/// absent from the report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(&'static str, Option<Cell>)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, column: &'static str, value: Option<Cell>) -> Self {
        self.cells.push((column, value));
        self
    }

    /// Look up the value of a column
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Whether the mapping produced this column
    pub fn contains(&self, column: &str) -> bool {
        self.cells.iter().any(|(name, _)| *name == column)
    }

    /// Column names in mapping order
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Values ordered and limited to `header`; unknown or empty columns
    /// yield `None`.
    pub fn ordered<'a, S: AsRef<str>>(&'a self, header: &'a [S]) -> Vec<Option<&'a Cell>> {
        header.iter().map(|column| self.get(column.as_ref())).collect()
    }

    /// Text fields ordered by `header`, empty string for missing values
    pub fn to_record<S: AsRef<str>>(&self, header: &[S]) -> Vec<String> {
        self.ordered(header)
            .into_iter()
            .map(|cell| cell.map(Cell::to_string).unwrap_or_default())
            .collect()
    }

    /// JSON values ordered by `header`, `null` for missing values
    pub fn to_json_values<S: AsRef<str>>(&self, header: &[S]) -> Vec<serde_json::Value> {
        self.ordered(header)
            .into_iter()
            .map(|cell| match cell {
                Some(cell) => serde_json::to_value(cell).unwrap_or(serde_json::Value::Null),
                None => serde_json::Value::Null,
            })
            .collect()
    }

    /// Row as a JSON object, for debug logging
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .cells
            .iter()
            .map(|(name, value)| {
                let json = value
                    .as_ref()
                    .and_then(|cell| serde_json::to_value(cell).ok())
                    .unwrap_or(serde_json::Value::Null);
                (name.to_string(), json)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

impl From<&TestReport> for Row {
    fn from(report: &TestReport) -> Self {
        match report {
            TestReport::Log(log) => log_row(log),
            TestReport::SpeedTest(st) => speedtest_row(st),
        }
    }
}

fn log_row(log: &LogReport) -> Row {
    Row::new()
        .with("When", log.timestamp.clone())
        .with("Type", Some(Cell::from(LOG_TYPE)))
        .with("ISP", log.isp.clone())
        .with("Message", log.message.clone())
        .with("Level", log.level.clone())
}

fn with_transfer(row: Row, columns: [&'static str; 3], transfer: &Transfer) -> Row {
    let [bandw, bytes, elapsed] = columns;
    row.with(bandw, Some(Cell::Float(transfer.bandwidth / BYTES_PER_MBPS)))
        .with(bytes, Some(Cell::Float(transfer.bytes / BYTES_PER_MBPS)))
        .with(elapsed, transfer.elapsed.clone())
}

fn speedtest_row(st: &SpeedTestReport) -> Row {
    let row = Row::new()
        .with("When", st.timestamp.clone())
        .with("Type", st.kind.clone())
        .with("ISP", st.isp.clone());
    let row = with_transfer(row, ["DL Bandw", "DL Bytes", "DL Elapsed"], &st.download);
    let row = with_transfer(row, ["UL Bandw", "UL Bytes", "UL Elapsed"], &st.upload);

    row.with("Ping Jitter", st.ping.jitter.clone())
        .with("Ping Latency", st.ping.latency.clone())
        .with("Source IP", st.interface.external_ip.clone())
        .with("Source MAC", st.interface.mac_addr.clone())
        .with("Dest ID", st.server.id.clone())
        .with("Dest Name", st.server.name.clone())
        .with(
            "Dest Loc",
            Some(Cell::Text(format!(
                "{}, {}",
                st.server.location.as_deref().unwrap_or_default(),
                st.server.country.as_deref().unwrap_or_default()
            ))),
        )
        .with("Dest Host", st.server.host.clone())
        .with("Dest IP", st.server.ip.clone())
        .with("Dest Port", st.server.port.clone())
        .with("Result ID", st.result.id.clone())
        .with("Result URL", st.result.url.clone())
}
