//! CLI tests against the built binary
//!
//! Every test runs in its own temporary working directory so relative
//! default paths (results.csv, .account.json, .env) stay isolated.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const LOG_JSON: &str = r#"{"type":"log","timestamp":"t1","isp":"ACME","message":"ok","level":"info"}"#;

const SPEEDTEST_JSON: &str = r#"{
    "type": "result",
    "timestamp": "2026-09-14T08:00:00Z",
    "isp": "ACME Fiber",
    "ping": {"jitter": 0.5, "latency": 4.25},
    "download": {"bandwidth": 12500000, "bytes": 250000000, "elapsed": 8000},
    "upload": {"bandwidth": 2500000, "bytes": 25000000, "elapsed": 7500},
    "interface": {"externalIp": "203.0.113.7", "macAddr": "AA:BB:CC:DD:EE:FF"},
    "server": {
        "id": 1234,
        "name": "Example ISP",
        "location": "Oslo",
        "country": "Norway",
        "host": "speedtest.example.net",
        "ip": "198.51.100.1",
        "port": 8080
    },
    "result": {"id": "abc-123", "url": "https://www.speedtest.net/result/c/abc-123"}
}"#;

const LOG_HEADER: [&str; 5] = ["When", "Type", "ISP", "Message", "Level"];

/// Command running in `dir` with no SPEEDTEST_* variables inherited
fn sink_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("speedtest-sink").unwrap();
    cmd.current_dir(dir.path())
        .arg("--no-color")
        .env_remove("SPEEDTEST_SPREADSHEET_ID")
        .env_remove("SPEEDTEST_WORKSHEET")
        .env_remove("SPEEDTEST_GOOGLE_CREDS_FILE")
        .env_remove("SPEEDTEST_CSV_FILE")
        .env_remove("SPEEDTEST_SHEETS_API_URL")
        .env_remove("SPEEDTEST_HEADER")
        .env_remove("SPEEDTEST_ENABLE_COLOR")
        .env_remove("SPEEDTEST_LOG_FORMAT");
    cmd
}

#[test]
fn test_log_report_from_stdin() {
    let dir = TempDir::new().unwrap();

    sink_cmd(&dir)
        .arg("-h")
        .args(LOG_HEADER)
        .write_stdin(LOG_JSON)
        .assert()
        .success()
        .stderr(predicate::str::contains("Parsed result into row OK."))
        .stderr(predicate::str::contains("Saved to CSV (file: results.csv) OK."));

    assert_eq!(
        fs::read_to_string(dir.path().join("results.csv")).unwrap(),
        "When,Type,ISP,Message,Level\nt1,log,ACME,ok,info\n"
    );
}

#[test]
fn test_rerun_does_not_repeat_header() {
    let dir = TempDir::new().unwrap();

    for _ in 0..2 {
        sink_cmd(&dir)
            .arg("-h")
            .args(LOG_HEADER)
            .write_stdin(LOG_JSON)
            .assert()
            .success();
    }

    let content = fs::read_to_string(dir.path().join("results.csv")).unwrap();
    assert_eq!(content.matches("When,Type").count(), 1);
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_empty_stdin_falls_back_to_input_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("report.json"), SPEEDTEST_JSON).unwrap();

    sink_cmd(&dir)
        .arg("report.json")
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "No JSON in stdin; trying filename 'report.json'...",
        ))
        .stderr(predicate::str::contains("Read JSON from filename 'report.json' OK."));

    let content = fs::read_to_string(dir.path().join("results.csv")).unwrap();
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let headers = reader.headers().unwrap().clone();
    let record = reader.records().next().unwrap().unwrap();
    let get = |name: &str| {
        let index = headers.iter().position(|h| h == name).unwrap();
        record.get(index).unwrap().to_string()
    };

    assert_eq!(get("DL Bandw"), "100");
    assert_eq!(get("DL Bytes"), "2000");
    assert_eq!(get("UL Bandw"), "20");
    assert_eq!(get("Dest Loc"), "Oslo, Norway");
    assert_eq!(get("Type"), "result");
    assert_eq!(get("Message"), "");
}

#[test]
fn test_csv_file_option() {
    let dir = TempDir::new().unwrap();

    sink_cmd(&dir)
        .args(["-f", "monthly.csv", "-h", "When", "Message"])
        .write_stdin(LOG_JSON)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("monthly.csv")).unwrap(),
        "When,Message\nt1,ok\n"
    );
    assert!(!dir.path().join("results.csv").exists());
}

#[test]
fn test_csv_disabled() {
    let dir = TempDir::new().unwrap();

    sink_cmd(&dir)
        .arg("-c=false")
        .write_stdin(LOG_JSON)
        .assert()
        .success();

    assert!(!dir.path().join("results.csv").exists());
}

#[test]
fn test_failure_exits_zero_by_default() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("results.csv")).unwrap();

    sink_cmd(&dir)
        .write_stdin(LOG_JSON)
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed:"));
}

#[test]
fn test_fail_on_error_uses_category_exit_code() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("results.csv")).unwrap();

    sink_cmd(&dir)
        .arg("--fail-on-error")
        .write_stdin(LOG_JSON)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Failed:"));
}

#[test]
fn test_no_input_anywhere() {
    let dir = TempDir::new().unwrap();

    sink_cmd(&dir)
        .arg("--fail-on-error")
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No JSON in stdin and no input file given"));
}

#[test]
fn test_missing_credentials_after_csv_saved() {
    let dir = TempDir::new().unwrap();

    sink_cmd(&dir)
        .args(["-g", "--fail-on-error", "-h"])
        .args(LOG_HEADER)
        .write_stdin(LOG_JSON)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Saved to CSV (file: results.csv) OK."))
        .stderr(predicate::str::contains(".account.json"));

    assert!(dir.path().join("results.csv").exists());
}

#[test]
fn test_duplicate_header_is_rejected() {
    let dir = TempDir::new().unwrap();

    sink_cmd(&dir)
        .args(["-h", "When", "When"])
        .write_stdin(LOG_JSON)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Duplicate header column"));

    assert!(!dir.path().join("results.csv").exists());
}

#[test]
fn test_env_file_sets_csv_path() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "SPEEDTEST_CSV_FILE=from-env.csv\n").unwrap();

    sink_cmd(&dir)
        .args(["-h", "When"])
        .write_stdin(LOG_JSON)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("from-env.csv")).unwrap(),
        "When\nt1\n"
    );
}

#[test]
fn test_long_help() {
    let dir = TempDir::new().unwrap();

    sink_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--save-to-google"))
        .stdout(predicate::str::contains("--header"))
        .stdout(predicate::str::contains("SPEEDTEST_CSV_FILE"));
}

#[test]
fn test_bare_google_flag_before_input_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("report.json"), LOG_JSON).unwrap();

    sink_cmd(&dir)
        .args(["-c=false", "-g", "--fail-on-error", "report.json"])
        .write_stdin("")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Read JSON from filename 'report.json' OK."))
        .stderr(predicate::str::contains(".account.json"));

    assert!(!dir.path().join("results.csv").exists());
}
