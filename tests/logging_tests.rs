//! Leveled logger tests

use etl_pipeline::logging::{LogLevel, Logger};
use etl_pipeline::{log_debug, log_error, log_info, log_warn};
use rstest::rstest;
use std::fs;
use std::io::{self, Write};
use std::process::Command;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capturing(level: LogLevel) -> (Logger<impl Fn() -> Capture, impl Fn() -> Capture>, Capture, Capture) {
    let out = Capture::default();
    let err = Capture::default();
    let (o, e) = (out.clone(), err.clone());
    let logger = Logger::with_writers(level, move || o.clone(), move || e.clone());
    (logger, out, err)
}

#[rstest]
#[case("debug", LogLevel::Debug)]
#[case("info", LogLevel::Info)]
#[case("warn", LogLevel::Warn)]
#[case("error", LogLevel::Error)]
#[case("WARN", LogLevel::Warn)]
#[case("Error", LogLevel::Error)]
#[case("", LogLevel::Info)]
#[case("trace", LogLevel::Info)]
#[case("warning", LogLevel::Info)]
fn test_level_name_mapping(#[case] name: &str, #[case] expected: LogLevel) {
    assert_eq!(Logger::new(name).level(), expected);
}

#[rstest]
#[case(LogLevel::Debug, 3, 1)]
#[case(LogLevel::Info, 2, 1)]
#[case(LogLevel::Warn, 1, 1)]
#[case(LogLevel::Error, 0, 1)]
fn test_threshold_suppression(
    #[case] level: LogLevel,
    #[case] expected_out: usize,
    #[case] expected_err: usize,
) {
    let (logger, out, err) = capturing(level);

    log_debug!(logger, "d");
    log_info!(logger, "i");
    log_warn!(logger, "w");
    log_error!(logger, "e");

    assert_eq!(out.lines().len(), expected_out);
    assert_eq!(err.lines().len(), expected_err);
}

#[test]
fn test_line_shape_and_routing() {
    let (logger, out, err) = capturing(LogLevel::Warn);

    log_info!(logger, "dropped");
    log_warn!(logger, "Low disk: {}%", 91);
    log_error!(logger, "Connection refused to {}", "db.internal");

    let out = out.lines();
    let err = err.lines();
    assert_eq!(out.len(), 1);
    assert_eq!(err.len(), 1);

    // [YYYY-MM-DD HH:MM:SS] LEVEL: message
    let line = &out[0];
    assert_eq!(&line[..1], "[");
    assert_eq!(&line[20..22], "] ");
    assert_eq!(&line[22..], "WARN: Low disk: 91%");
    assert!(err[0].ends_with("] ERROR: Connection refused to db.internal"));
}

#[test]
fn test_concurrent_lines_do_not_interleave() {
    let (logger, out, _err) = capturing(LogLevel::Info);
    let logger = Arc::new(logger);

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                for i in 0..50 {
                    log_info!(logger, "worker {} message {}", worker, i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = out.lines();
    assert_eq!(lines.len(), 400);
    for line in lines {
        assert!(line.contains("] INFO: worker "), "torn line: {line}");
    }
}

#[test]
fn test_cli_routes_streams_by_level() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("config.yaml"),
        "app:\n  name: cli-test\n  log_level: info\nextract:\n  api:\n    url: http://a\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_etl-pipeline"))
        .arg("extract")
        .current_dir(dir.path())
        .env_clear()
        .env("HOME", dir.path().join("home"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stdout.contains("INFO: Starting data extraction for cli-test"));
    assert!(stdout.contains("Extraction planned for sources: api"));
    assert!(!stdout.contains("DEBUG"));
    assert!(!stderr.contains("ERROR"));
}

#[test]
fn test_cli_warns_about_unset_placeholder() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("config.yaml"),
        "app:\n  log_level: debug\nextract:\n  database:\n    host: db.internal\n    password: ${DB_PASS}\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_etl-pipeline"))
        .arg("extract")
        .current_dir(dir.path())
        .env_clear()
        .env("HOME", dir.path().join("home"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let warning = stdout
        .lines()
        .find(|line| line.contains("WARN: Placeholder variable unset"))
        .expect("placeholder warning on stdout");
    assert!(warning.starts_with('['));
    assert!(warning.contains("extract.database.password"));
    assert!(warning.contains("DB_PASS"));
    assert!(output.stderr.is_empty());
}

#[test]
fn test_cli_strict_placeholders_fail() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("config.yaml"),
        "extract:\n  database:\n    password: ${DB_PASS}\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_etl-pipeline"))
        .args(["--strict-placeholders", "extract"])
        .current_dir(dir.path())
        .env_clear()
        .env("HOME", dir.path().join("home"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ERROR: Placeholder '${DB_PASS}'"));
}

#[test]
fn test_cli_reports_missing_document_on_stderr() {
    let dir = tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_etl-pipeline"))
        .arg("extract")
        .current_dir(dir.path())
        .env_clear()
        .env("HOME", dir.path().join("home"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ERROR: "));
    assert!(output.stdout.is_empty());
}
