//! Crash test harness for subprocess management

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use peanuts::{Config, Instance};

/// Result of one subprocess run
#[derive(Debug)]
pub struct CrashTestResult {
    /// Whether the process ended unsuccessfully
    pub crashed: bool,
    pub exit_status: Option<ExitStatus>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `peanuts shop <args>` against `data_dir`, optionally with a crash point.
pub fn run_peanuts(data_dir: &Path, crash_point: Option<&str>, args: &[&str]) -> CrashTestResult {
    let mut command = Command::new(env!("CARGO_BIN_EXE_peanuts"));
    command
        .arg("shop")
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env_remove("PEANUTS_CRASH_POINT");

    if let Some(point) = crash_point {
        command.env("PEANUTS_CRASH_POINT", point);
    }

    match command.output() {
        Ok(output) => CrashTestResult {
            crashed: !output.status.success(),
            exit_status: Some(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        },
        Err(e) => CrashTestResult {
            crashed: true,
            exit_status: None,
            stdout: String::new(),
            stderr: format!("Failed to execute: {}", e),
        },
    }
}

/// Runs a command that must succeed.
pub fn run_ok(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let result = run_peanuts(data_dir, None, args);
    assert!(
        !result.crashed,
        "command {:?} failed: {}{}",
        args,
        result.stdout,
        result.stderr
    );
    serde_json::from_str(result.stdout.trim()).unwrap()
}

/// Runs a command that must abort at `crash_point`.
pub fn run_crashing(data_dir: &Path, crash_point: &str, args: &[&str]) {
    let result = run_peanuts(data_dir, Some(crash_point), args);
    assert!(result.crashed, "expected crash at {}", crash_point);
    assert!(
        result.stderr.contains(crash_point),
        "crash point {} not reached: {}",
        crash_point,
        result.stderr
    );
    assert!(result.stdout.is_empty(), "no response may be printed");
}

/// Reopens the database in-process, as the next session would.
pub fn reopen(data_dir: &Path) -> Instance {
    let config = Config {
        data_dir: data_dir.to_path_buf(),
        ..Config::default()
    };
    Instance::open_with_config(&config, "shop").unwrap()
}

/// Leftover temp files in a schema directory
pub fn temp_files(data_dir: &Path, schema: &str) -> Vec<PathBuf> {
    let dir = data_dir.join("shop").join(schema);
    let mut found: Vec<PathBuf> = fs::read_dir(&dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().map(|ext| ext == "tmp").unwrap_or(false))
                .collect()
        })
        .unwrap_or_default();
    found.sort();
    found
}
