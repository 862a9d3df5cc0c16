#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

pub fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_capwatch") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) {
        "capwatch.exe"
    } else {
        "capwatch"
    };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve capwatch binary path for integration test"),
    }
}

/// Base command with the capture control stubbed out by `env`.
pub fn capwatch_command(args: &[&str], envs: &[(&str, &str)]) -> Command {
    let mut cmd = Command::new(resolve_bin_path());
    cmd.args(args)
        .env("RUST_BACKTRACE", "1")
        .env("CAPWATCH_ELEVATION_COMMAND", "env")
        .env_remove("CAPWATCH_FOLDER")
        .env_remove("CAPWATCH_POLL_INTERVAL_SECS")
        .env_remove("CAPWATCH_ON_UNREADABLE")
        .env_remove("CAPWATCH_STOP_COMMAND");
    for (name, value) in envs {
        cmd.env(name, value);
    }
    cmd
}

pub fn spawn_cli(args: &[&str], envs: &[(&str, &str)]) -> Child {
    capwatch_command(args, envs)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn capwatch")
}

pub fn run_cli_case(case_name: &str, args: &[&str], envs: &[(&str, &str)]) -> CmdResult {
    let output = capwatch_command(args, envs)
        .output()
        .expect("execute capwatch command");
    record_case(case_name, args, output)
}

pub fn record_case(case_name: &str, args: &[&str], output: std::process::Output) -> CmdResult {
    let root = std::env::temp_dir().join("capwatch-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");
    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", resolve_bin_path().display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}
