//! Timestamped console lines (`YYYY-MM-DD HH:MM:SS - message`).
//!
//! Formatting is a pure function of the clock reading and the message; the
//! emitters only add `Local::now()` and pick the stream. Info goes to stdout,
//! warnings and failures to stderr. With the `cli` feature, warning and
//! critical lines are painted through `colored`, which honors its global
//! override (`--no-color`, non-terminal stderr).

#![allow(missing_docs)]

use std::io::{self, Write};

use chrono::{DateTime, Local};

/// Timestamp layout used on every console line.
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Render one console line for `now`.
#[must_use]
pub fn stamp(now: DateTime<Local>, message: &str) -> String {
    format!("{} - {message}", now.format(STAMP_FORMAT))
}

/// Apply the severity's color to an already stamped line.
#[cfg(feature = "cli")]
#[must_use]
pub fn paint(severity: Severity, line: &str) -> String {
    use colored::Colorize;

    match severity {
        Severity::Info => line.to_string(),
        Severity::Warning => line.yellow().to_string(),
        Severity::Critical => line.red().bold().to_string(),
    }
}

#[cfg(not(feature = "cli"))]
#[must_use]
pub fn paint(_severity: Severity, line: &str) -> String {
    line.to_string()
}

/// Write a stamped line at `severity` using the current local time.
pub fn emit(severity: Severity, message: &str) {
    let line = paint(severity, &stamp(Local::now(), message));
    // A closed stdout/stderr must never take the monitor down.
    let _ = match severity {
        Severity::Info => writeln!(io::stdout().lock(), "{line}"),
        Severity::Warning | Severity::Critical => writeln!(io::stderr().lock(), "{line}"),
    };
}

/// Progress line on stdout.
pub fn info(message: &str) {
    emit(Severity::Info, message);
}

/// Recoverable problem on stderr.
pub fn warn(message: &str) {
    emit(Severity::Warning, message);
}

/// Failure on stderr.
pub fn critical(message: &str) {
    emit(Severity::Critical, message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stamp_prefixes_local_timestamp() {
        let now = Local.with_ymd_and_hms(2031, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            stamp(now, "Started monitoring '/data'"),
            "2031-01-02 03:04:05 - Started monitoring '/data'"
        );
    }

    #[test]
    fn stamp_keeps_message_verbatim() {
        let now = Local.with_ymd_and_hms(2031, 12, 31, 23, 59, 59).unwrap();
        let line = stamp(now, "Current size: 0.00 MB - 100%");
        assert!(line.ends_with("Current size: 0.00 MB - 100%"));
        assert!(line.starts_with("2031-12-31 23:59:59 - "));
    }

    #[test]
    fn info_lines_are_never_painted() {
        assert_eq!(paint(Severity::Info, "plain"), "plain");
    }

    #[cfg(feature = "cli")]
    #[test]
    fn severity_colors_follow_override() {
        colored::control::set_override(true);
        let warning = paint(Severity::Warning, "disk almost full");
        let critical = paint(Severity::Critical, "stop failed");
        colored::control::set_override(false);
        let muted = paint(Severity::Critical, "stop failed");
        colored::control::unset_override();

        assert!(warning.contains("\u{1b}[") && warning.contains("disk almost full"));
        assert!(critical.contains("\u{1b}[") && critical.contains("stop failed"));
        assert_ne!(warning, critical);
        assert_eq!(muted, "stop failed");
    }
}
