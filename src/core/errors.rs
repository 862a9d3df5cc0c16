//! CWD-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, WatchdogError>;

/// Top-level error type for the capture watchdog.
#[derive(Debug, Error)]
pub enum WatchdogError {
    #[error("[CWD-1001] invalid format: {input:?} (expected e.g. {example})")]
    InvalidFormat {
        input: String,
        example: &'static str,
    },

    #[error("[CWD-1002] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[CWD-1003] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[CWD-1004] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[CWD-2001] scan failure at {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[CWD-3001] stop command `{command}` failed: {status}")]
    StopCommandFailed { command: String, status: String },

    #[error("[CWD-3002] stop command not found: {program}")]
    StopCommandNotFound { program: String },

    #[error("[CWD-3003] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[CWD-3101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[CWD-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl WatchdogError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat { .. } => "CWD-1001",
            Self::InvalidConfig { .. } => "CWD-1002",
            Self::MissingConfig { .. } => "CWD-1003",
            Self::ConfigParse { .. } => "CWD-1004",
            Self::Scan { .. } => "CWD-2001",
            Self::StopCommandFailed { .. } => "CWD-3001",
            Self::StopCommandNotFound { .. } => "CWD-3002",
            Self::Io { .. } => "CWD-3003",
            Self::Serialization { .. } => "CWD-3101",
            Self::Runtime { .. } => "CWD-3900",
        }
    }

    /// Whether the error can only arise before monitoring starts.
    #[must_use]
    pub const fn is_startup(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat { .. }
                | Self::InvalidConfig { .. }
                | Self::MissingConfig { .. }
                | Self::ConfigParse { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Convenience constructor for scan errors with a known path.
    #[must_use]
    pub fn scan(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Scan {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for WatchdogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for WatchdogError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<WatchdogError> {
        vec![
            WatchdogError::InvalidFormat {
                input: String::new(),
                example: "",
            },
            WatchdogError::InvalidConfig {
                details: String::new(),
            },
            WatchdogError::MissingConfig {
                path: PathBuf::new(),
            },
            WatchdogError::ConfigParse {
                context: "",
                details: String::new(),
            },
            WatchdogError::Scan {
                path: PathBuf::new(),
                source: std::io::Error::other("test"),
            },
            WatchdogError::StopCommandFailed {
                command: String::new(),
                status: String::new(),
            },
            WatchdogError::StopCommandNotFound {
                program: String::new(),
            },
            WatchdogError::Io {
                path: PathBuf::new(),
                source: std::io::Error::other("test"),
            },
            WatchdogError::Serialization {
                context: "",
                details: String::new(),
            },
            WatchdogError::Runtime {
                details: String::new(),
            },
        ]
    }

    #[test]
    fn error_codes_are_unique() {
        let errors = all_variants();
        let codes: Vec<&str> = errors.iter().map(WatchdogError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn display_carries_code_prefix() {
        for err in all_variants() {
            let msg = err.to_string();
            assert!(
                msg.starts_with(&format!("[{}]", err.code())),
                "display should start with code: {msg}"
            );
        }
    }

    #[test]
    fn invalid_format_names_input_and_example() {
        let err = WatchdogError::InvalidFormat {
            input: "2XB".to_string(),
            example: "'2MB', '1GB', '3.5TB'",
        };
        let msg = err.to_string();
        assert!(msg.contains("\"2XB\""), "missing input: {msg}");
        assert!(msg.contains("3.5TB"), "missing example: {msg}");
    }

    #[test]
    fn startup_errors_are_classified() {
        assert!(
            WatchdogError::InvalidConfig {
                details: String::new()
            }
            .is_startup()
        );
        assert!(
            !WatchdogError::scan("/data", std::io::Error::other("gone")).is_startup()
        );
        assert!(
            !WatchdogError::Runtime {
                details: String::new()
            }
            .is_startup()
        );
    }

    #[test]
    fn io_convenience_constructor() {
        let err = WatchdogError::io(
            "/tmp/test.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.code(), "CWD-3003");
        assert!(err.to_string().contains("/tmp/test.txt"));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: WatchdogError = json_err.into();
        assert_eq!(err.code(), "CWD-3101");
    }

    #[test]
    fn from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("= invalid").unwrap_err();
        let err: WatchdogError = toml_err.into();
        assert_eq!(err.code(), "CWD-1004");
    }
}
