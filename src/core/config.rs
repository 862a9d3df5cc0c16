//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, WatchdogError};

/// Default location of the optional config file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/capwatch/config.toml";

/// Full watchdog configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub monitor: MonitorSection,
    pub scanner: ScannerConfig,
    pub capture: CaptureConfig,
}

/// What to watch and how often.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MonitorSection {
    pub folder: PathBuf,
    pub poll_interval_secs: u64,
}

/// Directory size scan behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ScannerConfig {
    pub on_unreadable: UnreadablePolicy,
}

/// What a scan does when a subtree cannot be read mid-walk.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnreadablePolicy {
    /// Fail the scan; the monitor stops with an error.
    #[default]
    Abort,
    /// Log a warning, leave the subtree out of the total, keep going.
    Skip,
}

impl UnreadablePolicy {
    fn parse(name: &str, raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(WatchdogError::ConfigParse {
                context: "env",
                details: format!("{name}={other:?}: expected \"abort\" or \"skip\""),
            }),
        }
    }
}

/// External capture-control command and its privilege wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Program and arguments that stop the capture service.
    pub stop_command: Vec<String>,
    /// Wrapper prepended when the watchdog is not running as root.
    pub elevation_command: Vec<String>,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("/data"),
            poll_interval_secs: 60,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            stop_command: vec!["zeekctl".to_string(), "stop".to_string()],
            elevation_command: vec!["sudo".to_string()],
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_PATH)
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    /// The result is not validated: callers layer their own overrides on top and
    /// then call [`validate`](Self::validate) once.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| WatchdogError::Io {
                path: path_buf.clone(),
                source,
            })?;
            toml::from_str::<Self>(&raw)?
        } else if path.is_some() {
            return Err(WatchdogError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.apply_env_overrides_from(|name| env::var(name).ok())?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for logging.
    ///
    /// FNV-1a over the canonical JSON form, stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut var = |name: &str| lookup(name).filter(|raw| !raw.trim().is_empty());

        if let Some(raw) = var("CAPWATCH_FOLDER") {
            self.monitor.folder = PathBuf::from(raw.trim());
        }
        if let Some(raw) = var("CAPWATCH_POLL_INTERVAL_SECS") {
            self.monitor.poll_interval_secs = parse_env_u64("CAPWATCH_POLL_INTERVAL_SECS", &raw)?;
        }
        if let Some(raw) = var("CAPWATCH_ON_UNREADABLE") {
            self.scanner.on_unreadable = UnreadablePolicy::parse("CAPWATCH_ON_UNREADABLE", &raw)?;
        }
        if let Some(raw) = var("CAPWATCH_STOP_COMMAND") {
            self.capture.stop_command = split_command(&raw);
        }
        if let Some(raw) = var("CAPWATCH_ELEVATION_COMMAND") {
            self.capture.elevation_command = split_command(&raw);
        }
        Ok(())
    }

    /// Check cross-field invariants. Called again after CLI overrides.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.poll_interval_secs == 0 {
            return Err(WatchdogError::InvalidConfig {
                details: "monitor.poll_interval_secs must be at least 1".to_string(),
            });
        }
        if self.monitor.folder.as_os_str().is_empty() {
            return Err(WatchdogError::InvalidConfig {
                details: "monitor.folder must not be empty".to_string(),
            });
        }
        for (name, command) in [
            ("capture.stop_command", &self.capture.stop_command),
            ("capture.elevation_command", &self.capture.elevation_command),
        ] {
            if command.first().is_none_or(|program| program.trim().is_empty()) {
                return Err(WatchdogError::InvalidConfig {
                    details: format!("{name} must name a program"),
                });
            }
        }
        Ok(())
    }
}

fn split_command(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

fn parse_env_u64(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|error| WatchdogError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}
