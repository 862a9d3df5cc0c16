//! Capture-service shutdown through an external control command.
//!
//! The command runs synchronously with inherited stdio and no timeout: a hung
//! control command blocks the monitor until it returns.

#![allow(missing_docs)]

use std::io::ErrorKind;
use std::process::Command;

use crate::core::config::CaptureConfig;
use crate::core::errors::{Result, WatchdogError};
use crate::logger::console;
use crate::platform::privilege::{InvocationStrategy, invocation_strategy};

/// Something that can stop the capture service.
///
/// `stop` reports success as a boolean and never fails outward; callers retry
/// by calling again on a later tick. Implementations keep no memory of earlier
/// attempts; stopping an already-stopped service is the command's business.
pub trait CaptureController {
    fn stop(&mut self) -> bool;
}

/// Runs the configured stop command, directly or through the elevation wrapper.
#[derive(Debug, Clone)]
pub struct CommandController {
    stop_command: Vec<String>,
    strategy: InvocationStrategy,
}

impl CommandController {
    pub fn new(stop_command: Vec<String>, strategy: InvocationStrategy) -> Self {
        Self {
            stop_command,
            strategy,
        }
    }

    /// Build from config, deciding direct vs. elevated from the effective uid.
    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::new(
            config.stop_command.clone(),
            invocation_strategy(&config.elevation_command),
        )
    }

    /// The argv that [`stop`](CaptureController::stop) will execute.
    pub fn argv(&self) -> Vec<String> {
        self.strategy.argv(&self.stop_command)
    }

    /// Execute the stop command once.
    pub fn run_stop_command(&self) -> Result<()> {
        let argv = self.argv();
        let Some((program, args)) = argv.split_first() else {
            return Err(WatchdogError::InvalidConfig {
                details: "capture.stop_command must name a program".to_string(),
            });
        };

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => WatchdogError::StopCommandNotFound {
                    program: program.clone(),
                },
                _ => WatchdogError::io(program, source),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(WatchdogError::StopCommandFailed {
                command: argv.join(" "),
                status: status.to_string(),
            })
        }
    }
}

impl CaptureController for CommandController {
    fn stop(&mut self) -> bool {
        match self.run_stop_command() {
            Ok(()) => {
                console::info("Capture service stopped successfully");
                true
            }
            Err(err @ WatchdogError::StopCommandNotFound { .. }) => {
                console::critical(&format!("Stop command not found: {err}"));
                false
            }
            Err(err) => {
                console::critical(&format!("Failed to stop capture service: {err}"));
                false
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn successful_command_reports_true() {
        let mut controller = CommandController::new(words(&["true"]), InvocationStrategy::Direct);
        assert!(controller.run_stop_command().is_ok());
        assert!(controller.stop());
    }

    #[test]
    fn nonzero_exit_reports_false() {
        let mut controller = CommandController::new(words(&["false"]), InvocationStrategy::Direct);
        let err = controller.run_stop_command().unwrap_err();
        assert_eq!(err.code(), "CWD-3001");
        assert!(err.to_string().contains("false"));
        assert!(!controller.stop());
    }

    #[test]
    fn missing_executable_reports_false() {
        let mut controller = CommandController::new(
            words(&["capwatch-no-such-control-binary", "stop"]),
            InvocationStrategy::Direct,
        );
        let err = controller.run_stop_command().unwrap_err();
        assert!(matches!(
            err,
            WatchdogError::StopCommandNotFound { ref program } if program == "capwatch-no-such-control-binary"
        ));
        assert!(!controller.stop());
    }

    #[test]
    fn missing_wrapper_is_reported_as_not_found() {
        let controller = CommandController::new(
            words(&["true"]),
            InvocationStrategy::Elevated {
                wrapper: words(&["capwatch-no-such-sudo"]),
            },
        );
        assert_eq!(controller.argv(), ["capwatch-no-such-sudo", "true"]);
        assert_eq!(controller.run_stop_command().unwrap_err().code(), "CWD-3002");
    }

    #[test]
    fn wrapper_passes_command_through() {
        let mut controller = CommandController::new(
            words(&["sh", "-c", "exit 0"]),
            InvocationStrategy::Elevated {
                wrapper: words(&["env"]),
            },
        );
        assert!(controller.stop());
    }

    #[test]
    fn repeated_stops_are_independent() {
        let mut controller = CommandController::new(words(&["true"]), InvocationStrategy::Direct);
        assert!(controller.stop());
        assert!(controller.stop());
    }
}
