//! Main monitoring loop: scan, evaluate triggers, stop the capture service.
//!
//! One sequential thread of control. Each tick scans the watched folder,
//! reports its size, and checks the size threshold first and the deadline
//! second. A trigger leads to exactly one stop attempt; a failed attempt is
//! retried only by the next tick's re-evaluation, at the fixed poll interval.
//! The wait between ticks is the only suspension point and is cut short by a
//! shutdown request.

#![allow(missing_docs)]

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::core::deadline::Deadline;
use crate::core::errors::{Result, WatchdogError};
use crate::core::size::SizeThreshold;
use crate::daemon::controller::CaptureController;
use crate::daemon::signals::SignalHandler;
use crate::logger::console;
use crate::scanner::dir_size::DirectorySizeScanner;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

// ──────────────────── monitor configuration ────────────────────

/// Immutable runtime settings for one monitoring session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    folder: PathBuf,
    threshold: SizeThreshold,
    deadline: Option<Deadline>,
    poll_interval: Duration,
}

impl MonitorConfig {
    /// Validate and freeze the session settings.
    ///
    /// The folder must exist and be a directory; the poll interval must be non-zero.
    pub fn new(
        folder: impl Into<PathBuf>,
        threshold: SizeThreshold,
        deadline: Option<Deadline>,
        poll_interval: Duration,
    ) -> Result<Self> {
        let folder = folder.into();
        if !folder.is_dir() {
            return Err(WatchdogError::InvalidConfig {
                details: format!("folder '{}' does not exist", folder.display()),
            });
        }
        if poll_interval.is_zero() {
            return Err(WatchdogError::InvalidConfig {
                details: "poll interval must be positive".to_string(),
            });
        }
        Ok(Self {
            folder,
            threshold,
            deadline,
            poll_interval,
        })
    }
}

// ──────────────────── loop state ────────────────────

/// Lifecycle of a [`MonitorLoop`]. Every state except `Running` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    StoppedSize,
    StoppedDeadline,
    StoppedInterrupt,
    StoppedError,
}

impl LoopState {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Process exit status for a session that ended in this state.
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::StoppedError => 1,
            Self::Running
            | Self::StoppedSize
            | Self::StoppedDeadline
            | Self::StoppedInterrupt => 0,
        }
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Running => "running",
            Self::StoppedSize => "stopped: size limit",
            Self::StoppedDeadline => "stopped: end time",
            Self::StoppedInterrupt => "stopped: interrupted",
            Self::StoppedError => "stopped: error",
        };
        f.write_str(label)
    }
}

/// Condition that calls for stopping the capture service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    SizeLimit,
    Deadline,
}

impl Trigger {
    /// Terminal state reached when the stop attempt for this trigger succeeds.
    pub const fn stopped_state(self) -> LoopState {
        match self {
            Self::SizeLimit => LoopState::StoppedSize,
            Self::Deadline => LoopState::StoppedDeadline,
        }
    }
}

/// Decide whether a scan result or the clock calls for a stop.
///
/// The size threshold is checked first; the deadline only when the size is
/// still below it.
pub fn evaluate(config: &MonitorConfig, size_bytes: u64, now: DateTime<Local>) -> Option<Trigger> {
    if config.threshold.is_reached_by(size_bytes) {
        Some(Trigger::SizeLimit)
    } else if config.deadline.is_some_and(|deadline| deadline.is_due(now)) {
        Some(Trigger::Deadline)
    } else {
        None
    }
}

// ──────────────────── monitor loop ────────────────────

/// Periodic size/deadline watchdog for one folder.
pub struct MonitorLoop<C: CaptureController> {
    config: MonitorConfig,
    scanner: DirectorySizeScanner,
    controller: C,
    signals: SignalHandler,
    state: LoopState,
}

impl<C: CaptureController> MonitorLoop<C> {
    pub fn new(
        config: MonitorConfig,
        scanner: DirectorySizeScanner,
        controller: C,
        signals: SignalHandler,
    ) -> Self {
        Self {
            config,
            scanner,
            controller,
            signals,
            state: LoopState::Running,
        }
    }

    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// One scan/evaluate/act pass at clock reading `now`.
    ///
    /// Returns the terminal state when the tick ends monitoring, `None` to
    /// keep polling. A pending shutdown request wins over a stop attempt.
    pub fn tick(&mut self, now: DateTime<Local>) -> Result<Option<LoopState>> {
        let size = self.scanner.scan(&self.config.folder)?;
        #[allow(clippy::cast_precision_loss)]
        let size_mib = size as f64 / BYTES_PER_MIB;
        console::info(&format!("Current size: {size_mib:.2} MB"));

        let Some(trigger) = evaluate(&self.config, size, now) else {
            return Ok(None);
        };
        match (trigger, self.config.deadline) {
            (Trigger::SizeLimit, _) => console::info(&format!(
                "Size limit reached ({} bytes)",
                self.config.threshold
            )),
            (Trigger::Deadline, Some(deadline)) => {
                console::info(&format!("End time reached ({deadline})"));
            }
            (Trigger::Deadline, None) => console::info("End time reached"),
        }

        if self.signals.should_shutdown() {
            return Ok(Some(LoopState::StoppedInterrupt));
        }
        if self.controller.stop() {
            return Ok(Some(trigger.stopped_state()));
        }
        console::warn(&format!(
            "Stop attempt failed; re-checking in {}s",
            self.config.poll_interval.as_secs_f64()
        ));
        Ok(None)
    }

    /// Run until a trigger succeeds, shutdown is requested, or a tick fails.
    ///
    /// Interruption is a normal outcome (`Ok(StoppedInterrupt)`). A failed
    /// tick leaves the loop in `StoppedError` and returns the error.
    pub fn run(&mut self) -> Result<LoopState> {
        if self.state.is_terminal() {
            return Err(WatchdogError::Runtime {
                details: format!("monitor loop already finished ({})", self.state),
            });
        }

        console::info(&format!(
            "Started monitoring '{}'",
            self.config.folder.display()
        ));

        loop {
            if self.signals.should_shutdown() {
                return Ok(self.finish(LoopState::StoppedInterrupt));
            }

            match self.tick(Local::now()) {
                Ok(Some(state)) => return Ok(self.finish(state)),
                Ok(None) => {}
                Err(err) => {
                    self.finish(LoopState::StoppedError);
                    return Err(err);
                }
            }

            if self.signals.wait(self.config.poll_interval) {
                return Ok(self.finish(LoopState::StoppedInterrupt));
            }
        }
    }

    fn finish(&mut self, state: LoopState) -> LoopState {
        self.state = state;
        if state == LoopState::StoppedInterrupt {
            console::info("Monitoring stopped by user");
        }
        state
    }
}

// ──────────────────── tests ────────────────────
