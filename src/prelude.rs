//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use capture_watchdog::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, UnreadablePolicy};
pub use crate::core::deadline::Deadline;
pub use crate::core::errors::{Result, WatchdogError};
pub use crate::core::size::SizeThreshold;

// Platform
pub use crate::platform::privilege::{InvocationStrategy, invocation_strategy};

// Scanner
pub use crate::scanner::dir_size::DirectorySizeScanner;

// Daemon
pub use crate::daemon::controller::{CaptureController, CommandController};
pub use crate::daemon::loop_main::{LoopState, MonitorConfig, MonitorLoop, Trigger};
pub use crate::daemon::signals::SignalHandler;
