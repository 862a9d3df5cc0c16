#![forbid(unsafe_code)]

//! Capture watchdog (capwatch) stops a packet-capture service before it
//! fills the disk.
//!
//! Two triggers, checked on every poll:
//! 1. **Size threshold**: the watched folder's total file size reaches a limit
//!    such as `"500GB"`
//! 2. **Deadline**: an optional local wall-clock end time passes
//!
//! Either one runs the capture control command (`zeekctl stop` by default,
//! through `sudo` when not root) and ends monitoring once it succeeds.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use capture_watchdog::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use capture_watchdog::core::size::SizeThreshold;
//! use capture_watchdog::daemon::loop_main::{MonitorConfig, MonitorLoop};
//! ```

pub mod prelude;

pub mod core;
pub mod daemon;
pub mod logger;
pub mod platform;
pub mod scanner;
