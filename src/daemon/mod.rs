//! Daemon subsystem: main monitoring loop, capture-service control, and
//! signal handling.

pub mod controller;
pub mod loop_main;
pub mod signals;
