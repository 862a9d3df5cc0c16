//! Core types: errors, configuration, size and deadline parsing.

pub mod config;
pub mod deadline;
pub mod errors;
pub mod size;
