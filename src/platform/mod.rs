//! Platform seams: effective-privilege detection and command invocation strategy.

pub mod privilege;
