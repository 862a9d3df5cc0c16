//! Console logging: timestamped progress and failure lines.

pub mod console;
