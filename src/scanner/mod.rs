//! Directory scanning: recursive size accumulation for the watched folder.

pub mod dir_size;
