//! Shared utilities for taskwright
//!
//! File system helpers, glob matching, modification-time comparison and
//! tracing setup used by the task and CLI crates.

pub mod file_times;
pub mod fs;
pub mod glob;
pub mod tracing;

pub use file_times::*;
pub use fs::*;
pub use glob::*;
