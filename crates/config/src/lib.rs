//! Configuration for taskwright
//!
//! Per-tool option structs with built-in defaults for the conventional project
//! layout, the file-operation settings used by built-in tasks, the failure
//! notification hook, and the loader
//! that merges an optional `taskwright.json` over those defaults.

pub mod config;
pub mod files;
pub mod loader;
pub mod notify;
pub mod tools;

pub use config::*;
pub use files::*;
pub use loader::*;
pub use notify::*;
pub use tools::*;
