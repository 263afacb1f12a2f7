//! Tasks implemented natively rather than by an external tool

mod clean;
mod config_prod;
mod copy;

pub use clean::clean;
pub use config_prod::config_prod;
pub use copy::{copy, CopyStats};
