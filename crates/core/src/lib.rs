//! Core domain types, errors, and constants for `taskwright`.
//!
//! ## Key Components
//!
//! - **`errors`**: the primary `Error` enum and `Result` alias shared by every
//!   crate in the workspace.
//! - **`types`**: typed targets for each intent, task identifiers, ordered task
//!   lists and the environment flag handed to external tools.
//! - **`constants`**: file names, environment variable names and default paths.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
    types::*,
};
