//! Domain types shared across the workspace

mod environment;
mod targets;
mod task_id;

pub use environment::{EnvironmentVariables, NodeEnv};
pub use targets::{BuildTarget, ServeTarget, Target, TargetPolicy, TestTarget};
pub use task_id::{TaskId, TaskList};
