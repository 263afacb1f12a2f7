//! Task resolution, planning and execution for taskwright
//!
//! The resolver turns an intent and target into a task list, the registry
//! knows what every task identifier stands for, the planner expands composite
//! tasks into a flat plan, and the executor runs that plan.

pub mod builtin;
pub mod executor;
pub mod plan;
pub mod registry;
pub mod resolver;

pub use executor::{
    ExecutionContext, ExecutionReport, ProcessRunner, SystemRunner, TaskExecutor, TaskOutcome,
    ToolInvocation,
};
pub use plan::{ExecutionPlan, Planner, Step};
pub use registry::{RegisteredTask, TaskKind, TaskRegistry};
pub use resolver::{Intent, Resolver};
