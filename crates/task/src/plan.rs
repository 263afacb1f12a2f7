//! Execution planning
//!
//! Expands a task list into the flat sequence of steps the executor runs.
//! Composites and aliases are replaced by their tasks recursively; a
//! `run-concurrently:<group>` entry becomes a single concurrent step.

use crate::registry::{TaskKind, TaskRegistry};
use crate::resolver::Resolver;
use std::fmt;
use taskwright_core::{Error, Result, TaskId, TaskList};

/// One entry of an execution plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Run a single task
    Run(TaskId),
    /// Run tools side by side and wait for all of them
    Concurrent {
        id: TaskId,
        group: String,
        members: Vec<TaskId>,
    },
}

impl Step {
    pub fn id(&self) -> &TaskId {
        match self {
            Step::Run(id) | Step::Concurrent { id, .. } => id,
        }
    }
}

/// Ordered steps for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub steps: Vec<Step>,
}

impl ExecutionPlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step identifiers in order; a concurrent step contributes its group id
    pub fn task_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.id().as_str()).collect()
    }
}

impl fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                Step::Run(id) => writeln!(f, "{:>3}. {id}", index + 1)?,
                Step::Concurrent { id, members, .. } => {
                    let members: Vec<&str> = members.iter().map(TaskId::as_str).collect();
                    writeln!(f, "{:>3}. {id} [{}]", index + 1, members.join(" | "))?
                }
            }
        }
        Ok(())
    }
}

/// Expands task lists against a registry
pub struct Planner<'a> {
    registry: &'a TaskRegistry,
    resolver: Resolver,
}

impl<'a> Planner<'a> {
    pub fn new(registry: &'a TaskRegistry, resolver: Resolver) -> Self {
        Self { registry, resolver }
    }

    /// Build the plan for `tasks`, validating every task before anything runs
    pub fn plan(&self, tasks: &TaskList) -> Result<ExecutionPlan> {
        let mut plan = ExecutionPlan::default();
        let mut stack = Vec::new();
        for id in tasks {
            self.expand(id, &mut stack, &mut plan.steps)?;
        }
        tracing::debug!(steps = plan.len(), "execution plan built");
        Ok(plan)
    }

    fn expand(&self, id: &TaskId, stack: &mut Vec<TaskId>, steps: &mut Vec<Step>) -> Result<()> {
        if stack.contains(id) {
            let mut chain: Vec<String> = stack.iter().map(ToString::to_string).collect();
            chain.push(id.to_string());
            return Err(Error::circular_dependency(chain));
        }

        let task = self.registry.lookup(id)?;
        let children = match task.kind {
            TaskKind::Composite { intent, target } => {
                self.resolver.resolve(intent, target.as_deref())?
            }
            TaskKind::Alias(tasks) => tasks,
            TaskKind::Concurrent { group, members } => {
                for member in &members {
                    match self.registry.lookup(member)?.kind {
                        TaskKind::Tool(_) => {}
                        _ => {
                            return Err(Error::configuration(format!(
                                "concurrent group '{group}' may only contain tools, not '{member}'"
                            )))
                        }
                    }
                }
                steps.push(Step::Concurrent {
                    id: id.clone(),
                    group,
                    members,
                });
                return Ok(());
            }
            _ => {
                steps.push(Step::Run(id.clone()));
                return Ok(());
            }
        };

        stack.push(id.clone());
        for child in &children {
            self.expand(child, stack, steps)?;
        }
        stack.pop();
        Ok(())
    }
}
