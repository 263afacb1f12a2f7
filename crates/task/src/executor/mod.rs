//! Task execution
//!
//! Runs an [`ExecutionPlan`] step by step. External tools go through a
//! [`ProcessRunner`]; built-in file operations run on the blocking pool. The
//! first failing step aborts the run, and background tools started along the
//! way are stopped when the run ends either way. A failed run then triggers
//! the configured failure hook, if any.

mod report;
mod runner;

pub use report::{format_duration, ExecutionReport, TaskOutcome, TaskTiming};
pub use runner::{BackgroundProcess, ProcessRunner, SystemRunner, ToolInvocation};

use crate::builtin;
use crate::plan::{ExecutionPlan, Step};
use crate::registry::{TaskKind, TaskRegistry};
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use taskwright_config::{Config, ToolCommand};
use taskwright_core::{
    EnvironmentVariables, Error, Result, TaskId, FAILED_TASK_VAR, FAILURE_MESSAGE_VAR,
    NODE_ENV_VAR,
};
use taskwright_utils::{is_stale, tracing as log};
use tracing::Instrument;

/// Name the failure hook runs under in logs and output prefixes
const NOTIFY_TASK: &str = "notify";

/// State carried from one step to the next
#[derive(Debug, Default)]
pub struct ExecutionContext {
    /// Exported to every tool started afterwards
    pub env: EnvironmentVariables,
    background: Vec<BackgroundProcess>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    async fn shutdown(&mut self) {
        for process in self.background.drain(..).rev() {
            let task = process.task().clone();
            if let Err(e) = process.stop().await {
                tracing::warn!(task_name = %task, error = %e, "failed to stop background task");
            }
        }
    }
}

pub struct TaskExecutor<R: ProcessRunner> {
    config: Arc<Config>,
    registry: Arc<TaskRegistry>,
    runner: Arc<R>,
}

impl<R: ProcessRunner> TaskExecutor<R> {
    pub fn new(config: Arc<Config>, registry: Arc<TaskRegistry>, runner: Arc<R>) -> Self {
        Self {
            config,
            registry,
            runner,
        }
    }

    /// Run every step of `plan` in order
    pub async fn execute(&self, plan: &ExecutionPlan) -> Result<ExecutionReport> {
        let mut context = ExecutionContext::new();
        let mut report = ExecutionReport::default();

        let mut failure = None;
        for step in &plan.steps {
            if let Err(e) = self.execute_step(step, &mut context, &mut report).await {
                failure = Some((step.id(), e));
                break;
            }
        }

        context.shutdown().await;
        match failure {
            Some((failed, e)) => {
                self.notify_failure(failed, &e, &context.env).await;
                Err(e)
            }
            None => Ok(report),
        }
    }

    /// Run the configured failure hook; its own failure is only logged
    async fn notify_failure(&self, failed: &TaskId, error: &Error, env: &EnvironmentVariables) {
        let Some(hook) = self.config.project.notify.failure_hook() else {
            return;
        };

        let mut env = env.clone();
        env.insert(FAILED_TASK_VAR, failed.as_str());
        env.insert(FAILURE_MESSAGE_VAR, error.to_string());
        let invocation = self.invocation(&TaskId::from(NOTIFY_TASK), hook, &env, false);
        match self.runner.run(&invocation).await {
            Ok(0) => tracing::debug!(task_name = %failed, "failure notification sent"),
            Ok(code) => tracing::warn!(exit_code = code, "failure notification hook failed"),
            Err(e) => tracing::warn!(error = %e, "failure notification hook failed"),
        }
    }

    async fn execute_step(
        &self,
        step: &Step,
        context: &mut ExecutionContext,
        report: &mut ExecutionReport,
    ) -> Result<()> {
        match step {
            Step::Run(id) => {
                let start = Instant::now();
                let outcome = self
                    .execute_task(id, context)
                    .instrument(log::task_span(id))
                    .await;
                finish(report, id, start.elapsed(), outcome)
            }
            Step::Concurrent { id, group, members } => {
                let start = Instant::now();
                let outcome = self
                    .execute_group(members, context)
                    .instrument(log::group_span(group, members.len()))
                    .await
                    .map(|()| TaskOutcome::Completed);
                finish(report, id, start.elapsed(), outcome)
            }
        }
    }

    async fn execute_task(
        &self,
        id: &TaskId,
        context: &mut ExecutionContext,
    ) -> Result<TaskOutcome> {
        let task = self.registry.lookup(id)?;
        let root = self.config.root.clone();

        match task.kind {
            TaskKind::Tool(tool) => self.execute_tool(id, &tool, context).await,
            TaskKind::SetEnv(node_env) => {
                tracing::info!("{NODE_ENV_VAR}={node_env}");
                context.env.insert(NODE_ENV_VAR, node_env.as_str());
                Ok(TaskOutcome::Completed)
            }
            TaskKind::Newer(inner) => match self.registry.lookup(&inner)?.kind {
                TaskKind::Tool(tool) => {
                    if !tool.enabled {
                        return Ok(disabled(id));
                    }
                    let base = tool
                        .cwd
                        .as_deref()
                        .map_or_else(|| root.clone(), |cwd| self.config.resolve_path(cwd));
                    let (inputs, outputs) = (tool.inputs.clone(), tool.outputs.clone());
                    let stale = blocking(move || is_stale(&base, &inputs, &outputs)).await?;
                    if stale {
                        self.execute_tool(&inner, &tool, context).await
                    } else {
                        log::task_skipped(id, "outputs are up to date");
                        Ok(TaskOutcome::Skipped("up to date".to_string()))
                    }
                }
                TaskKind::Copy { spec, .. } => {
                    let stats = blocking(move || builtin::copy(&root, &spec, true)).await?;
                    tracing::info!(
                        copied = stats.copied,
                        unchanged = stats.unchanged,
                        "copied newer files"
                    );
                    Ok(TaskOutcome::Completed)
                }
                other => Err(Error::configuration(format!(
                    "'{id}' cannot run incrementally: '{inner}' is a {} task",
                    other.label()
                ))),
            },
            TaskKind::Clean { target, paths } => {
                let removed = blocking(move || builtin::clean(&root, &target, &paths)).await?;
                tracing::info!(removed, "cleaned");
                Ok(TaskOutcome::Completed)
            }
            TaskKind::Copy { spec, .. } => {
                let stats = blocking(move || builtin::copy(&root, &spec, false)).await?;
                tracing::info!(copied = stats.copied, "copied files");
                Ok(TaskOutcome::Completed)
            }
            TaskKind::ConfigProd => {
                let config = self.config.project.config_prod.clone();
                blocking(move || builtin::config_prod(&root, &config)).await?;
                Ok(TaskOutcome::Completed)
            }
            TaskKind::Concurrent { members, .. } => {
                self.execute_group(&members, context).await?;
                Ok(TaskOutcome::Completed)
            }
            TaskKind::Composite { .. } | TaskKind::Alias(_) => Err(Error::configuration(format!(
                "task '{id}' must be expanded by the planner before it can run"
            ))),
        }
    }

    async fn execute_tool(
        &self,
        id: &TaskId,
        tool: &ToolCommand,
        context: &mut ExecutionContext,
    ) -> Result<TaskOutcome> {
        if !tool.enabled {
            return Ok(disabled(id));
        }

        let invocation = self.invocation(id, tool, &context.env, false);
        if tool.background {
            let process = self.runner.spawn(&invocation).await?;
            tracing::info!(task_name = %id, "started in background");
            context.background.push(process);
            return Ok(TaskOutcome::Started);
        }

        self.run_to_completion(&invocation).await?;
        Ok(TaskOutcome::Completed)
    }

    async fn execute_group(&self, members: &[TaskId], context: &ExecutionContext) -> Result<()> {
        let mut invocations = Vec::with_capacity(members.len());
        for member in members {
            match self.registry.lookup(member)?.kind {
                TaskKind::Tool(tool) if tool.enabled => {
                    invocations.push(self.invocation(member, &tool, &context.env, true));
                }
                TaskKind::Tool(_) => log::task_skipped(member, "disabled"),
                other => {
                    return Err(Error::configuration(format!(
                        "'{member}' is a {} task and cannot run concurrently",
                        other.label()
                    )))
                }
            }
        }

        tracing::info!(
            members = %members.iter().map(TaskId::as_str).collect::<Vec<_>>().join(", "),
            "running concurrently"
        );
        try_join_all(invocations.iter().map(|inv| self.run_to_completion(inv))).await?;
        Ok(())
    }

    async fn run_to_completion(&self, invocation: &ToolInvocation) -> Result<()> {
        let code = self.runner.run(invocation).await?;
        if code == 0 {
            Ok(())
        } else {
            Err(Error::command_execution(
                &invocation.program,
                invocation.args.clone(),
                format!("task '{}' failed", invocation.task),
                Some(code),
            ))
        }
    }

    fn invocation(
        &self,
        id: &TaskId,
        tool: &ToolCommand,
        env: &EnvironmentVariables,
        prefix_output: bool,
    ) -> ToolInvocation {
        let mut merged = env.clone();
        merged.merge(&tool.env);
        ToolInvocation {
            task: id.clone(),
            program: tool.program.clone(),
            args: tool.args.clone(),
            cwd: tool
                .cwd
                .as_deref()
                .map_or_else(|| self.config.root.clone(), |cwd| self.config.resolve_path(cwd)),
            env: merged,
            prefix_output,
        }
    }
}

fn disabled(id: &TaskId) -> TaskOutcome {
    log::task_skipped(id, "disabled");
    TaskOutcome::Skipped("disabled".to_string())
}

fn finish(
    report: &mut ExecutionReport,
    id: &TaskId,
    elapsed: Duration,
    outcome: Result<TaskOutcome>,
) -> Result<()> {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    match outcome {
        Ok(outcome) => {
            if outcome == TaskOutcome::Completed {
                log::task_completed(id, duration_ms, true);
            }
            report.record(id.clone(), elapsed, outcome);
            Ok(())
        }
        Err(e) => {
            log::task_completed(id, duration_ms, false);
            Err(e)
        }
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::configuration(format!("built-in task panicked: {e}")))?
}

#[cfg(test)]
mod tests;
