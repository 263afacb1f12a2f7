//! Resolve, plan and execute

use crate::commands::GlobalArgs;
use std::sync::Arc;
use taskwright_config::{Config, ConfigLoader, RuntimeOptions};
use taskwright_core::{Error, Result, TaskList};
use taskwright_task::{
    ExecutionPlan, Intent, Planner, Resolver, SystemRunner, TaskExecutor, TaskRegistry,
};

pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let mut loader = ConfigLoader::new().runtime(RuntimeOptions {
        dry_run: global.dry_run,
        strict: global.strict,
        verbosity: global.verbose,
    });
    if let Some(root) = &global.root {
        loader = loader.directory(root.clone());
    }
    if let Some(path) = &global.config {
        loader = loader.config_file(path.clone());
    }
    loader.load()
}

/// Register the configured tasks and expand `tasks` against them
pub fn build_plan(
    config: Config,
    tasks: &TaskList,
) -> Result<(Arc<Config>, Arc<TaskRegistry>, ExecutionPlan)> {
    let registry = TaskRegistry::from_config(&config)?;
    let plan = Planner::new(&registry, Resolver::new(config.target_policy())).plan(tasks)?;
    Ok((Arc::new(config), Arc::new(registry), plan))
}

pub async fn execute_intent(
    global: &GlobalArgs,
    intent: Intent,
    target: Option<String>,
) -> Result<()> {
    let config = load_config(global)?;
    let tasks = Resolver::new(config.target_policy()).resolve(intent, target.as_deref())?;
    tracing::debug!(intent = %intent, tasks = %tasks, "resolved task list");
    execute_plan(config, tasks).await
}

pub async fn execute_tasks(global: &GlobalArgs, tasks: TaskList) -> Result<()> {
    let config = load_config(global)?;
    execute_plan(config, tasks).await
}

async fn execute_plan(config: Config, tasks: TaskList) -> Result<()> {
    let dry_run = config.runtime.dry_run;
    let (config, registry, plan) = build_plan(config, &tasks)?;

    if dry_run {
        print!("{plan}");
        return Ok(());
    }

    let executor = TaskExecutor::new(config, registry, Arc::new(SystemRunner::new()));
    let report = tokio::select! {
        result = executor.execute(&plan) => result?,
        _ = tokio::signal::ctrl_c() => {
            // Dropping the execution kills every child it started
            tracing::warn!("interrupted, stopping tasks");
            return Err(Error::interrupted(tasks.to_string()));
        }
    };

    print!("{report}");
    Ok(())
}
