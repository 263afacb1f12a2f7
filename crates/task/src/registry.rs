//! Task registry
//!
//! Binds every task identifier to the unit of work it stands for. Tools,
//! environment flags, concurrent groups, built-in file operations and aliases
//! are registered up front from the configuration; composites
//! (`build:<target>`, `serve:<target>`, `test:<target>`) and `newer:<task>`
//! wrappers are recognized on lookup.

use crate::resolver::{names, Intent};
use indexmap::IndexMap;
use std::path::PathBuf;
use taskwright_config::{Config, CopySet, ToolCommand};
use taskwright_core::{Error, NodeEnv, Result, TaskId, TaskList};

/// What running a task means
#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    /// Run an external tool
    Tool(ToolCommand),
    /// Export `NODE_ENV` to every tool started afterwards
    SetEnv(NodeEnv),
    /// Start several tools side by side and wait for all of them
    Concurrent { group: String, members: Vec<TaskId> },
    /// Expand to the task list of another intent
    Composite {
        intent: Intent,
        target: Option<String>,
    },
    /// Expand to a user-defined task list
    Alias(TaskList),
    /// Run the wrapped task only for inputs that changed
    Newer(TaskId),
    /// Remove build output for a target
    Clean { target: String, paths: Vec<PathBuf> },
    /// Copy a configured file set
    Copy { set: String, spec: CopySet },
    /// Copy the production config into the distribution
    ConfigProd,
}

impl TaskKind {
    /// Composites and aliases are replaced by their tasks during planning
    pub fn is_expandable(&self) -> bool {
        matches!(self, TaskKind::Composite { .. } | TaskKind::Alias(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Tool(_) => "tool",
            TaskKind::SetEnv(_) => "env",
            TaskKind::Concurrent { .. } => "concurrent",
            TaskKind::Composite { .. } => "composite",
            TaskKind::Alias(_) => "alias",
            TaskKind::Newer(_) => "newer",
            TaskKind::Clean { .. } => "clean",
            TaskKind::Copy { .. } => "copy",
            TaskKind::ConfigProd => "builtin",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredTask {
    pub id: TaskId,
    pub kind: TaskKind,
    pub description: Option<String>,
}

impl RegisteredTask {
    /// Short category shown by `list`
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: IndexMap<TaskId, RegisteredTask>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every task the configuration describes
    pub fn from_config(config: &Config) -> Result<Self> {
        let project = &config.project;
        let mut registry = Self::new();

        for (name, tool) in project.tools.entries() {
            registry.register(name, TaskKind::Tool(tool.clone()), tool.description.clone())?;
        }

        registry.register(
            names::SET_ENV_DEV,
            TaskKind::SetEnv(NodeEnv::Development),
            Some("Set NODE_ENV=development".to_string()),
        )?;
        registry.register(
            names::SET_ENV_PROD,
            TaskKind::SetEnv(NodeEnv::Production),
            Some("Set NODE_ENV=production".to_string()),
        )?;

        for (group, members) in project.concurrent.groups() {
            registry.register(
                TaskId::with_arg(names::RUN_CONCURRENTLY, group),
                TaskKind::Concurrent {
                    group: group.to_string(),
                    members: members.iter().map(|m| TaskId::from(m.as_str())).collect(),
                },
                Some(format!("Run {} side by side", members.join(" and "))),
            )?;
        }

        for target in project.clean.targets() {
            let paths = project.clean.get(target).unwrap_or_default().to_vec();
            registry.register(
                TaskId::with_arg(names::CLEAN, target),
                TaskKind::Clean {
                    target: target.to_string(),
                    paths,
                },
                Some(format!("Remove {target} build output")),
            )?;
        }

        for (set, spec) in project.copy.entries() {
            registry.register(
                TaskId::with_arg("copy", set),
                TaskKind::Copy {
                    set: set.to_string(),
                    spec: spec.clone(),
                },
                Some(format!(
                    "Copy {} into {}",
                    spec.cwd.display(),
                    spec.dest.display()
                )),
            )?;
        }

        registry.register(
            names::CONFIG_PROD,
            TaskKind::ConfigProd,
            Some("Copy the production config into the distribution".to_string()),
        )?;

        for (name, tasks) in project.aliases.entries() {
            if Self::dynamic_kind(&TaskId::from(name)).is_some() {
                return Err(Error::configuration(format!(
                    "alias '{name}' shadows a built-in task"
                )));
            }
            registry.register(
                name,
                TaskKind::Alias(tasks.iter().map(String::as_str).collect()),
                Some(format!("Alias for {}", tasks.join(", "))),
            )?;
        }

        Ok(registry)
    }

    /// Register a task; identifiers must be unique
    pub fn register(
        &mut self,
        id: impl Into<TaskId>,
        kind: TaskKind,
        description: Option<String>,
    ) -> Result<()> {
        let id = id.into();
        if self.tasks.contains_key(&id) {
            return Err(Error::configuration(format!(
                "task '{id}' is registered twice"
            )));
        }
        self.tasks.insert(
            id.clone(),
            RegisteredTask {
                id,
                kind,
                description,
            },
        );
        Ok(())
    }

    /// Look up a task, recognizing composites and `newer:` wrappers
    pub fn lookup(&self, id: &TaskId) -> Result<RegisteredTask> {
        if let Some(task) = self.tasks.get(id) {
            return Ok(task.clone());
        }

        let kind = Self::dynamic_kind(id).ok_or_else(|| Error::task_not_found(id.as_str()))?;
        if let TaskKind::Newer(inner) = &kind {
            match self.lookup(inner)?.kind {
                TaskKind::Tool(_) | TaskKind::Copy { .. } => {}
                other => {
                    let label = other.label();
                    return Err(Error::configuration(format!(
                        "'{id}' cannot run incrementally: '{inner}' is a {label} task"
                    )));
                }
            }
        }

        Ok(RegisteredTask {
            id: id.clone(),
            kind,
            description: None,
        })
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.lookup(id).is_ok()
    }

    /// Registered tasks in registration order
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredTask> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn dynamic_kind(id: &TaskId) -> Option<TaskKind> {
        let (name, arg) = id.split();
        let composite = |intent| TaskKind::Composite {
            intent,
            target: arg.map(str::to_string),
        };
        match name {
            "build" => Some(composite(Intent::Build)),
            "serve" => Some(composite(Intent::Serve)),
            "test" => Some(composite(Intent::Test)),
            names::NEWER => arg.map(|inner| TaskKind::Newer(TaskId::from(inner))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskwright_config::{ProjectConfig, RuntimeOptions};

    fn config(project: ProjectConfig) -> Config {
        Config::new("/project", project, RuntimeOptions::default())
    }

    fn registry() -> TaskRegistry {
        TaskRegistry::from_config(&config(ProjectConfig::default())).unwrap()
    }

    #[test]
    fn test_every_resolved_task_is_registered() {
        let registry = registry();
        for id in [
            "lint:server",
            "lint:client",
            "set-env:development",
            "run-server-tests",
            "run-browser-tests",
            "run-e2e-tests",
            "start-server:dev",
            "start-debug-server",
            "attach-inspector:custom",
            "attach-inspector:liveEdit",
            "watch-files",
            "run-concurrently:debug",
            "run-concurrently:liveEdit",
            "clean:dev",
            "clean:dist",
            "less",
            "copy:html",
            "copy:dev",
            "copy:dist",
            "browserify",
            "ngAnnotate",
            "exorcise",
            "html2js",
            "cssmin",
            "config-prod",
            "uglify",
        ] {
            assert!(registry.contains(&TaskId::from(id)), "{id} is not registered");
        }
    }

    #[test]
    fn test_concurrent_groups_list_members() {
        let task = registry()
            .lookup(&TaskId::from("run-concurrently:liveEdit"))
            .unwrap();
        assert_eq!(
            task.kind,
            TaskKind::Concurrent {
                group: "liveEdit".to_string(),
                members: vec![
                    TaskId::from("start-debug-server"),
                    TaskId::from("attach-inspector:liveEdit")
                ],
            }
        );
    }

    #[test]
    fn test_composites_are_recognized() {
        let registry = registry();
        let task = registry.lookup(&TaskId::from("build:dist")).unwrap();
        assert_eq!(
            task.kind,
            TaskKind::Composite {
                intent: Intent::Build,
                target: Some("dist".to_string())
            }
        );
        assert!(task.kind.is_expandable());

        let task = registry.lookup(&TaskId::from("test")).unwrap();
        assert_eq!(
            task.kind,
            TaskKind::Composite {
                intent: Intent::Test,
                target: None
            }
        );
    }

    #[test]
    fn test_newer_wraps_tools_and_copies_only() {
        let registry = registry();
        assert_eq!(
            registry.lookup(&TaskId::from("newer:copy:html")).unwrap().kind,
            TaskKind::Newer(TaskId::from("copy:html"))
        );
        assert!(registry.lookup(&TaskId::from("newer:less")).is_ok());

        let err = registry.lookup(&TaskId::from("newer:clean:dev")).unwrap_err();
        assert!(err.to_string().contains("cannot run incrementally"));

        let err = registry.lookup(&TaskId::from("newer:nothing")).unwrap_err();
        assert!(matches!(err, Error::TaskNotFound { .. }));
    }

    #[test]
    fn test_unknown_task_is_not_found() {
        let err = registry().lookup(&TaskId::from("clean:staging")).unwrap_err();
        assert_eq!(err.to_string(), "task 'clean:staging' not found");
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = TaskRegistry::new();
        registry.register("less", TaskKind::ConfigProd, None).unwrap();
        assert!(registry.register("less", TaskKind::ConfigProd, None).is_err());
    }

    #[test]
    fn test_aliases_cannot_shadow_tasks() {
        let project: ProjectConfig =
            serde_json::from_str(r#"{ "aliases": { "less": ["cssmin"] } }"#).unwrap();
        assert!(TaskRegistry::from_config(&config(project)).is_err());

        let project: ProjectConfig =
            serde_json::from_str(r#"{ "aliases": { "build:ci": ["less"] } }"#).unwrap();
        let err = TaskRegistry::from_config(&config(project)).unwrap_err();
        assert!(err.to_string().contains("shadows a built-in task"));

        let project: ProjectConfig =
            serde_json::from_str(r#"{ "aliases": { "styles": ["less", "cssmin"] } }"#).unwrap();
        let registry = TaskRegistry::from_config(&config(project)).unwrap();
        assert_eq!(
            registry.lookup(&TaskId::from("styles")).unwrap().kind,
            TaskKind::Alias(["less", "cssmin"].into_iter().collect())
        );
    }
}
