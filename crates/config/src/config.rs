//! Centralized configuration for taskwright
//!
//! `Config` is built once at startup by [`ConfigLoader`](crate::ConfigLoader)
//! and shared by reference with the registry and executor. It is immutable
//! after construction.

use crate::files::{CleanConfig, ConcurrentConfig, ConfigProdConfig, CopyConfig};
use crate::notify::NotifyConfig;
use crate::tools::ToolsConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taskwright_core::{Error, Result, TargetPolicy};

/// User-defined task names that run a list of other tasks in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasConfig(IndexMap<String, Vec<String>>);

impl AliasConfig {
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(name, tasks)| (name.as_str(), tasks.as_slice()))
    }

    pub fn validate(&self) -> Result<()> {
        for (name, tasks) in &self.0 {
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(Error::configuration(format!("invalid alias name '{name}'")));
            }
            if tasks.is_empty() {
                return Err(Error::configuration(format!("alias '{name}' has no tasks")));
            }
        }
        Ok(())
    }
}

/// Contents of `taskwright.json`; every section is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectConfig {
    pub tools: ToolsConfig,
    pub clean: CleanConfig,
    pub copy: CopyConfig,
    pub config_prod: ConfigProdConfig,
    pub concurrent: ConcurrentConfig,
    pub aliases: AliasConfig,
    pub notify: NotifyConfig,
}

impl ProjectConfig {
    pub fn validate(&self) -> Result<()> {
        self.tools.validate()?;
        self.config_prod.validate()?;
        self.concurrent.validate()?;
        self.notify.validate()?;
        self.aliases.validate()
    }
}

/// Settings that come from the command line rather than the project file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Print the plan instead of running it
    pub dry_run: bool,
    /// Reject unrecognized targets instead of falling back
    pub strict: bool,
    pub verbosity: u8,
}

/// Immutable configuration shared across components
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root every relative path is resolved against
    pub root: PathBuf,
    pub project: ProjectConfig,
    pub runtime: RuntimeOptions,
    /// File the project settings were read from, if any
    pub source_file: Option<PathBuf>,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>, project: ProjectConfig, runtime: RuntimeOptions) -> Self {
        Self {
            root: root.into(),
            project,
            runtime,
            source_file: None,
        }
    }

    /// Absolute form of a project-relative path
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn target_policy(&self) -> TargetPolicy {
        if self.runtime.strict {
            TargetPolicy::Strict
        } else {
            TargetPolicy::Fallback
        }
    }

    pub fn tools(&self) -> &ToolsConfig {
        &self.project.tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path_joins_relative_paths() {
        let config = Config::new("/srv/app", ProjectConfig::default(), RuntimeOptions::default());
        assert_eq!(
            config.resolve_path(Path::new("dist/server")),
            PathBuf::from("/srv/app/dist/server")
        );
        assert_eq!(
            config.resolve_path(Path::new("/etc/app.json")),
            PathBuf::from("/etc/app.json")
        );
    }

    #[test]
    fn test_strict_flag_selects_policy() {
        let runtime = RuntimeOptions {
            strict: true,
            ..RuntimeOptions::default()
        };
        let config = Config::new(".", ProjectConfig::default(), runtime);
        assert_eq!(config.target_policy(), TargetPolicy::Strict);
    }

    #[test]
    fn test_aliases_keep_order_and_validate() {
        let project: ProjectConfig = serde_json::from_str(
            r#"{ "aliases": { "ci": ["test", "build:dist"], "empty": [] } }"#,
        )
        .unwrap();

        let aliases: Vec<_> = project.aliases.entries().collect();
        assert_eq!(aliases[0].0, "ci");
        assert_eq!(aliases[0].1, &["test".to_string(), "build:dist".to_string()]);
        assert_eq!(aliases[1].0, "empty");
        let err = project.validate().unwrap_err();
        assert!(err.to_string().contains("alias 'empty' has no tasks"));
    }

    #[test]
    fn test_unknown_sections_are_rejected() {
        let result: std::result::Result<ProjectConfig, _> =
            serde_json::from_str(r#"{ "notify_hooks": {} }"#);
        assert!(result.is_err());
    }
}
