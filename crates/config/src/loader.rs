//! Configuration loader for taskwright
//!
//! Resolves the project root, reads `taskwright.json` when present, and
//! validates the merged result before anything runs.

use crate::config::{Config, ProjectConfig, RuntimeOptions};
use std::fs;
use std::path::{Path, PathBuf};
use taskwright_core::{Error, Result, ResultExt, CONFIG_FILENAME};

/// Configuration loader that handles all startup configuration
#[derive(Debug, Default)]
pub struct ConfigLoader {
    runtime: RuntimeOptions,
    /// Project root (defaults to the current directory)
    directory: Option<PathBuf>,
    /// Explicit config file; must exist when set
    config_file: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the project root
    pub fn directory(mut self, dir: PathBuf) -> Self {
        self.directory = Some(dir);
        self
    }

    /// Read settings from this file instead of `<root>/taskwright.json`
    pub fn config_file(mut self, path: PathBuf) -> Self {
        self.config_file = Some(path);
        self
    }

    /// Set runtime options
    pub fn runtime(mut self, runtime: RuntimeOptions) -> Self {
        self.runtime = runtime;
        self
    }

    /// Load the configuration
    pub fn load(self) -> Result<Config> {
        let root = match self.directory {
            Some(dir) => dir,
            None => std::env::current_dir()
                .map_err(|e| Error::file_system(".", "determine working directory", e))?,
        };

        let source_file = match self.config_file {
            Some(path) => Some(path),
            None => Some(root.join(CONFIG_FILENAME)).filter(|p| p.is_file()),
        };

        let project = match &source_file {
            Some(path) => Self::read_project(path)?,
            None => {
                tracing::debug!(root = %root.display(), "no config file, using defaults");
                ProjectConfig::default()
            }
        };
        project.validate()?;

        let mut config = Config::new(root, project, self.runtime);
        config.source_file = source_file;
        Ok(config)
    }

    fn read_project(path: &Path) -> Result<ProjectConfig> {
        let bytes = fs::read(path).map_err(|e| Error::file_system(path, "read", e))?;
        let project: ProjectConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(project)
    }
}
