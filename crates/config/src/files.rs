//! Settings for the built-in file tasks: `clean`, `copy` and `config-prod`

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use taskwright_core::{
    Error, Result, DEV_DIR, DIST_DIR, PROD_CONFIG_FILENAME, PROD_CONFIG_SOURCE, SERVER_DIR,
};

/// Paths removed by `clean:<target>`, keyed by target in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanConfig(IndexMap<String, Vec<PathBuf>>);

impl Default for CleanConfig {
    fn default() -> Self {
        let mut targets = IndexMap::new();
        targets.insert("dev".to_string(), vec![PathBuf::from(DEV_DIR)]);
        targets.insert("dist".to_string(), vec![PathBuf::from(DIST_DIR)]);
        Self(targets)
    }
}

impl CleanConfig {
    pub fn get(&self, target: &str) -> Option<&[PathBuf]> {
        self.0.get(target).map(Vec::as_slice)
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Files under `cwd` matching `src` are copied to `dest`, keeping relative paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopySet {
    pub cwd: PathBuf,
    pub src: Vec<String>,
    pub dest: PathBuf,
}

impl CopySet {
    pub fn new(cwd: &str, src: &[&str], dest: &str) -> Self {
        Self {
            cwd: PathBuf::from(cwd),
            src: src.iter().map(|s| s.to_string()).collect(),
            dest: PathBuf::from(dest),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    pub html: CopySet,
    pub dev: CopySet,
    pub dist: CopySet,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            html: CopySet::new("client", &["**/*.html"], "dev/public"),
            dev: CopySet::new(
                "client",
                &["assets/**", "fonts/**", "images/**", "favicon.ico"],
                "dev/public",
            ),
            dist: CopySet::new("dev", &["**/*", "!**/*.map"], "dist"),
        }
    }
}

impl CopyConfig {
    pub fn entries(&self) -> [(&'static str, &CopySet); 3] {
        [("html", &self.html), ("dev", &self.dev), ("dist", &self.dist)]
    }
}

/// Where `config-prod` reads the production config and where it puts it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigProdConfig {
    pub source: PathBuf,
    pub dest_dir: PathBuf,
    pub dest_subdir: PathBuf,
    pub file_name: String,
}

impl Default for ConfigProdConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(PROD_CONFIG_SOURCE),
            dest_dir: PathBuf::from(DIST_DIR),
            dest_subdir: PathBuf::from(SERVER_DIR),
            file_name: PROD_CONFIG_FILENAME.to_string(),
        }
    }
}

impl ConfigProdConfig {
    pub fn validate(&self) -> Result<()> {
        if self.file_name.is_empty() || self.file_name.contains(['/', '\\']) {
            return Err(Error::configuration(format!(
                "configProd.fileName must be a plain file name, got '{}'",
                self.file_name
            )));
        }
        if self.dest_subdir.components().count() > 1 {
            return Err(Error::configuration(
                "configProd.destSubdir must be a single directory name",
            ));
        }
        Ok(())
    }
}

/// Named groups of tools started side by side by `run-concurrently:<group>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConcurrentConfig(IndexMap<String, Vec<String>>);

impl Default for ConcurrentConfig {
    fn default() -> Self {
        let mut groups = IndexMap::new();
        groups.insert(
            "debug".to_string(),
            vec![
                "start-debug-server".to_string(),
                "attach-inspector:custom".to_string(),
            ],
        );
        groups.insert(
            "liveEdit".to_string(),
            vec![
                "start-debug-server".to_string(),
                "attach-inspector:liveEdit".to_string(),
            ],
        );
        Self(groups)
    }
}

impl ConcurrentConfig {
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    pub fn validate(&self) -> Result<()> {
        match self.0.iter().find(|(_, members)| members.is_empty()) {
            Some((name, _)) => Err(Error::configuration(format!(
                "concurrent group '{name}' has no tasks"
            ))),
            None => Ok(()),
        }
    }
}
