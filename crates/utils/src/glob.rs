//! Glob-based file sets rooted at a base directory

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use taskwright_core::{Error, Result};
use walkdir::WalkDir;

/// Files under `base` selected by include patterns, minus `!`-prefixed excludes
#[derive(Debug, Clone)]
pub struct FileSet {
    base: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
    /// Literal leading directories of the include patterns; `None` walks everything
    roots: Option<Vec<PathBuf>>,
}

impl FileSet {
    pub fn new(base: impl Into<PathBuf>, patterns: &[String]) -> Result<Self> {
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();
        let mut roots = Some(Vec::new());

        for pattern in patterns {
            let (builder, pattern) = match pattern.strip_prefix('!') {
                Some(negated) => (&mut exclude, negated),
                None => {
                    let root = literal_prefix(pattern);
                    if root.as_os_str().is_empty() {
                        roots = None;
                    } else if let Some(roots) = roots.as_mut() {
                        roots.push(root);
                    }
                    (&mut include, pattern.as_str())
                }
            };
            let glob = Glob::new(pattern).map_err(|e| {
                Error::configuration(format!("invalid glob pattern '{pattern}': {e}"))
            })?;
            builder.add(glob);
        }

        let build = |builder: GlobSetBuilder| {
            builder
                .build()
                .map_err(|e| Error::configuration(format!("invalid glob set: {e}")))
        };

        Ok(Self {
            base: base.into(),
            include: build(include)?,
            exclude: build(exclude)?,
            roots,
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Whether a path relative to the base is selected
    pub fn matches(&self, relative: &Path) -> bool {
        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }

    /// Whether a directory relative to the base can contain selected files
    pub fn may_contain(&self, relative_dir: &Path) -> bool {
        match &self.roots {
            None => true,
            Some(roots) => roots
                .iter()
                .any(|root| relative_dir.starts_with(root) || root.starts_with(relative_dir)),
        }
    }

    /// Matching regular files as paths relative to the base, sorted.
    ///
    /// A missing base directory yields an empty set. Directories outside the
    /// literal prefixes of the patterns are not entered, and symlink loops
    /// are skipped.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        if !self.base.is_dir() {
            return Ok(Vec::new());
        }

        let walker = WalkDir::new(&self.base)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                entry
                    .path()
                    .strip_prefix(&self.base)
                    .map_or(true, |relative| self.may_contain(relative))
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.loop_ancestor().is_some() => {
                    tracing::debug!(path = ?e.path(), "skipping symlink loop");
                    continue;
                }
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("walk failed"));
                    return Err(Error::file_system(path, "walk directory", source));
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.base) else {
                continue;
            };
            if self.matches(relative) {
                files.push(relative.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Leading path components of `pattern` that contain no glob syntax
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut components: Vec<&str> = pattern.split('/').collect();
    // The last component names files, not a directory to descend into
    components.pop();
    components
        .into_iter()
        .take_while(|c| !c.contains(['*', '?', '[', '{']))
        .filter(|c| !c.is_empty() && *c != ".")
        .collect()
}
