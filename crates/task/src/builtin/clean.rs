use std::path::{Component, Path, PathBuf};
use taskwright_core::{Error, Result};
use taskwright_utils::remove_path;

/// Remove `paths` (relative to `root`). Returns how many existed.
///
/// Paths must stay inside the project: absolute paths, `..` components and
/// the root itself are rejected before anything is deleted.
pub fn clean(root: &Path, target: &str, paths: &[PathBuf]) -> Result<usize> {
    for path in paths {
        let inside = path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        let names_something = path.components().any(|c| matches!(c, Component::Normal(_)));
        if !inside || !names_something {
            return Err(Error::configuration(format!(
                "clean:{target}: refusing to remove '{}' outside the project",
                path.display()
            )));
        }
    }

    let mut removed = 0;
    for path in paths {
        if remove_path(&root.join(path))? {
            tracing::debug!(path = %path.display(), "removed");
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_existing_paths() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("dist/public")).unwrap();
        fs::write(root.join("dist/public/index.html"), "").unwrap();

        let removed = clean(root, "dist", &[PathBuf::from("dist"), PathBuf::from("tmp")]).unwrap();

        assert_eq!(removed, 1);
        assert!(!root.join("dist").exists());
    }

    #[test]
    fn test_clean_rejects_paths_outside_project() {
        let temp_dir = TempDir::new().unwrap();
        for bad in ["../elsewhere", "/etc", ".", ""] {
            let err = clean(temp_dir.path(), "dev", &[PathBuf::from(bad)]).unwrap_err();
            assert!(err.to_string().contains("refusing to remove"), "{bad}");
        }
    }
}
