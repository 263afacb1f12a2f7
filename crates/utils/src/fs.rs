//! File system helpers for built-in tasks

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use taskwright_core::{Error, Result};
use uuid::Uuid;

/// Create `dir` (and missing parents) if it does not exist yet.
///
/// Returns `true` when the directory was created by this call.
pub fn ensure_dir(dir: &Path) -> Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|e| Error::file_system(dir, "create directory", e))?;
    Ok(true)
}

/// Remove a file or directory tree. Missing paths are not an error.
pub fn remove_path(path: &Path) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(Error::file_system(path, "stat", e)),
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| Error::file_system(path, "remove", e))?;
    Ok(true)
}

/// Write data to a file atomically by writing to a temporary file and renaming
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::configuration(format!(
            "invalid file path '{}': no parent directory",
            path.display()
        ))
    })?;

    // Same directory keeps the rename atomic
    let temp_path = parent.join(format!(".{}.tmp", Uuid::new_v4()));

    let result = (|| -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| Error::file_system(&temp_path, "create temporary file", e))?;

        file.write_all(content)
            .map_err(|e| Error::file_system(&temp_path, "write to temporary file", e))?;

        file.sync_all()
            .map_err(|e| Error::file_system(&temp_path, "sync temporary file", e))?;

        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
        return result;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::file_system(path, "atomic rename", e)
    })
}

/// Copy `from` to `to`, creating the destination's parent directories
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::file_system(parent, "create parent directory", e))?;
    }
    fs::copy(from, to).map_err(|e| Error::file_system(from, "copy", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("dist");

        assert!(ensure_dir(&dir).unwrap());
        assert!(!ensure_dir(&dir).unwrap());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_ensure_dir_fails_on_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("dist");
        fs::write(&file, "not a directory").unwrap();

        assert!(ensure_dir(&file).is_err());
    }

    #[test]
    fn test_atomic_write_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.json");

        fs::write(&file_path, "{\"old\":true}").unwrap();
        write_atomic(&file_path, b"{\"new\":true}").unwrap();

        assert_eq!(fs::read(&file_path).unwrap(), b"{\"new\":true}");
        // No temporary files left behind
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_remove_path_handles_missing_and_trees() {
        let temp_dir = TempDir::new().unwrap();
        let tree = temp_dir.path().join("dev");
        fs::create_dir_all(tree.join("assets")).unwrap();
        fs::write(tree.join("assets").join("bundle.js"), "x").unwrap();

        assert!(remove_path(&tree).unwrap());
        assert!(!tree.exists());
        assert!(!remove_path(&tree).unwrap());
    }

    #[test]
    fn test_copy_file_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("index.html");
        fs::write(&from, "<html></html>").unwrap();
        let to = temp_dir.path().join("dev").join("public").join("index.html");

        copy_file(&from, &to).unwrap();
        assert_eq!(fs::read_to_string(&to).unwrap(), "<html></html>");
    }
}
