use std::fs;
use std::path::{Path, PathBuf};
use taskwright_config::ConfigProdConfig;
use taskwright_core::{Error, Result};
use taskwright_utils::{ensure_dir, write_atomic};

/// Copy the production config verbatim into the distribution tree.
///
/// The destination directory and its subdirectory are created only when
/// missing; the destination file is overwritten unconditionally. Returns the
/// path written.
pub fn config_prod(root: &Path, config: &ConfigProdConfig) -> Result<PathBuf> {
    let dest_dir = root.join(&config.dest_dir);
    ensure_dir(&dest_dir)?;
    let dest_dir = dest_dir.join(&config.dest_subdir);
    ensure_dir(&dest_dir)?;

    let source = root.join(&config.source);
    let bytes = fs::read(&source).map_err(|e| Error::file_system(&source, "read", e))?;

    let dest = dest_dir.join(&config.file_name);
    write_atomic(&dest, &bytes)?;

    tracing::info!(
        source = %source.display(),
        dest = %dest.display(),
        bytes = bytes.len(),
        "production config copied"
    );
    Ok(dest)
}
