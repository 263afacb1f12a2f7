use std::path::Path;
use taskwright_config::CopySet;
use taskwright_core::Result;
use taskwright_utils::{copy_file, is_newer, FileSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub copied: usize,
    pub unchanged: usize,
}

/// Copy the files selected by `spec` from `root/cwd` to `root/dest`.
///
/// With `only_newer`, files whose destination is at least as recent as the
/// source are left alone.
pub fn copy(root: &Path, spec: &CopySet, only_newer: bool) -> Result<CopyStats> {
    let source_dir = root.join(&spec.cwd);
    let dest_dir = root.join(&spec.dest);
    let files = FileSet::new(&source_dir, &spec.src)?.files()?;

    let mut stats = CopyStats::default();
    for relative in files {
        let from = source_dir.join(&relative);
        let to = dest_dir.join(&relative);
        if only_newer && !is_newer(&from, &to) {
            stats.unchanged += 1;
            continue;
        }
        copy_file(&from, &to)?;
        stats.copied += 1;
    }
    Ok(stats)
}
