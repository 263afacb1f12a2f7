//! Modification-time comparisons for incremental tasks

use crate::glob::FileSet;
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use taskwright_core::Result;

/// Modification time of `path`, `None` when it does not exist
pub fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok().and_then(|m| m.modified().ok())
}

/// Whether `source` must be copied over `dest`: the destination is missing or older
pub fn is_newer(source: &Path, dest: &Path) -> bool {
    match (modified(source), modified(dest)) {
        (Some(src), Some(dst)) => src > dst,
        (_, None) => true,
        (None, Some(_)) => false,
    }
}

/// Newest and oldest modification times across a file set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub count: usize,
    pub newest: Option<SystemTime>,
    pub oldest: Option<SystemTime>,
}

impl TimeRange {
    pub fn of(set: &FileSet) -> Result<Self> {
        let mut range = TimeRange::default();
        for relative in set.files()? {
            let Some(mtime) = modified(&set.base().join(relative)) else {
                continue;
            };
            range.count += 1;
            range.newest = Some(range.newest.map_or(mtime, |n| n.max(mtime)));
            range.oldest = Some(range.oldest.map_or(mtime, |o| o.min(mtime)));
        }
        Ok(range)
    }
}

/// Whether outputs must be regenerated from inputs.
///
/// Stale when nothing is declared to compare, when no output exists yet, or
/// when any input is newer than the oldest output.
pub fn is_stale(base: &Path, inputs: &[String], outputs: &[String]) -> Result<bool> {
    if inputs.is_empty() || outputs.is_empty() {
        return Ok(true);
    }

    let inputs = TimeRange::of(&FileSet::new(base, inputs)?)?;
    let outputs = TimeRange::of(&FileSet::new(base, outputs)?)?;

    Ok(match (inputs.newest, outputs.oldest) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(newest_input), Some(oldest_output)) => newest_input > oldest_output,
    })
}
