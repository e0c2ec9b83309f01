use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, error, warn};

use crate::error::{PartitionError, Result};

/// Move a file from `src` to `dest`.
///
/// Tries a rename first. When that fails but `src` is still present (for
/// example across filesystems), falls back to [`copy_then_remove`].
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    debug!("Moving file from {:?} to {:?}", src, dest);

    let rename_err = match fs::rename(src, dest) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    if !src.is_file() {
        return Err(PartitionError::io(src, rename_err));
    }
    warn!(
        "Rename {:?} -> {:?} failed ({}), falling back to copy",
        src, dest, rename_err
    );
    copy_then_remove(src, dest)
}

/// Copy `src` to `dest`, then remove `src`. The copy is deleted again if
/// `src` cannot be removed, so the file never exists twice.
pub fn copy_then_remove(src: &Path, dest: &Path) -> Result<()> {
    copy_then_remove_with(src, dest, |path| fs::remove_file(path))
}

fn copy_then_remove_with<R>(src: &Path, dest: &Path, remove_src: R) -> Result<()>
where
    R: FnOnce(&Path) -> io::Result<()>,
{
    if let Err(e) = fs::copy(src, dest) {
        error!("Failed to copy file from {:?} to {:?}: {}", src, dest, e);
        return Err(PartitionError::io(dest, e));
    }

    if let Err(e) = remove_src(src) {
        error!("Failed to remove original file {:?} after copy: {}", src, e);
        if let Err(cleanup) = fs::remove_file(dest) {
            warn!("Could not remove copy {:?}: {}", dest, cleanup);
        }
        return Err(PartitionError::io(src, e));
    }

    Ok(())
}

/// Create `dir` and its parents if absent
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| PartitionError::io(dir, e))
}

/// Number of entries directly inside `dir`
pub fn count_entries(dir: &Path) -> Result<usize> {
    let entries = fs::read_dir(dir).map_err(|e| PartitionError::io(dir, e))?;
    let mut count = 0;
    for entry in entries {
        entry.map_err(|e| PartitionError::io(dir, e))?;
        count += 1;
    }
    Ok(count)
}

/// Remove `dir`, which must be empty. Unknown files are never deleted.
pub fn remove_empty_dir(dir: &Path) -> Result<()> {
    let remaining = count_entries(dir)?;
    if remaining > 0 {
        return Err(PartitionError::NonEmptyDirectory {
            path: dir.to_path_buf(),
            remaining,
        });
    }
    fs::remove_dir(dir).map_err(|e| PartitionError::io(dir, e))
}

pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| PartitionError::io(path, e))
}

/// True when `path` exists as a regular file. Other I/O failures are errors.
pub fn is_regular_file(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PartitionError::io(path, e)),
    }
}
