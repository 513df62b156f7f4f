//! Atomic rename helper.
//! - Performs a single rename; the io::Error is returned untouched so callers can classify it.
//! - On Windows, removes an existing destination first when replacing (RenameFile doesn't overwrite).
//! - On Unix, best-effort fsync of the destination directory after rename.

use std::fs;
use std::io;
use std::path::Path;

use super::util;

pub(super) fn try_atomic_move(src: &Path, dst: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        if dst.exists() {
            if let Err(e) = fs::remove_file(dst) {
                if e.kind() != io::ErrorKind::NotFound {
                    return Err(e);
                }
            }
        }
    }

    fs::rename(src, dst)?;

    // Ignore fsync errors to avoid turning a successful rename into a failure.
    let _ = util::fsync_dir(&util::parent_dir(dst));

    Ok(())
}
