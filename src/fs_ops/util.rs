use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};

/// Name prefix of staging files; anything starting with it is ours.
pub const STAGING_PREFIX: &str = ".drowsy.";
/// Name suffix of staging files.
pub const STAGING_SUFFIX: &str = ".tmp";

/// Presence test that does not follow symlinks, so a dangling link still counts.
pub(crate) fn is_present(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

pub(crate) fn require_path(path: &Path, name: &'static str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::MissingArgument(name));
    }
    Ok(())
}

/// Preconditions shared by copy, move and rename: source present, and the
/// destination absent unless `overwrite`.
pub(super) fn check_transfer(src: &Path, dst: &Path, overwrite: bool) -> Result<()> {
    require_path(src, "source")?;
    require_path(dst, "destination")?;
    if !is_present(src) {
        return Err(Error::NotFound(src.display().to_string()));
    }
    if !overwrite && is_present(dst) {
        return Err(Error::AlreadyExists(dst.display().to_string()));
    }
    Ok(())
}

/// Directory a file at `path` lives in; "." for bare file names.
pub(super) fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub(super) fn is_cross_device(e: &io::Error) -> bool {
    // std::io::ErrorKind has no stable CrossesDevices check on all toolchains,
    // so detect EXDEV / ERROR_NOT_SAME_DEVICE via raw OS error codes.
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            if code == libc::EXDEV {
                return true;
            }
        }
        #[cfg(windows)]
        {
            // ERROR_NOT_SAME_DEVICE
            if code == 17 {
                return true;
            }
        }
    }
    false
}

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    let f = File::open(dir)?;
    f.sync_all()
}

#[cfg(not(unix))]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
