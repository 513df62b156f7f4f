//! Directory creation.

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::util::{is_present, require_path};
use crate::errors::{Error, Result};

/// Create `path` and any missing parents.
///
/// An existing directory is accepted only when `exist_ok` is true. An existing
/// non-directory is always `AlreadyExists`.
pub fn make_dir(path: impl AsRef<Path>, exist_ok: bool) -> Result<()> {
    let path = path.as_ref();
    require_path(path, "directory")?;

    if is_present(path) {
        if exist_ok && path.is_dir() {
            debug!(path = %path.display(), "Directory already present");
            return Ok(());
        }
        return Err(Error::AlreadyExists(path.display().to_string()));
    }

    fs::create_dir_all(path).map_err(|e| Error::io("create directory", path, e))?;
    info!(path = %path.display(), "Created directory");
    Ok(())
}

/// Apply [`make_dir`] to each path in order, stopping at the first failure.
/// Directories created before the failure are kept.
pub fn make_dirs<I, P>(paths: I, exist_ok: bool) -> Result<()>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for path in paths {
        make_dir(path, exist_ok)?;
    }
    Ok(())
}
