//! Single-entry create/remove operations with existence preconditions.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use tracing::{info, warn};

use super::util::{is_present, require_path};
use crate::errors::{Error, Result};

/// Create an empty file. Fails with `AlreadyExists` if anything is at `path`.
pub fn touch(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    require_path(path, "path")?;

    // create_new closes the check-then-create window.
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            info!(path = %path.display(), "Created empty file");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            warn!(path = %path.display(), "File already exists");
            Err(Error::AlreadyExists(path.display().to_string()))
        }
        Err(e) => Err(Error::io("create file", path, e)),
    }
}

/// Delete a file. Fails with `NotFound` if nothing is at `path`.
pub fn remove(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    require_path(path, "path")?;
    if !is_present(path) {
        warn!(path = %path.display(), "Nothing to remove");
        return Err(Error::NotFound(path.display().to_string()));
    }

    fs::remove_file(path).map_err(|e| Error::io("remove file", path, e))?;
    info!(path = %path.display(), "Removed file");
    Ok(())
}
