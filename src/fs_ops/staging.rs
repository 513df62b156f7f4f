//! Staging files for overwrite-safe writes.
//!
//! A `StagedFile` is a fresh temporary file created in the destination's own
//! directory. Data is written into it, and only `commit` moves it onto the
//! destination path with a single rename. Dropping an uncommitted staging file
//! removes it, so every early return leaves the destination as it was.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::io_copy::copy_chunked;
use super::util::{self, STAGING_PREFIX, STAGING_SUFFIX};
use crate::errors::{Error, Result};

#[derive(Debug)]
pub struct StagedFile {
    dest: PathBuf,
    tmp: NamedTempFile,
}

impl StagedFile {
    /// Create an empty staging file next to `dest`. The parent directory must exist.
    pub fn create(dest: &Path) -> Result<Self> {
        let dir = util::parent_dir(dest);
        let tmp = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(&dir)
            .map_err(|e| Error::io("create staging file", &dir, e))?;
        debug!(staging = %tmp.path().display(), dest = %dest.display(), "Staging file created");
        Ok(Self {
            dest: dest.to_path_buf(),
            tmp,
        })
    }

    pub fn path(&self) -> &Path {
        self.tmp.path()
    }

    pub fn as_file_mut(&mut self) -> &mut File {
        self.tmp.as_file_mut()
    }

    /// Stream `reader` into the staging file in `chunk_size` pieces.
    pub fn write_from<R: Read + ?Sized>(&mut self, reader: &mut R, chunk_size: usize) -> io::Result<u64> {
        copy_chunked(reader, self.tmp.as_file_mut(), chunk_size)
    }

    /// Sync the staged data and rename it onto the destination.
    ///
    /// With `overwrite == false` the rename refuses to replace a file that
    /// appeared since the caller's own existence check.
    pub fn commit(self, overwrite: bool) -> Result<()> {
        let StagedFile { dest, tmp } = self;
        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::io("sync staging file", tmp.path(), e))?;

        let persisted = if overwrite {
            tmp.persist(&dest)
        } else {
            tmp.persist_noclobber(&dest)
        };

        match persisted {
            Ok(_) => {
                let _ = util::fsync_dir(&util::parent_dir(&dest));
                debug!(dest = %dest.display(), "Staging file promoted");
                Ok(())
            }
            // The PersistError still owns the temp file; dropping it deletes it.
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                Err(Error::AlreadyExists(dest.display().to_string()))
            }
            Err(e) => Err(Error::io("promote staging file", dest, e.error)),
        }
    }
}
