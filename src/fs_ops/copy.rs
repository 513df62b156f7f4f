//! Safe copy:
//! - Streams the source into a staging file in the destination directory
//! - Renames the staging file onto the destination only after the copy completes
//! - A failed copy never leaves a partial destination or a stray staging file

use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

use super::io_copy::LOCAL_COPY_CHUNK;
use super::staging::StagedFile;
use super::util::check_transfer;
use crate::errors::{Error, Result};

/// Copy `src` to `dst` byte for byte. Returns the number of bytes copied.
///
/// Fails with `NotFound` if `src` is missing and with `AlreadyExists` if `dst`
/// exists and `overwrite` is false; in both cases nothing is written.
pub fn copy(src: impl AsRef<Path>, dst: impl AsRef<Path>, overwrite: bool) -> Result<u64> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    if let Err(e) = check_transfer(src, dst, overwrite) {
        warn!(code = e.code(), src = %src.display(), dest = %dst.display(), "Copy refused");
        return Err(e);
    }

    let bytes = staged_copy(src, dst, overwrite)?;
    info!(src = %src.display(), dest = %dst.display(), bytes, "Copied file");
    Ok(bytes)
}

/// Core: copy src -> staging file beside dst, then rename staging -> dst.
pub(super) fn staged_copy(src: &Path, dst: &Path, overwrite: bool) -> Result<u64> {
    let mut reader = File::open(src).map_err(|e| Error::io("open source", src, e))?;
    let mut staged = StagedFile::create(dst)?;
    let bytes = staged
        .write_from(&mut reader, LOCAL_COPY_CHUNK)
        .map_err(|e| Error::io("copy to staging file", src, e))?;
    staged.commit(overwrite)?;
    Ok(bytes)
}
