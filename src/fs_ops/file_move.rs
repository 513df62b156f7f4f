//! File move and rename.
//! `move_file` attempts an atomic rename and falls back to a safe staged copy
//! plus source removal when the rename crosses filesystems; `rename` never
//! falls back.

use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::atomic::try_atomic_move;
use super::copy::staged_copy;
use super::util::{check_transfer, is_cross_device};
use crate::errors::{Error, Result};

/// Relocate `src` to `dst`, crossing filesystems if needed.
pub fn move_file(src: impl AsRef<Path>, dst: impl AsRef<Path>, overwrite: bool) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    if let Err(e) = check_transfer(src, dst, overwrite) {
        warn!(code = e.code(), src = %src.display(), dest = %dst.display(), "Move refused");
        return Err(e);
    }

    match try_atomic_move(src, dst) {
        Ok(()) => {
            info!(src = %src.display(), dest = %dst.display(), "Renamed file atomically");
            Ok(())
        }
        Err(e) if is_cross_device(&e) => {
            warn!(error = %e, "Atomic rename failed across filesystems, using staged copy");
            let bytes = staged_copy(src, dst, overwrite)?;
            fs::remove_file(src).map_err(|e| Error::io("remove original file", src, e))?;
            info!(src = %src.display(), dest = %dst.display(), bytes, "Moved file by copy");
            Ok(())
        }
        Err(e) => Err(Error::io("move file", src, e)),
    }
}

/// Rename `src` to `dst` in a single rename call.
pub fn rename(src: impl AsRef<Path>, dst: impl AsRef<Path>, overwrite: bool) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    if let Err(e) = check_transfer(src, dst, overwrite) {
        warn!(code = e.code(), src = %src.display(), dest = %dst.display(), "Rename refused");
        return Err(e);
    }

    try_atomic_move(src, dst).map_err(|e| Error::io("rename", src, e))?;
    info!(src = %src.display(), dest = %dst.display(), "Renamed file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn move_file_success() {
        let temp = assert_fs::TempDir::new().unwrap();
        let incoming = temp.child("incoming");
        incoming.create_dir_all().unwrap();
        let source = incoming.child("a.txt");
        source.write_str("hello").unwrap();
        let completed = temp.child("completed");
        completed.create_dir_all().unwrap();
        let dest = completed.child("a.txt");

        move_file(source.path(), dest.path(), false).expect("move_file should succeed");

        dest.assert("hello");
        assert!(!source.path().exists());
    }

    #[test]
    fn move_refuses_existing_destination() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("a.txt");
        source.write_str("new").unwrap();
        let dest = temp.child("b.txt");
        dest.write_str("old").unwrap();

        let err = move_file(source.path(), dest.path(), false).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        dest.assert("old");
        source.assert("new");
    }

    #[test]
    fn rename_with_overwrite_replaces() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("a.txt");
        source.write_str("new").unwrap();
        let dest = temp.child("b.txt");
        dest.write_str("old").unwrap();

        rename(source.path(), dest.path(), true).unwrap();
        dest.assert("new");
        assert!(!source.path().exists());
    }

    #[test]
    fn rename_missing_source() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = rename(temp.child("ghost").path(), temp.child("x").path(), false).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn rename_into_missing_directory_surfaces_io_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("a.txt");
        file.touch().unwrap();
        let err = rename(file.path(), temp.child("no/such/b.txt").path(), false).unwrap_err();
        match err {
            Error::Io { source, .. } => assert_eq!(source.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(file.path().exists());
    }
}
