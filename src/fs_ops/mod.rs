//! Local file operations.
//!
//! Every operation checks an explicit existence precondition first and then
//! performs at most one visible change. Writes that replace content go through
//! a staging file and a rename, so a destination is never half-written.

mod atomic;
mod copy;
mod dir_create;
mod entry;
mod file_move;
mod helpers;
mod io_copy;
mod staging;
mod util;

pub use copy::copy;
pub use dir_create::{make_dir, make_dirs};
pub use entry::{remove, touch};
pub use file_move::{move_file, rename};
pub use io_copy::copy_chunked;
pub use staging::StagedFile;
pub use util::{STAGING_PREFIX, STAGING_SUFFIX};

pub(crate) use helpers::describe_io_error;
pub(crate) use util::{is_present, require_path};
