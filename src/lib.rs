//! Core library for `drowsy`.
//!
//! Overwrite-safe local file operations plus small FTP and HTTP clients that
//! share one download contract: bytes land in a staging file beside the
//! destination and are renamed into place only after the transfer completed.
//!
//! Every fallible operation returns [`Result`]; [`Status`] gives the plain
//! boolean view when that is all a caller needs.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod transfer;

pub use config::{FtpOptions, HttpOptions, LogLevel};
pub use errors::{Error, ErrorKind, Presence, Result, Status};
pub use fs_ops::{copy, make_dir, make_dirs, move_file, remove, rename, touch};
pub use transfer::{Credentials, Endpoint, FtpClient, HttpClient};
