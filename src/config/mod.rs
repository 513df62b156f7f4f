//! Config module.
//! Option types for the transfer clients and the log level used by the binary.
//! Everything lives in memory; nothing is read from files or the environment.

pub mod types;

pub use types::{FtpOptions, HttpOptions, LogLevel};

use std::time::Duration;

/// FTP control connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// HTTP connect and inactivity timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Streaming read size for HTTP downloads.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;
pub const DEFAULT_USER_AGENT: &str = concat!("drowsy/", env!("CARGO_PKG_VERSION"));
