//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - Logging flags are global and may appear before or after the subcommand.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::types::{FtpOptions, HttpOptions, LogLevel};

/// Command-line driver for the drowsy library.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Overwrite-safe file operations and FTP/HTTP transfers"
)]
pub struct Args {
    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        global = true,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Also append logs to this file.
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create an empty file; fails if it exists
    Touch {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Delete a file
    Rm {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Copy a file through a staging file
    Cp {
        #[command(flatten)]
        paths: LocalTransfer,
    },
    /// Move a file, copying across filesystems when needed
    Mv {
        #[command(flatten)]
        paths: LocalTransfer,
    },
    /// Rename a file within one filesystem
    Rename {
        #[command(flatten)]
        paths: LocalTransfer,
    },
    /// Create directories (with parents), in order
    Mkdir {
        #[arg(required = true, value_hint = ValueHint::DirPath)]
        paths: Vec<PathBuf>,
        /// Do not fail when a directory already exists
        #[arg(short = 'p', long)]
        exist_ok: bool,
    },
    /// List a remote directory (NLST)
    FtpLs {
        #[command(flatten)]
        ftp: FtpArgs,
        directory: String,
    },
    /// Download a remote file
    FtpGet {
        #[command(flatten)]
        ftp: FtpArgs,
        source: String,
        #[arg(value_hint = ValueHint::FilePath)]
        destination: PathBuf,
        #[arg(short = 'f', long)]
        overwrite: bool,
    },
    /// Upload a local file
    FtpPut {
        #[command(flatten)]
        ftp: FtpArgs,
        #[arg(value_hint = ValueHint::FilePath)]
        source: PathBuf,
        destination: String,
        #[arg(short = 'f', long)]
        overwrite: bool,
    },
    /// Check whether a remote file (or, with --dir, directory) exists
    FtpCheck {
        #[command(flatten)]
        ftp: FtpArgs,
        path: String,
        #[arg(long)]
        dir: bool,
    },
    /// HEAD a URL; succeeds on any 2xx answer
    HttpCheck {
        #[command(flatten)]
        http: HttpArgs,
        url: String,
    },
    /// List links on a page whose path ends with the given extension
    HttpSearch {
        #[command(flatten)]
        http: HttpArgs,
        url: String,
        extension: String,
    },
    /// Download a URL
    HttpGet {
        #[command(flatten)]
        http: HttpArgs,
        url: String,
        #[arg(value_hint = ValueHint::FilePath)]
        destination: PathBuf,
        #[arg(short = 'f', long)]
        overwrite: bool,
    },
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Touch { .. } => "touch",
            Command::Rm { .. } => "rm",
            Command::Cp { .. } => "cp",
            Command::Mv { .. } => "mv",
            Command::Rename { .. } => "rename",
            Command::Mkdir { .. } => "mkdir",
            Command::FtpLs { .. } => "ftp-ls",
            Command::FtpGet { .. } => "ftp-get",
            Command::FtpPut { .. } => "ftp-put",
            Command::FtpCheck { .. } => "ftp-check",
            Command::HttpCheck { .. } => "http-check",
            Command::HttpSearch { .. } => "http-search",
            Command::HttpGet { .. } => "http-get",
        }
    }
}

/// Source/destination pair shared by cp, mv and rename.
#[derive(clap::Args, Debug, Clone)]
pub struct LocalTransfer {
    #[arg(value_hint = ValueHint::AnyPath)]
    pub source: PathBuf,
    #[arg(value_hint = ValueHint::AnyPath)]
    pub destination: PathBuf,
    /// Replace the destination if it exists
    #[arg(short = 'f', long)]
    pub overwrite: bool,
}

#[derive(clap::Args, Clone)]
pub struct FtpArgs {
    /// Server address; may carry a port ("host:2121")
    #[arg(long, value_hint = ValueHint::Hostname)]
    pub host: String,
    #[arg(long)]
    pub port: Option<u16>,
    /// Login name; anonymous when omitted
    #[arg(short = 'u', long, requires = "password")]
    pub user: Option<String>,
    #[arg(long, requires = "user")]
    pub password: Option<String>,
    /// Connect timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,
}

impl FtpArgs {
    pub fn options(&self) -> FtpOptions {
        FtpOptions::default().connect_timeout(Duration::from_secs(self.timeout))
    }
}

// Keep the password out of `{:?}` output.
impl std::fmt::Debug for FtpArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FtpArgs")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct HttpArgs {
    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,
    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,
}

impl HttpArgs {
    pub fn options(&self) -> HttpOptions {
        HttpOptions::default()
            .timeout(Duration::from_secs(self.timeout))
            .danger_accept_invalid_certs(self.insecure)
    }
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (caller default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }
}

pub fn parse() -> Args {
    Args::parse()
}
