//! Typed error definitions for drowsy.
//! One enum covers local file operations and both transfer clients; `ErrorKind`
//! and `Status` give callers a cheap, comparable view of a failure.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::describe_io_error;

/// Reply code an FTP server sends when the requested file or directory is unavailable.
pub const FTP_FILE_UNAVAILABLE: u32 = 550;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("no active session")]
    NotConnected,

    #[error("cannot connect to {endpoint}: {reason}")]
    ConnectionFailure { endpoint: String, reason: String },

    #[error("login rejected for '{user}': {reason}")]
    AuthenticationFailure { user: String, reason: String },

    #[error("remote error {code}: {message}")]
    ProtocolError { code: u32, message: String },

    #[error("{context}: {source}")]
    TransportError {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{}", describe_io_error(op, path, source))]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Coarse classification of an [`Error`], stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingArgument,
    InvalidEndpoint,
    AlreadyExists,
    NotFound,
    NotConnected,
    ConnectionFailure,
    AuthenticationFailure,
    ProtocolError,
    TransportError,
    Io,
}

impl Error {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn transport(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::TransportError {
            context: context.into(),
            source: Box::new(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingArgument(_) => ErrorKind::MissingArgument,
            Error::InvalidEndpoint(_) => ErrorKind::InvalidEndpoint,
            Error::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::NotConnected => ErrorKind::NotConnected,
            Error::ConnectionFailure { .. } => ErrorKind::ConnectionFailure,
            Error::AuthenticationFailure { .. } => ErrorKind::AuthenticationFailure,
            Error::ProtocolError { .. } => ErrorKind::ProtocolError,
            Error::TransportError { .. } => ErrorKind::TransportError,
            Error::Io { .. } => ErrorKind::Io,
        }
    }

    /// Short machine-friendly code for structured logs.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::MissingArgument => "missing_argument",
            ErrorKind::InvalidEndpoint => "invalid_endpoint",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::NotFound => "not_found",
            ErrorKind::NotConnected => "not_connected",
            ErrorKind::ConnectionFailure => "connection_failure",
            ErrorKind::AuthenticationFailure => "authentication_failure",
            ErrorKind::ProtocolError => "protocol_error",
            ErrorKind::TransportError => "transport_error",
            ErrorKind::Io => "io",
        }
    }

    /// True for an FTP `550` reply, the only reply treated as "resource missing".
    pub fn is_not_found_reply(&self) -> bool {
        matches!(self, Error::ProtocolError { code, .. } if *code == FTP_FILE_UNAVAILABLE)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Result of a remote existence probe.
///
/// `Unknown` carries the failure that kept the probe from answering, so a
/// dropped connection is never mistaken for "exists".
#[derive(Debug)]
pub enum Presence {
    Exists,
    NotFound,
    Unknown(Error),
}

impl Presence {
    /// Classify the outcome of a probing command.
    pub(crate) fn from_probe<T>(result: Result<T>) -> Self {
        match result {
            Ok(_) => Presence::Exists,
            Err(e) if e.is_not_found_reply() => Presence::NotFound,
            Err(e) => Presence::Unknown(e),
        }
    }

    pub fn exists(&self) -> bool {
        matches!(self, Presence::Exists)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Presence::NotFound)
    }
}

/// Boolean view of an operation for call sites that only need "did it work".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub ok: bool,
    pub kind: Option<ErrorKind>,
    pub message: String,
}

impl<T> From<&Result<T>> for Status {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Status {
                ok: true,
                kind: None,
                message: String::from("ok"),
            },
            Err(e) => Status {
                ok: false,
                kind: Some(e.kind()),
                message: e.to_string(),
            },
        }
    }
}

impl From<&Presence> for Status {
    fn from(presence: &Presence) -> Self {
        match presence {
            Presence::Exists => Status {
                ok: true,
                kind: None,
                message: String::from("exists"),
            },
            Presence::NotFound => Status {
                ok: false,
                kind: Some(ErrorKind::NotFound),
                message: String::from("not found"),
            },
            Presence::Unknown(e) => Status {
                ok: false,
                kind: Some(e.kind()),
                message: e.to_string(),
            },
        }
    }
}
