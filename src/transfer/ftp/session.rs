//! FTP session seam.
//!
//! `Session` is the handful of commands the client issues; `Connector` opens
//! one. The default pair is backed by `suppaftp::FtpStream`, and tests plug in
//! scripted fakes. Reply codes are kept intact in `Error::ProtocolError` so the
//! client can tell a 550 from everything else.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpResult, FtpStream};
use tracing::debug;

use crate::errors::{Error, Result};
use crate::transfer::endpoint::Endpoint;

/// An open, possibly authenticated, FTP control connection.
pub trait Session {
    /// Authenticate and switch to binary transfers.
    fn login(&mut self, user: &str, password: &str) -> Result<()>;
    fn noop(&mut self) -> Result<()>;
    fn pwd(&mut self) -> Result<String>;
    fn cwd(&mut self, path: &str) -> Result<()>;
    fn size(&mut self, path: &str) -> Result<u64>;
    fn nlst(&mut self, path: &str) -> Result<Vec<String>>;
    /// `RETR path`, streaming the data connection into `sink`.
    fn retrieve(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64>;
    /// `STOR path`, streaming `source` over the data connection.
    fn store(&mut self, path: &str, source: &mut dyn Read) -> Result<u64>;
    fn quit(&mut self) -> Result<()>;
}

/// Opens sessions for a client.
pub trait Connector {
    type Session: Session;

    /// Open the control connection, giving up after `timeout`.
    fn connect(&self, endpoint: &Endpoint, timeout: Duration) -> Result<Self::Session>;
}

/// Connector backed by a plain-text `suppaftp::FtpStream`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamConnector;

impl Connector for StreamConnector {
    type Session = FtpStream;

    fn connect(&self, endpoint: &Endpoint, timeout: Duration) -> Result<FtpStream> {
        let addrs = (endpoint.host(), endpoint.port())
            .to_socket_addrs()
            .map_err(|e| Error::transport(format!("resolve {endpoint}"), e))?;

        let mut last_err = None;
        for addr in addrs {
            debug!(%addr, ?timeout, "Opening FTP control connection");
            match open_control(addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }

        Err(match last_err {
            Some(e) => map_ftp_error(&format!("connect {endpoint}"), e),
            None => Error::transport(
                format!("resolve {endpoint}"),
                io::Error::new(io::ErrorKind::NotFound, "no addresses found"),
            ),
        })
    }
}

/// TCP connect bounded by `timeout`; control-channel reads, the greeting
/// included, share the same bound.
fn open_control(addr: SocketAddr, timeout: Duration) -> FtpResult<FtpStream> {
    let stream = TcpStream::connect_timeout(&addr, timeout).map_err(FtpError::ConnectionError)?;
    stream
        .set_read_timeout(Some(timeout))
        .map_err(FtpError::ConnectionError)?;
    FtpStream::connect_with_stream(stream)
}

impl Session for FtpStream {
    fn login(&mut self, user: &str, password: &str) -> Result<()> {
        FtpStream::login(self, user, password).map_err(|e| map_ftp_error("USER/PASS", e))?;
        self.transfer_type(FileType::Binary)
            .map_err(|e| map_ftp_error("TYPE I", e))
    }

    fn noop(&mut self) -> Result<()> {
        FtpStream::noop(self).map_err(|e| map_ftp_error("NOOP", e))
    }

    fn pwd(&mut self) -> Result<String> {
        FtpStream::pwd(self).map_err(|e| map_ftp_error("PWD", e))
    }

    fn cwd(&mut self, path: &str) -> Result<()> {
        FtpStream::cwd(self, path).map_err(|e| map_ftp_error("CWD", e))
    }

    fn size(&mut self, path: &str) -> Result<u64> {
        FtpStream::size(self, path)
            .map(|n| n as u64)
            .map_err(|e| map_ftp_error("SIZE", e))
    }

    fn nlst(&mut self, path: &str) -> Result<Vec<String>> {
        FtpStream::nlst(self, Some(path)).map_err(|e| map_ftp_error("NLST", e))
    }

    fn retrieve(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64> {
        self.retr(path, |reader| {
            io::copy(reader, &mut *sink).map_err(FtpError::ConnectionError)
        })
        .map_err(|e| map_ftp_error("RETR", e))
    }

    fn store(&mut self, path: &str, mut source: &mut dyn Read) -> Result<u64> {
        self.put_file(path, &mut source)
            .map_err(|e| map_ftp_error("STOR", e))
    }

    fn quit(&mut self) -> Result<()> {
        FtpStream::quit(self).map_err(|e| map_ftp_error("QUIT", e))
    }
}

/// Keep server replies as `ProtocolError` with their numeric code; everything
/// else is a transport failure.
fn map_ftp_error(context: &str, err: FtpError) -> Error {
    let message = err.to_string();
    match err {
        FtpError::UnexpectedResponse(ref resp) => Error::ProtocolError {
            code: resp.status.code(),
            message: format!("{context}: {message}"),
        },
        FtpError::ConnectionError(io) => Error::transport(context, io),
        other => Error::transport(context, other),
    }
}
