//! Stateful FTP client.
//!
//! The client owns at most one session. `connect` fills the slot, `disconnect`
//! (or dropping the client) empties it with a best-effort `QUIT`. Every remote
//! operation first proves the session is alive with `NOOP`; a dead session is
//! reported, never silently replaced.

use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

use super::session::{Connector, Session, StreamConnector};
use crate::config::FtpOptions;
use crate::errors::{Error, Presence, Result};
use crate::fs_ops::{StagedFile, is_present, require_path};
use crate::transfer::endpoint::{Credentials, DEFAULT_FTP_PORT, Endpoint};

pub const ANONYMOUS_USER: &str = "anonymous";
pub const ANONYMOUS_PASSWORD: &str = "anonymous@";

pub struct FtpClient<C: Connector = StreamConnector> {
    endpoint: Endpoint,
    credentials: Option<Credentials>,
    options: FtpOptions,
    connector: C,
    session: Option<C::Session>,
}

impl FtpClient<StreamConnector> {
    /// Validate the endpoint and credentials without connecting.
    ///
    /// `host` may embed a port (`"host:2121"`); otherwise `port` or 21 is used.
    /// Username and password must be given together or not at all.
    pub fn new(
        host: &str,
        port: Option<u16>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self> {
        Self::with_options(host, port, username, password, FtpOptions::default())
    }

    pub fn with_options(
        host: &str,
        port: Option<u16>,
        username: Option<&str>,
        password: Option<&str>,
        options: FtpOptions,
    ) -> Result<Self> {
        let endpoint = Endpoint::parse(host, port, DEFAULT_FTP_PORT)?;
        let credentials = Credentials::from_parts(username, password)?;
        Ok(Self::with_connector(endpoint, credentials, options, StreamConnector))
    }
}

impl<C: Connector> FtpClient<C> {
    pub fn with_connector(
        endpoint: Endpoint,
        credentials: Option<Credentials>,
        options: FtpOptions,
        connector: C,
    ) -> Self {
        Self {
            endpoint,
            credentials,
            options,
            connector,
            session: None,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Whether a session handle is held. Says nothing about liveness; see
    /// [`check_connection`](Self::check_connection).
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Open the control connection and log in.
    ///
    /// The client is connected only if both steps succeed. A session that is
    /// already held is closed first.
    pub fn connect(&mut self) -> Result<()> {
        if let Some(mut previous) = self.session.take() {
            debug!(endpoint = %self.endpoint, "Closing previous session before reconnecting");
            let _ = previous.quit();
        }

        let mut session = self
            .connector
            .connect(&self.endpoint, self.options.connect_timeout)
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, "FTP connect failed");
                Error::ConnectionFailure {
                    endpoint: self.endpoint.to_string(),
                    reason: e.to_string(),
                }
            })?;
        info!(host = self.endpoint.host(), port = self.endpoint.port(), "Connected to FTP server");

        let (user, password) = match &self.credentials {
            Some(c) => (c.username(), c.password()),
            None => (ANONYMOUS_USER, ANONYMOUS_PASSWORD),
        };
        if let Err(e) = session.login(user, password) {
            warn!(user, error = %e, "FTP login failed");
            let _ = session.quit();
            return Err(Error::AuthenticationFailure {
                user: user.to_string(),
                reason: e.to_string(),
            });
        }
        info!(user, "Logged in to FTP server");

        self.session = Some(session);
        Ok(())
    }

    /// Send `NOOP` on the held session. False when there is no session or the
    /// probe fails; the session slot is left as it was either way.
    pub fn check_connection(&mut self) -> bool {
        match self.live_session().map(|_| ()) {
            Ok(()) => {
                debug!(endpoint = %self.endpoint, "FTP session alive");
                true
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, code = e.code(), error = %e, "FTP session not usable");
                false
            }
        }
    }

    /// Close the session with `QUIT`. The handle is released even if `QUIT`
    /// fails. Returns `NotConnected` when there was nothing to close.
    pub fn disconnect(&mut self) -> Result<()> {
        let Some(mut session) = self.session.take() else {
            warn!(endpoint = %self.endpoint, "No FTP session to close");
            return Err(Error::NotConnected);
        };
        match session.quit() {
            Ok(()) => info!(endpoint = %self.endpoint, "Disconnected from FTP server"),
            Err(e) => warn!(endpoint = %self.endpoint, error = %e, "QUIT failed; session released anyway"),
        }
        Ok(())
    }

    /// Probe a remote directory with `CWD`, restoring the previous working
    /// directory afterwards when `PWD` reported one.
    pub fn check_directory(&mut self, directory: &str) -> Presence {
        if directory.is_empty() {
            return Presence::Unknown(Error::MissingArgument("directory"));
        }
        let session = match self.live_session() {
            Ok(s) => s,
            Err(e) => return Presence::Unknown(e),
        };

        let previous = session
            .pwd()
            .inspect_err(|e| debug!(error = %e, "PWD failed before directory probe"))
            .ok();
        let presence = Presence::from_probe(session.cwd(directory));
        if presence.exists() {
            match previous {
                Some(dir) => {
                    let _ = session.cwd(&dir);
                }
                None => warn!(directory, "Working directory left at probed directory; PWD was unavailable"),
            }
        }
        log_presence("directory", directory, &presence);
        presence
    }

    /// Probe a remote file with `SIZE`.
    pub fn check_file_path(&mut self, file_path: &str) -> Presence {
        if file_path.is_empty() {
            return Presence::Unknown(Error::MissingArgument("file_path"));
        }
        let presence = match self.live_session() {
            Ok(session) => Presence::from_probe(session.size(file_path)),
            Err(e) => Presence::Unknown(e),
        };
        log_presence("file", file_path, &presence);
        presence
    }

    /// Raw `NLST` names. An `Ok` empty vector is a genuinely empty directory.
    pub fn list_directory(&mut self, directory: &str) -> Result<Vec<String>> {
        if directory.is_empty() {
            return Err(Error::MissingArgument("directory"));
        }
        let names = self.live_session()?.nlst(directory).inspect_err(|e| {
            warn!(directory, error = %e, "NLST failed");
        })?;
        info!(directory, entries = names.len(), "Listed remote directory");
        Ok(names)
    }

    /// Download `source` into the local `destination`.
    ///
    /// Bytes land in a staging file beside `destination`, which is renamed into
    /// place only after `RETR` completes. On any failure the staging file is
    /// removed and `destination` is untouched. Returns bytes received.
    pub fn download(
        &mut self,
        source: &str,
        destination: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<u64> {
        let destination = destination.as_ref();
        if source.is_empty() {
            return Err(Error::MissingArgument("source"));
        }
        require_path(destination, "destination")?;

        let session = self.live_session()?;
        if !overwrite && is_present(destination) {
            warn!(dest = %destination.display(), "Download refused: destination exists");
            return Err(Error::AlreadyExists(destination.display().to_string()));
        }

        let mut staged = StagedFile::create(destination)?;
        let bytes = session
            .retrieve(source, staged.as_file_mut())
            .map_err(|e| match e {
                e if e.is_not_found_reply() => Error::NotFound(source.to_string()),
                e => e,
            })
            .inspect_err(|e| warn!(src = source, error = %e, "RETR failed"))?;
        staged.commit(overwrite)?;

        info!(src = source, dest = %destination.display(), bytes, "Downloaded file");
        Ok(bytes)
    }

    /// Upload the local `source` to the remote `destination` with `STOR`.
    ///
    /// Without `overwrite` the remote path must be confirmed absent first; an
    /// inconclusive probe refuses the upload. The remote side has no staging,
    /// so a failed transfer may leave a partial remote file.
    pub fn upload(
        &mut self,
        source: impl AsRef<Path>,
        destination: &str,
        overwrite: bool,
    ) -> Result<u64> {
        let source = source.as_ref();
        require_path(source, "source")?;
        if destination.is_empty() {
            return Err(Error::MissingArgument("destination"));
        }

        self.live_session()?;
        if !is_present(source) {
            return Err(Error::NotFound(source.display().to_string()));
        }
        if !overwrite {
            match self.check_file_path(destination) {
                Presence::NotFound => {}
                Presence::Exists => {
                    warn!(dest = destination, "Upload refused: remote file exists");
                    return Err(Error::AlreadyExists(destination.to_string()));
                }
                Presence::Unknown(e) => return Err(e),
            }
        }

        let mut file = File::open(source).map_err(|e| Error::io("open source", source, e))?;
        let session = self.session.as_mut().ok_or(Error::NotConnected)?;
        let bytes = session
            .store(destination, &mut file)
            .inspect_err(|e| warn!(dest = destination, error = %e, "STOR failed"))?;

        info!(src = %source.display(), dest = destination, bytes, "Uploaded file");
        Ok(bytes)
    }

    fn live_session(&mut self) -> Result<&mut C::Session> {
        let session = self.session.as_mut().ok_or(Error::NotConnected)?;
        session.noop()?;
        Ok(session)
    }
}

impl<C: Connector> Drop for FtpClient<C> {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            let _ = session.quit();
        }
    }
}

fn log_presence(what: &str, path: &str, presence: &Presence) {
    match presence {
        Presence::Exists => debug!(what, path, "Remote path exists"),
        Presence::NotFound => debug!(what, path, "Remote path not found (550)"),
        Presence::Unknown(e) => warn!(what, path, code = e.code(), error = %e, "Remote existence unknown"),
    }
}
