#![allow(dead_code)]

//! Shared helpers for integration tests: an in-memory FTP server behind the
//! client's `Connector` seam, plus staging-file inspection.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use drowsy::fs_ops::{STAGING_PREFIX, STAGING_SUFFIX};
use drowsy::transfer::Endpoint;
use drowsy::transfer::ftp::{Connector, Session};
use drowsy::{Error, FtpClient, FtpOptions, Result};

/// Scripted server state. Tests flip the failure switches before acting.
#[derive(Default)]
pub struct ServerState {
    pub files: BTreeMap<String, Vec<u8>>,
    pub dirs: BTreeSet<String>,
    pub cwd: String,
    pub refuse_connect: bool,
    pub reject_login: bool,
    pub noop_fails: bool,
    pub pwd_fails: bool,
    /// Reply code every SIZE returns instead of looking the file up
    pub size_reply: Option<u32>,
    /// Abort RETR with 426 after this many bytes reached the sink
    pub fail_retr_after: Option<usize>,
    pub logins: Vec<(String, String)>,
    pub quits: usize,
}

#[derive(Clone)]
pub struct FakeServer(Arc<Mutex<ServerState>>);

impl FakeServer {
    pub fn new() -> Self {
        let state = ServerState {
            cwd: "/".to_string(),
            dirs: BTreeSet::from(["/".to_string()]),
            ..ServerState::default()
        };
        Self(Arc::new(Mutex::new(state)))
    }

    pub fn state(&self) -> MutexGuard<'_, ServerState> {
        self.0.lock().unwrap()
    }

    pub fn with_dir(self, path: &str) -> Self {
        self.state().dirs.insert(path.to_string());
        self
    }

    pub fn with_file(self, path: &str, bytes: &[u8]) -> Self {
        self.state().files.insert(path.to_string(), bytes.to_vec());
        self
    }

    /// Anonymous client pointed at this server; not yet connected.
    pub fn client(&self) -> FtpClient<FakeServer> {
        let endpoint = Endpoint::parse("ftp.test", None, 21).unwrap();
        FtpClient::with_connector(endpoint, None, FtpOptions::default(), self.clone())
    }
}

pub struct FakeSession(Arc<Mutex<ServerState>>);

impl Connector for FakeServer {
    type Session = FakeSession;

    fn connect(&self, _endpoint: &Endpoint, _timeout: Duration) -> Result<FakeSession> {
        if self.state().refuse_connect {
            return Err(reply(421, "Service not available"));
        }
        Ok(FakeSession(Arc::clone(&self.0)))
    }
}

fn reply(code: u32, message: &str) -> Error {
    Error::ProtocolError {
        code,
        message: message.to_string(),
    }
}

fn resolve(cwd: &str, path: &str) -> String {
    let joined = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("{}/{}", cwd.trim_end_matches('/'), path)
    };
    match joined.trim_end_matches('/') {
        "" => "/".to_string(),
        p => p.to_string(),
    }
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => "/",
    }
}

fn write_data(sink: &mut dyn Write, bytes: &[u8]) -> Result<()> {
    sink.write_all(bytes).map_err(|e| reply(451, &e.to_string()))
}

impl FakeSession {
    fn state(&self) -> MutexGuard<'_, ServerState> {
        self.0.lock().unwrap()
    }
}

impl Session for FakeSession {
    fn login(&mut self, user: &str, password: &str) -> Result<()> {
        let mut st = self.state();
        if st.reject_login {
            return Err(reply(530, "Login incorrect"));
        }
        st.logins.push((user.to_string(), password.to_string()));
        Ok(())
    }

    fn noop(&mut self) -> Result<()> {
        if self.state().noop_fails {
            return Err(reply(421, "Idle timeout"));
        }
        Ok(())
    }

    fn pwd(&mut self) -> Result<String> {
        let st = self.state();
        if st.pwd_fails {
            return Err(reply(502, "PWD not implemented"));
        }
        Ok(st.cwd.clone())
    }

    fn cwd(&mut self, path: &str) -> Result<()> {
        let mut st = self.state();
        let target = resolve(&st.cwd, path);
        if !st.dirs.contains(&target) {
            return Err(reply(550, "No such directory"));
        }
        st.cwd = target;
        Ok(())
    }

    fn size(&mut self, path: &str) -> Result<u64> {
        let st = self.state();
        if let Some(code) = st.size_reply {
            return Err(reply(code, "SIZE refused"));
        }
        st.files
            .get(&resolve(&st.cwd, path))
            .map(|b| b.len() as u64)
            .ok_or_else(|| reply(550, "No such file"))
    }

    fn nlst(&mut self, path: &str) -> Result<Vec<String>> {
        let st = self.state();
        let dir = resolve(&st.cwd, path);
        if !st.dirs.contains(&dir) {
            return Err(reply(550, "No such directory"));
        }
        let children = st
            .files
            .keys()
            .chain(st.dirs.iter().filter(|d| d.as_str() != "/"))
            .filter(|p| parent_of(p) == dir)
            .map(|p| p.rsplit('/').next().unwrap_or_default().to_string())
            .collect();
        Ok(children)
    }

    fn retrieve(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64> {
        let (data, fail_after) = {
            let st = self.state();
            let data = st
                .files
                .get(&resolve(&st.cwd, path))
                .cloned()
                .ok_or_else(|| reply(550, "No such file"))?;
            (data, st.fail_retr_after)
        };
        if let Some(n) = fail_after {
            write_data(sink, &data[..n.min(data.len())])?;
            return Err(reply(426, "Connection closed; transfer aborted"));
        }
        write_data(sink, &data)?;
        Ok(data.len() as u64)
    }

    fn store(&mut self, path: &str, source: &mut dyn Read) -> Result<u64> {
        let mut buf = Vec::new();
        source
            .read_to_end(&mut buf)
            .map_err(|e| reply(451, &e.to_string()))?;
        let mut st = self.state();
        let target = resolve(&st.cwd, path);
        let len = buf.len() as u64;
        st.files.insert(target, buf);
        Ok(len)
    }

    fn quit(&mut self) -> Result<()> {
        self.state().quits += 1;
        Ok(())
    }
}

/// Names of staging files left in `dir`.
pub fn staging_leftovers(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .expect("list dir")
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with(STAGING_PREFIX) && n.ends_with(STAGING_SUFFIX))
        .collect()
}
