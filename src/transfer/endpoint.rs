//! Remote endpoint and login credentials, both validated at construction.

use std::fmt;

use crate::errors::{Error, Result};

pub const DEFAULT_FTP_PORT: u16 = 21;

/// Host/port pair of a remote server. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Build an endpoint from `address`, which may carry its own port
    /// (`"host:2121"`, `"[::1]:2121"`). An embedded port wins over `port`;
    /// with neither, `default_port` is used.
    pub fn parse(address: &str, port: Option<u16>, default_port: u16) -> Result<Self> {
        let address = address.trim();
        if address.is_empty() {
            return Err(Error::MissingArgument("host"));
        }

        let (host, embedded) = split_host_port(address)?;
        if host.is_empty() {
            return Err(Error::MissingArgument("host"));
        }

        Ok(Self {
            host: host.to_string(),
            port: embedded.or(port).unwrap_or(default_port),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

fn split_host_port(address: &str) -> Result<(&str, Option<u16>)> {
    let invalid = || Error::InvalidEndpoint(address.to_string());

    if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
        return match tail {
            "" => Ok((host, None)),
            _ => {
                let port = tail.strip_prefix(':').ok_or_else(invalid)?;
                Ok((host, Some(port.parse().map_err(|_| invalid())?)))
            }
        };
    }

    match address.split_once(':') {
        // Bare IPv6 literal: more than one colon and no brackets.
        Some((_, rest)) if rest.contains(':') => Ok((address, None)),
        Some((host, port)) => Ok((host, Some(port.parse().map_err(|_| invalid())?))),
        None => Ok((address, None)),
    }
}

/// Username and password. Either both are given or neither is.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `None` for anonymous access; `MissingArgument` when only one half is given.
    pub fn from_parts(username: Option<&str>, password: Option<&str>) -> Result<Option<Self>> {
        match (username, password) {
            (Some(u), Some(p)) => Ok(Some(Self::new(u, p))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(Error::MissingArgument("password")),
            (None, Some(_)) => Err(Error::MissingArgument("username")),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
