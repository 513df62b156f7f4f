//! FTP client: one optional session per client, explicit connect/disconnect.

mod client;
mod session;

pub use client::{ANONYMOUS_PASSWORD, ANONYMOUS_USER, FtpClient};
pub use session::{Connector, Session, StreamConnector};
