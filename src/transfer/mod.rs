//! Remote transfers over FTP and HTTP.
//!
//! Both clients share the download contract of the local file operations:
//! bytes are staged beside the destination and renamed into place only after
//! the transfer completes.

pub mod endpoint;
pub mod ftp;
pub mod http;

pub use endpoint::{Credentials, DEFAULT_FTP_PORT, Endpoint};
pub use ftp::FtpClient;
pub use http::HttpClient;
