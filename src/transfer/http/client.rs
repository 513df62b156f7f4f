//! Blocking HTTP client.
//!
//! One `reqwest::blocking::Client` is built per `HttpClient` from its options.
//! The configured timeout bounds connecting, waiting for response headers and
//! each individual body read, never the whole transfer: a slow download keeps
//! going as long as bytes keep arriving. Certificate verification is on unless
//! the options opt out.

use std::path::Path;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use tracing::{debug, info, warn};
use url::Url;

use super::links::links_with_extension;
use crate::config::HttpOptions;
use crate::errors::{Error, Result};
use crate::fs_ops::{StagedFile, is_present, require_path};

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    options: HttpOptions,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_options(HttpOptions::default())
    }

    pub fn with_options(options: HttpOptions) -> Result<Self> {
        if options.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for this client");
        }
        let client = Client::builder()
            .connect_timeout(options.timeout)
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .user_agent(options.user_agent.clone())
            .build()
            .map_err(|e| Error::transport("build HTTP client", e))?;
        Ok(Self { client, options })
    }

    pub fn options(&self) -> &HttpOptions {
        &self.options
    }

    /// `HEAD url`; Ok only for a 2xx answer.
    pub fn check_url(&self, url: &str) -> Result<()> {
        let url = parse_url(url)?;
        let response = self.send_head(&url)?;
        ensure_success("HEAD", &url, &response).inspect_err(|e| {
            warn!(%url, code = e.code(), error = %e, "URL check failed");
        })?;
        debug!(%url, status = %response.status(), "URL reachable");
        Ok(())
    }

    /// Fetch the listing page at `base_url` and return absolute URLs of the
    /// links whose path ends with `.extension`.
    ///
    /// A 404 or any other non-success page yields an empty list; transport
    /// failures are errors.
    pub fn search(&self, base_url: &str, extension: &str) -> Result<Vec<String>> {
        let base = parse_url(base_url)?;
        if extension.trim_start_matches('.').is_empty() {
            return Err(Error::MissingArgument("extension"));
        }

        let response = self.send_get(&base)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!(url = %base, "Listing page not found");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            warn!(url = %base, %status, "Listing page request failed");
            return Ok(Vec::new());
        }

        // Resolve against the final URL in case the server redirected.
        let page_url = response.url().clone();
        let body = response
            .text()
            .map_err(|e| Error::transport(format!("read {page_url}"), e))?;
        let links = links_with_extension(&page_url, &body, extension);
        info!(url = %page_url, extension, matches = links.len(), "Searched listing page");
        Ok(links)
    }

    /// Download `source` into `destination` through a staging file.
    ///
    /// The body is streamed in `chunk_size` pieces; the staging file is renamed
    /// onto `destination` only after the whole body arrived. Returns bytes
    /// written.
    pub fn download(
        &self,
        source: &str,
        destination: impl AsRef<Path>,
        overwrite: bool,
    ) -> Result<u64> {
        let destination = destination.as_ref();
        if source.is_empty() {
            return Err(Error::MissingArgument("source"));
        }
        require_path(destination, "destination")?;
        let url = parse_url(source)?;

        if !overwrite && is_present(destination) {
            warn!(dest = %destination.display(), "Download refused: destination exists");
            return Err(Error::AlreadyExists(destination.display().to_string()));
        }

        let mut response = self.send_get(&url)?;
        ensure_success("GET", &url, &response).inspect_err(|e| {
            warn!(%url, code = e.code(), error = %e, "Download request failed");
        })?;

        let mut staged = StagedFile::create(destination)?;
        let bytes = staged
            .write_from(&mut response, self.options.chunk_size)
            .map_err(|e| Error::transport(format!("GET {url}"), e))
            .inspect_err(|e| warn!(%url, error = %e, "Download interrupted"))?;
        staged.commit(overwrite)?;

        info!(src = %url, dest = %destination.display(), bytes, "Downloaded file");
        Ok(bytes)
    }

    fn send_head(&self, url: &Url) -> Result<Response> {
        self.client
            .head(url.clone())
            .send()
            .map_err(|e| Error::transport(format!("HEAD {url}"), e))
    }

    // No per-request `.timeout()`: that would become a deadline on the whole body.
    fn send_get(&self, url: &Url) -> Result<Response> {
        self.client
            .get(url.clone())
            .send()
            .map_err(|e| Error::transport(format!("GET {url}"), e))
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    if raw.trim().is_empty() {
        return Err(Error::MissingArgument("url"));
    }
    Url::parse(raw.trim()).map_err(|_| Error::InvalidEndpoint(raw.to_string()))
}

/// 404/410 map to `NotFound`; other non-2xx answers to `ProtocolError`.
fn ensure_success(method: &str, url: &Url, response: &Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
        return Err(Error::NotFound(url.to_string()));
    }
    Err(Error::ProtocolError {
        code: u32::from(status.as_u16()),
        message: format!("{method} {url}: {status}"),
    })
}
