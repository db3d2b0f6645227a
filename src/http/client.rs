//! HTTP client for archive downloads and remote sources
//!
//! One GET per call, no retries and no timeout beyond reqwest's defaults.
//! The caller decides what a non-success status means: the uploader skips
//! the month, the loader treats it as fatal.

use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tracing::debug;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("taxi-ingest/", env!("CARGO_PKG_VERSION"));

/// Outcome of a single GET
#[derive(Debug)]
pub enum Fetched {
    /// 2xx response with its full body
    Body(Bytes),
    /// Any other status; the body is discarded
    Unavailable(StatusCode),
}

impl Fetched {
    /// Return the body, or an `HttpStatus` error naming `url`
    pub fn into_body(self, url: &str) -> Result<Bytes> {
        match self {
            Fetched::Body(bytes) => Ok(bytes),
            Fetched::Unavailable(status) => Err(Error::http_status(status.as_u16(), url)),
        }
    }
}

/// HTTP client shared by the uploader and the loader
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Issue a GET and read the whole body on success
    ///
    /// Transport failures (DNS, refused connection, broken body) are errors;
    /// a non-success status is reported as [`Fetched::Unavailable`].
    pub async fn fetch(&self, url: &str) -> Result<Fetched> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("GET {} -> {}", url, status.as_u16());

        if !status.is_success() {
            return Ok(Fetched::Unavailable(status));
        }

        Ok(Fetched::Body(response.bytes().await?))
    }

    /// GET `url` and fail on any non-success status
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        self.fetch(url).await?.into_body(url)
    }
}
