use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

/// HTTP request timeout in seconds for asset and API fetches.
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Transport-level fetch failure. A reachable server answering with an
/// error status is not a `FetchError`; that reply is a response like any
/// other and flows through `FetchedResponse`.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.to_string())
    }
}

/// Raw result of fetching a URL: status, content type, and body bytes.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// How the cache layer reaches the network. Implemented over HTTP in
/// production and by scripted fakes in tests.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError>;
}

/// `Fetcher` backed by a real HTTP client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(FetchedResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        let mut response = FetchedResponse {
            status: 200,
            content_type: None,
            body: Vec::new(),
        };
        assert!(response.is_success());

        response.status = 299;
        assert!(response.is_success());

        response.status = 304;
        assert!(!response.is_success());

        response.status = 404;
        assert!(!response.is_success());
    }
}
