//! HTTP client for the remote allow-list.

use crate::error::WhitelistError;
use crate::source::WhitelistSource;

use serde::Deserialize;
use std::time::Duration;

/// Default timeout for whitelist requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches the allow-list with `GET {url}`.
///
/// The endpoint may answer with a bare JSON array of addresses or with
/// `{"addresses": [...]}`.
pub struct HttpWhitelistSource {
    http_client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse {
    Bare(Vec<String>),
    Wrapped { addresses: Vec<String> },
}

impl ListResponse {
    fn into_addresses(self) -> Vec<String> {
        match self {
            ListResponse::Bare(list) => list,
            ListResponse::Wrapped { addresses } => addresses,
        }
    }
}

impl HttpWhitelistSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl WhitelistSource for HttpWhitelistSource {
    async fn fetch(&self) -> Result<Vec<String>, WhitelistError> {
        let response = self.http_client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                WhitelistError::Unreachable(format!("request timed out: {e}"))
            } else if e.is_connect() {
                WhitelistError::Unreachable(format!("connection failed: {e}"))
            } else {
                WhitelistError::RequestFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(WhitelistError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let body: ListResponse = response.json().await.map_err(|e| {
            WhitelistError::InvalidResponse(format!("failed to parse allow-list: {e}"))
        })?;

        Ok(body.into_addresses())
    }
}
