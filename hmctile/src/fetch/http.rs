//! HTTP client abstraction for testability

use std::time::Duration;

use reqwest::StatusCode;

use super::types::FetchError;

/// Environment variable holding the HERE platform bearer token.
pub const ACCESS_TOKEN_ENV: &str = "HERE_ACCESS_TOKEN";

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
    bearer_token: Option<String>,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with a 30 second timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(30)
    }

    /// Creates a new ReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("hmctile/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            bearer_token: None,
        })
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Client authenticated with the token from `HERE_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self, FetchError> {
        let token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| FetchError::Auth(format!("{} is not set", ACCESS_TOKEN_ENV)))?;
        Ok(Self::new()?.with_bearer_token(token.trim()))
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| FetchError::Http(format!("Request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(FetchError::NotFound(url.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(FetchError::Auth(format!(
                    "HTTP {} from {}",
                    response.status(),
                    url
                )))
            }
            status => return Err(FetchError::Http(format!("HTTP {} from {}", status, url))),
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| FetchError::Http(format!("Failed to read response: {}", e)))
    }
}
