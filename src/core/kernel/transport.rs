use crate::core::config::{ConfigError, DEFAULT_TIMEOUT_SECONDS};
use crate::core::errors::TweetError;
use crate::core::kernel::request::SignedRequest;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{instrument, trace};

/// Response as received from the wire, before any decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>, content_type: Option<&str>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: content_type.map(str::to_string),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport trait for dispatching signed requests
///
/// A transport returns every HTTP response it receives, whatever its status;
/// only failures to obtain a response at all are errors here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &SignedRequest) -> Result<RawResponse, TweetError>;
}

/// Configuration for the HTTP transport
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: format!("tweetnet/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Implementation of `Transport` using reqwest
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ConfigError::InvalidConfiguration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.resource_url()))]
    async fn send(&self, request: &SignedRequest) -> Result<RawResponse, TweetError> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url());

        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let response = builder.send().await.map_err(|e| TweetError::Transport {
            status: None,
            message: format!("Request failed: {}", e),
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| TweetError::Transport {
            status: Some(status),
            message: format!("Failed to read response body: {}", e),
        })?;

        trace!(status, body = %String::from_utf8_lossy(&body), "Response received");

        Ok(RawResponse {
            status,
            body: body.to_vec(),
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let transport =
            ReqwestTransport::new(TransportConfig::default().with_timeout(5)).unwrap();
        assert_eq!(transport.config().timeout_seconds, 5);
        assert!(transport.config().user_agent.starts_with("tweetnet/"));
    }

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "{}", None).is_success());
        assert!(RawResponse::new(204, "", None).is_success());
        assert!(!RawResponse::new(302, "", None).is_success());
        assert!(!RawResponse::new(401, "nope", Some("text/plain")).is_success());
        assert_eq!(RawResponse::new(401, "nope", None).body_text(), "nope");
    }
}
