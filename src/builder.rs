use crate::client::TwitterClient;
use crate::core::config::{ConfigError, TwitterConfig};
use crate::core::kernel::{Authenticator, OAuth1Signer, ReqwestTransport, Transport, TransportConfig};
use std::sync::Arc;
use tracing::debug;

/// Assembles a [`TwitterClient`] from a [`TwitterConfig`]
pub struct TwitterClientBuilder {
    config: TwitterConfig,
    authenticator: Option<Arc<dyn Authenticator>>,
}

impl TwitterClientBuilder {
    pub fn new(config: TwitterConfig) -> Self {
        Self {
            config,
            authenticator: None,
        }
    }

    /// Use a custom authenticator instead of the OAuth signer derived from the config
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Build a client backed by reqwest
    pub fn build(self) -> Result<TwitterClient<ReqwestTransport>, ConfigError> {
        let mut transport_config = TransportConfig::default().with_timeout(self.config.timeout_seconds);
        if let Some(user_agent) = &self.config.user_agent {
            transport_config = transport_config.with_user_agent(user_agent.clone());
        }

        let transport = Arc::new(ReqwestTransport::new(transport_config)?);
        self.build_with_transport(transport)
    }

    /// Build a client on top of an existing transport
    pub fn build_with_transport<T: Transport>(
        self,
        transport: Arc<T>,
    ) -> Result<TwitterClient<T>, ConfigError> {
        let base_url = self.config.resolved_base_url()?;

        // Add authentication if credentials are provided
        let authenticator = self.authenticator.or_else(|| {
            self.config.has_credentials().then(|| {
                Arc::new(OAuth1Signer::from_config(&self.config)) as Arc<dyn Authenticator>
            })
        });

        debug!(
            base_url = %base_url,
            format = %self.config.format,
            authenticated = authenticator.is_some(),
            "Built Twitter client"
        );

        Ok(TwitterClient::new(transport, authenticator, base_url).with_format(self.config.format))
    }
}

/// Create a reqwest-backed client straight from configuration
pub fn build_client(config: TwitterConfig) -> Result<TwitterClient<ReqwestTransport>, ConfigError> {
    TwitterClientBuilder::new(config).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::ResponseFormat;

    #[test]
    fn test_credentials_enable_authentication() {
        let config = TwitterConfig::new(
            "ck".to_string(),
            "cs".to_string(),
            "at".to_string(),
            "ats".to_string(),
        );
        let client = build_client(config).unwrap();
        assert!(client.is_authentication_enabled());
        assert_eq!(client.base_url(), "https://api.twitter.com/1");
    }

    #[test]
    fn test_read_only_client() {
        let config = TwitterConfig::read_only()
            .base_url("http://localhost:8080/1/")
            .format(ResponseFormat::Xml);
        let client = build_client(config).unwrap();

        assert!(!client.is_authentication_enabled());
        assert_eq!(client.base_url(), "http://localhost:8080/1");
        assert_eq!(client.format(), ResponseFormat::Xml);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = TwitterConfig::read_only().base_url("ftp://example.com");
        assert!(matches!(
            build_client(config),
            Err(ConfigError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_user_agent_reaches_transport() {
        let config = TwitterConfig::read_only().user_agent("my-app/2.0").timeout(5);
        let client = build_client(config).unwrap();
        assert_eq!(client.transport().config().user_agent, "my-app/2.0");
        assert_eq!(client.transport().config().timeout_seconds, 5);
    }
}
