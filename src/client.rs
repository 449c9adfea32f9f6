use crate::core::errors::TweetError;
use crate::core::kernel::{
    Authenticator, Endpoint, EndpointOperation, PendingOperation, ResponseFormat, Transport,
};
use std::sync::Arc;

/// Shared entry point that hands out single-use operations.
///
/// Holds the transport and the optional authenticator; every operation built
/// from it borrows both through `Arc`s, so the client can be cloned freely and
/// used from several tasks at once.
pub struct TwitterClient<T: Transport> {
    transport: Arc<T>,
    authenticator: Option<Arc<dyn Authenticator>>,
    base_url: String,
    format: ResponseFormat,
}

impl<T: Transport> Clone for TwitterClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            authenticator: self.authenticator.clone(),
            base_url: self.base_url.clone(),
            format: self.format,
        }
    }
}

impl<T: Transport> std::fmt::Debug for TwitterClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterClient")
            .field("base_url", &self.base_url)
            .field("format", &self.format)
            .field("authenticated", &self.is_authentication_enabled())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> TwitterClient<T> {
    pub fn new(
        transport: Arc<T>,
        authenticator: Option<Arc<dyn Authenticator>>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            authenticator,
            base_url: base_url.into(),
            format: ResponseFormat::default(),
        }
    }

    /// Default response format for operations built by this client
    #[must_use]
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn is_authentication_enabled(&self) -> bool {
        self.authenticator.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Fresh operation for `endpoint`, still idle
    pub fn operation<E: Endpoint>(&self, endpoint: E) -> EndpointOperation<E, T> {
        EndpointOperation::new(
            endpoint,
            Arc::clone(&self.transport),
            self.authenticator.clone(),
            self.base_url.clone(),
        )
        .with_format(self.format)
    }

    pub async fn invoke<E: Endpoint>(&self, endpoint: E) -> Result<E::Output, TweetError> {
        self.operation(endpoint).invoke().await
    }

    pub fn spawn<E: Endpoint>(&self, endpoint: E) -> PendingOperation<E::Output>
    where
        T: 'static,
    {
        self.operation(endpoint).spawn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::{RawResponse, SignedRequest, UserTarget};
    use crate::endpoints::ShowUser;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn send(&self, _request: &SignedRequest) -> Result<RawResponse, TweetError> {
            Err(TweetError::Transport {
                status: None,
                message: "unreachable".to_string(),
            })
        }
    }

    #[test]
    fn test_operation_inherits_client_format() {
        let client = TwitterClient::new(Arc::new(Unreachable), None, "https://api.twitter.com/1")
            .with_format(ResponseFormat::Xml);

        let jack = UserTarget::screen_name("jack").unwrap();
        let op = client.operation(ShowUser::new(jack));
        assert_eq!(op.format(), ResponseFormat::Xml);
        assert!(!client.is_authentication_enabled());
    }

    #[test]
    fn test_clone_shares_transport() {
        let client = TwitterClient::new(Arc::new(Unreachable), None, "https://api.twitter.com/1");
        let cloned = client.clone();
        assert!(Arc::ptr_eq(client.transport(), cloned.transport()));
        assert_eq!(cloned.base_url(), "https://api.twitter.com/1");
    }
}
