use crate::core::errors::{ErrorKind, TweetError};
use crate::core::kernel::codec::ResponseParser;
use crate::core::kernel::request::{QueryParams, RequestBuilder, ResponseFormat};
use crate::core::kernel::signer::Authenticator;
use crate::core::kernel::transport::Transport;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// A parameter set for one API endpoint, together with its response mapping
pub trait Endpoint: Send + Sync + 'static {
    /// Typed payload delivered on success
    type Output: Send + 'static;

    /// Short name used in logs
    const NAME: &'static str;

    fn method(&self) -> Method {
        Method::GET
    }

    /// Resource path relative to the base URL, without format extension
    fn path(&self) -> String;

    /// Parameters with unset sentinels already omitted
    fn params(&self) -> QueryParams;

    /// Whether the call must be refused when no authenticator is configured
    fn requires_auth(&self) -> bool {
        true
    }

    /// Convert the decoded response body into the typed payload
    fn map(value: &Value) -> Result<Self::Output, TweetError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(ErrorKind),
}

/// Lifecycle of a single operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Idle,
    Authenticating,
    Dispatched,
    Completed(Outcome),
}

impl OperationState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// One single-use invocation of an endpoint.
///
/// Consumed by [`invoke`](Self::invoke) or [`spawn`](Self::spawn), so each
/// instance completes exactly once.
pub struct EndpointOperation<E: Endpoint, T: Transport> {
    endpoint: E,
    transport: Arc<T>,
    authenticator: Option<Arc<dyn Authenticator>>,
    base_url: String,
    format: ResponseFormat,
    state: watch::Sender<OperationState>,
}

impl<E: Endpoint, T: Transport> std::fmt::Debug for EndpointOperation<E, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointOperation")
            .field("endpoint", &E::NAME)
            .field("base_url", &self.base_url)
            .field("format", &self.format)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl<E: Endpoint, T: Transport> EndpointOperation<E, T> {
    pub fn new(
        endpoint: E,
        transport: Arc<T>,
        authenticator: Option<Arc<dyn Authenticator>>,
        base_url: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(OperationState::Idle);
        Self {
            endpoint,
            transport,
            authenticator,
            base_url: base_url.into(),
            format: ResponseFormat::default(),
            state,
        }
    }

    /// Request the response in another format for this call only
    #[must_use]
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn state(&self) -> OperationState {
        *self.state.borrow()
    }

    /// Receiver that observes every state transition
    pub fn watch_state(&self) -> watch::Receiver<OperationState> {
        self.state.subscribe()
    }

    /// Run the operation to completion
    #[instrument(skip(self), fields(endpoint = E::NAME, format = %self.format))]
    pub async fn invoke(self) -> Result<E::Output, TweetError> {
        let result = self.run().await;

        let outcome = match &result {
            Ok(_) => Outcome::Success,
            Err(e) => {
                debug!(kind = %e.kind(), error = %e, "Operation failed");
                Outcome::Failure(e.kind())
            }
        };
        self.transition(OperationState::Completed(outcome));

        result
    }

    /// Run the operation on the tokio runtime and deliver the result over a channel
    pub fn spawn(self) -> PendingOperation<E::Output>
    where
        T: 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let state = self.watch_state();

        let handle = tokio::spawn(async move {
            let result = self.invoke().await;
            // The receiver may already be gone; nobody is waiting then
            let _ = sender.send(result);
        });

        PendingOperation {
            completion: receiver,
            state,
            handle,
        }
    }

    async fn run(&self) -> Result<E::Output, TweetError> {
        if self.endpoint.requires_auth() && self.authenticator.is_none() {
            return Err(TweetError::AuthenticationRequired(format!(
                "{} needs authentication to be enabled",
                E::NAME
            )));
        }

        self.transition(OperationState::Authenticating);
        let request = RequestBuilder::new(&self.base_url, self.format).build(
            self.endpoint.method(),
            &self.endpoint.path(),
            &self.endpoint.params(),
            self.authenticator.as_deref(),
        )?;

        self.transition(OperationState::Dispatched);
        let response = self.transport.send(&request).await?;

        if !response.is_success() {
            return Err(TweetError::Transport {
                status: Some(response.status),
                message: response.body_text(),
            });
        }

        let value = ResponseParser::parse(&response, self.format).into_result()?;
        E::map(&value)
    }

    fn transition(&self, next: OperationState) {
        let previous = self.state.send_replace(next);
        debug!(endpoint = E::NAME, from = ?previous, to = ?next, "Operation state changed");
    }
}

/// Handle to a spawned operation
#[derive(Debug)]
pub struct PendingOperation<O> {
    completion: oneshot::Receiver<Result<O, TweetError>>,
    state: watch::Receiver<OperationState>,
    handle: JoinHandle<()>,
}

impl<O> PendingOperation<O> {
    /// Wait for the terminal result; `None` when the operation was cancelled first
    pub async fn completion(self) -> Option<Result<O, TweetError>> {
        self.completion.await.ok()
    }

    /// Best-effort cancellation: drops the in-flight request, no completion is delivered
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn state(&self) -> OperationState {
        *self.state.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
