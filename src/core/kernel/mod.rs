//! Kernel - request/response pipeline shared by every endpoint
//!
//! Every endpoint goes through the same five steps, each owned by one module:
//!
//! - **request**: typed parameters to an immutable [`SignedRequest`]
//! - **signer**: [`Authenticator`] trait and the OAuth 1.0a implementation
//! - **transport**: [`Transport`] trait and the reqwest-backed implementation
//! - **codec**: [`ResponseParser`], response bytes to a structured value
//! - **mapper**: structured value to domain records
//!
//! [`EndpointOperation`] in **operation** composes them into one asynchronous call.
//!
//! # Examples
//!
//! ## Invoking an endpoint
//! ```rust,no_run
//! use tweetnet::core::kernel::*;
//! use tweetnet::endpoints::{Mentions, TimelineParams};
//! use std::sync::Arc;
//!
//! # async fn mentions() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(ReqwestTransport::new(TransportConfig::default())?);
//! let signer: Arc<dyn Authenticator> = Arc::new(OAuth1Signer::new(
//!     "consumer_key".to_string(),
//!     "consumer_secret".to_string(),
//!     "access_token".to_string(),
//!     "access_token_secret".to_string(),
//! ));
//!
//! let params = Mentions(TimelineParams {
//!     count: 20,
//!     include_entities: true,
//!     ..Default::default()
//! });
//! let statuses = EndpointOperation::new(params, transport, Some(signer), "https://api.twitter.com/1")
//!     .invoke()
//!     .await?;
//! println!("{} mentions", statuses.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Defining an endpoint
//! ```rust
//! use tweetnet::core::errors::TweetError;
//! use tweetnet::core::kernel::{map_record, Endpoint, QueryParams};
//! use tweetnet::core::types::User;
//! use serde_json::Value;
//!
//! struct VerifyCredentials {
//!     include_entities: bool,
//! }
//!
//! impl Endpoint for VerifyCredentials {
//!     type Output = User;
//!     const NAME: &'static str = "verify_credentials";
//!
//!     fn path(&self) -> String {
//!         "account/verify_credentials".to_string()
//!     }
//!
//!     fn params(&self) -> QueryParams {
//!         let mut params = QueryParams::new();
//!         params.flag("include_entities", self.include_entities);
//!         params
//!     }
//!
//!     fn map(value: &Value) -> Result<User, TweetError> {
//!         map_record(value)
//!     }
//! }
//! ```

pub mod codec;
pub mod mapper;
pub mod operation;
pub mod request;
pub mod signer;
pub mod transport;

// Re-export key types for convenience
pub use codec::{ParseOutcome, ResponseParser};
pub use mapper::{map_cursored_users, map_list, map_record, FromStructured};
pub use operation::{Endpoint, EndpointOperation, OperationState, Outcome, PendingOperation};
pub use request::{
    percent_encode, QueryParams, RequestBuilder, ResponseFormat, ScreenName, SignedRequest,
    UserTarget,
};
pub use signer::{Authenticator, OAuth1Signer};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportConfig};
