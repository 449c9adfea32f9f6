pub mod builder;
pub mod client;
pub mod core;
pub mod endpoints;

pub use builder::{build_client, TwitterClientBuilder};
pub use client::TwitterClient;
pub use core::{
    config::{ConfigError, TwitterConfig},
    errors::{ErrorKind, TweetError},
    kernel::{OperationState, Outcome, PendingOperation, ResponseFormat, ScreenName, UserTarget},
    types::*,
};
