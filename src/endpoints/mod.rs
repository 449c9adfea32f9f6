//! Parameter sets for the supported REST endpoints.
//!
//! Each type implements [`Endpoint`](crate::core::kernel::Endpoint) and runs
//! through [`TwitterClient::operation`](crate::client::TwitterClient::operation).

pub mod direct_messages;
pub mod lists;
pub mod statuses;
pub mod timelines;
pub mod users;

pub use direct_messages::{
    DestroyDirectMessage, DirectMessageQuery, DirectMessages, NewDirectMessage,
    SentDirectMessages,
};
pub use lists::{ListMembers, ListStatuses};
pub use statuses::{DestroyStatus, ShowStatus, UpdateStatus};
pub use timelines::{HomeTimeline, Mentions, TimelineParams, UserTimeline};
pub use users::ShowUser;
