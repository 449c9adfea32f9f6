use crate::core::errors::TweetError;
use crate::core::kernel::{map_list, map_record, Endpoint, QueryParams, UserTarget};
use crate::core::types::DirectMessage;
use reqwest::Method;
use serde_json::Value;

/// Send a direct message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDirectMessage {
    pub recipient: UserTarget,
    pub text: String,
    pub include_entities: bool,
}

impl NewDirectMessage {
    pub fn new(recipient: impl Into<UserTarget>, text: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            text: text.into(),
            include_entities: false,
        }
    }
}

impl Endpoint for NewDirectMessage {
    type Output = DirectMessage;
    const NAME: &'static str = "new_direct_message";

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> String {
        "direct_messages/new".to_string()
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .target(&self.recipient)
            .text("text", &self.text)
            .flag("include_entities", self.include_entities);
        params
    }

    fn map(value: &Value) -> Result<Self::Output, TweetError> {
        map_record(value)
    }
}

/// Paging options for the direct message inboxes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectMessageQuery {
    pub since_id: u64,
    pub max_id: u64,
    pub count: u32,
    pub page: u32,
    pub include_entities: bool,
}

impl DirectMessageQuery {
    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .id("since_id", self.since_id)
            .id("max_id", self.max_id)
            .count("count", self.count)
            .count("page", self.page)
            .flag("include_entities", self.include_entities);
        params
    }
}

/// Direct messages received by the authenticating user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectMessages(pub DirectMessageQuery);

impl Endpoint for DirectMessages {
    type Output = Vec<DirectMessage>;
    const NAME: &'static str = "direct_messages";

    fn path(&self) -> String {
        "direct_messages".to_string()
    }

    fn params(&self) -> QueryParams {
        self.0.to_params()
    }

    fn map(value: &Value) -> Result<Self::Output, TweetError> {
        map_list(value)
    }
}

/// Direct messages sent by the authenticating user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentDirectMessages(pub DirectMessageQuery);

impl Endpoint for SentDirectMessages {
    type Output = Vec<DirectMessage>;
    const NAME: &'static str = "sent_direct_messages";

    fn path(&self) -> String {
        "direct_messages/sent".to_string()
    }

    fn params(&self) -> QueryParams {
        self.0.to_params()
    }

    fn map(value: &Value) -> Result<Self::Output, TweetError> {
        map_list(value)
    }
}

/// Delete a direct message; returns the deleted message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestroyDirectMessage {
    pub id: u64,
    pub include_entities: bool,
}

impl Endpoint for DestroyDirectMessage {
    type Output = DirectMessage;
    const NAME: &'static str = "destroy_direct_message";

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> String {
        format!("direct_messages/destroy/{}", self.id)
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.flag("include_entities", self.include_entities);
        params
    }

    fn map(value: &Value) -> Result<Self::Output, TweetError> {
        map_record(value)
    }
}
