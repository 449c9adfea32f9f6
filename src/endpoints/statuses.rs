use crate::core::errors::TweetError;
use crate::core::kernel::{map_record, Endpoint, QueryParams};
use crate::core::types::Status;
use reqwest::Method;
use serde_json::Value;

/// A single status by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowStatus {
    pub id: u64,
    pub trim_user: bool,
    pub include_entities: bool,
}

impl Endpoint for ShowStatus {
    type Output = Status;
    const NAME: &'static str = "show_status";

    fn path(&self) -> String {
        format!("statuses/show/{}", self.id)
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .flag("trim_user", self.trim_user)
            .flag("include_entities", self.include_entities);
        params
    }

    fn requires_auth(&self) -> bool {
        false
    }

    fn map(value: &Value) -> Result<Self::Output, TweetError> {
        map_record(value)
    }
}

/// Post a new status for the authenticating user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateStatus {
    pub status: String,
    /// Id of the status this one replies to
    pub in_reply_to_status_id: u64,
    pub trim_user: bool,
    pub include_entities: bool,
}

impl UpdateStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Default::default()
        }
    }
}

impl Endpoint for UpdateStatus {
    type Output = Status;
    const NAME: &'static str = "update_status";

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> String {
        "statuses/update".to_string()
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .text("status", &self.status)
            .id("in_reply_to_status_id", self.in_reply_to_status_id)
            .flag("trim_user", self.trim_user)
            .flag("include_entities", self.include_entities);
        params
    }

    fn map(value: &Value) -> Result<Self::Output, TweetError> {
        map_record(value)
    }
}

/// Delete one of the authenticating user's statuses; returns the deleted status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestroyStatus {
    pub id: u64,
    pub trim_user: bool,
    pub include_entities: bool,
}

impl Endpoint for DestroyStatus {
    type Output = Status;
    const NAME: &'static str = "destroy_status";

    fn method(&self) -> Method {
        Method::POST
    }

    fn path(&self) -> String {
        format!("statuses/destroy/{}", self.id)
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .flag("trim_user", self.trim_user)
            .flag("include_entities", self.include_entities);
        params
    }

    fn map(value: &Value) -> Result<Self::Output, TweetError> {
        map_record(value)
    }
}
