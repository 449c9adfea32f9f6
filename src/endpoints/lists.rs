use crate::core::errors::TweetError;
use crate::core::kernel::{map_cursored_users, map_list, Endpoint, QueryParams, UserTarget};
use crate::core::types::{CursoredUsers, Status};
use serde_json::Value;

/// One page of a list's members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMembers {
    /// Owner of the list
    pub owner: UserTarget,
    pub list_id: u64,
    /// Opaque page token; "-1" starts paging, empty fetches without cursoring
    pub cursor: String,
    pub include_entities: bool,
}

impl ListMembers {
    pub fn new(owner: impl Into<UserTarget>, list_id: u64) -> Self {
        Self {
            owner: owner.into(),
            list_id,
            cursor: String::new(),
            include_entities: false,
        }
    }

    /// Same query positioned at another page
    #[must_use]
    pub fn at_cursor(&self, cursor: impl Into<String>) -> Self {
        Self {
            cursor: cursor.into(),
            ..self.clone()
        }
    }
}

impl Endpoint for ListMembers {
    type Output = CursoredUsers;
    const NAME: &'static str = "list_members";

    fn path(&self) -> String {
        format!("{}/{}/members", self.owner.path_segment(), self.list_id)
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .text("cursor", &self.cursor)
            .flag("include_entities", self.include_entities);
        params
    }

    fn map(value: &Value) -> Result<Self::Output, TweetError> {
        map_cursored_users(value)
    }
}

/// Timeline of statuses posted by a list's members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListStatuses {
    pub owner: UserTarget,
    pub list_id: u64,
    pub since_id: u64,
    pub max_id: u64,
    pub per_page: u32,
    pub page: u32,
    pub include_entities: bool,
}

impl ListStatuses {
    pub fn new(owner: impl Into<UserTarget>, list_id: u64) -> Self {
        Self {
            owner: owner.into(),
            list_id,
            since_id: 0,
            max_id: 0,
            per_page: 0,
            page: 0,
            include_entities: false,
        }
    }
}

impl Endpoint for ListStatuses {
    type Output = Vec<Status>;
    const NAME: &'static str = "list_statuses";

    fn path(&self) -> String {
        format!(
            "{}/lists/{}/statuses",
            self.owner.path_segment(),
            self.list_id
        )
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .id("since_id", self.since_id)
            .id("max_id", self.max_id)
            .count("per_page", self.per_page)
            .count("page", self.page)
            .flag("include_entities", self.include_entities);
        params
    }

    fn requires_auth(&self) -> bool {
        false
    }

    fn map(value: &Value) -> Result<Self::Output, TweetError> {
        map_list(value)
    }
}
