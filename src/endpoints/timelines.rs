use crate::core::errors::TweetError;
use crate::core::kernel::{map_list, Endpoint, QueryParams, UserTarget};
use crate::core::types::Status;
use serde_json::Value;

/// Paging and filtering options shared by the status timelines.
///
/// Zero ids and counts and `false` flags are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineParams {
    /// Only statuses newer than this id
    pub since_id: u64,
    /// Only statuses older than or equal to this id
    pub max_id: u64,
    /// Number of statuses to fetch (up to 200)
    pub count: u32,
    pub page: u32,
    pub trim_user: bool,
    /// Include native retweets
    pub include_rts: bool,
    pub include_entities: bool,
    pub exclude_replies: bool,
    pub contributor_details: bool,
}

impl TimelineParams {
    fn append_to(&self, params: &mut QueryParams) {
        params
            .id("since_id", self.since_id)
            .id("max_id", self.max_id)
            .count("count", self.count)
            .count("page", self.page)
            .flag("trim_user", self.trim_user)
            .flag("include_rts", self.include_rts)
            .flag("include_entities", self.include_entities)
            .flag("exclude_replies", self.exclude_replies)
            .flag("contributor_details", self.contributor_details);
    }
}

/// Recent statuses mentioning the authenticating user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mentions(pub TimelineParams);

impl Endpoint for Mentions {
    type Output = Vec<Status>;
    const NAME: &'static str = "mentions";

    fn path(&self) -> String {
        "statuses/mentions".to_string()
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.0.append_to(&mut params);
        params
    }

    fn map(value: &Value) -> Result<Self::Output, TweetError> {
        map_list(value)
    }
}

/// Statuses from the authenticating user and the users they follow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeTimeline(pub TimelineParams);

impl Endpoint for HomeTimeline {
    type Output = Vec<Status>;
    const NAME: &'static str = "home_timeline";

    fn path(&self) -> String {
        "statuses/home_timeline".to_string()
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.0.append_to(&mut params);
        params
    }

    fn map(value: &Value) -> Result<Self::Output, TweetError> {
        map_list(value)
    }
}

/// Statuses posted by one user.
///
/// Without a target the authenticating user's own timeline is fetched, which
/// needs authentication; a public user's timeline does not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTimeline {
    pub target: Option<UserTarget>,
    pub timeline: TimelineParams,
}

impl Endpoint for UserTimeline {
    type Output = Vec<Status>;
    const NAME: &'static str = "user_timeline";

    fn path(&self) -> String {
        "statuses/user_timeline".to_string()
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(target) = &self.target {
            params.target(target);
        }
        self.timeline.append_to(&mut params);
        params
    }

    fn requires_auth(&self) -> bool {
        self.target.is_none()
    }

    fn map(value: &Value) -> Result<Self::Output, TweetError> {
        map_list(value)
    }
}
