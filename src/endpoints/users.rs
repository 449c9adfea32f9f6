use crate::core::errors::TweetError;
use crate::core::kernel::{map_record, Endpoint, QueryParams, UserTarget};
use crate::core::types::User;
use serde_json::Value;

/// Profile of a single user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowUser {
    pub target: UserTarget,
    pub include_entities: bool,
}

impl ShowUser {
    pub fn new(target: impl Into<UserTarget>) -> Self {
        Self {
            target: target.into(),
            include_entities: false,
        }
    }
}

impl Endpoint for ShowUser {
    type Output = User;
    const NAME: &'static str = "show_user";

    fn path(&self) -> String {
        "users/show".to_string()
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .target(&self.target)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_user_params() {
        let by_id = ShowUser::new(UserTarget::id(12).unwrap());
        assert_eq!(by_id.params().encode(), "user_id=12");
        assert!(!by_id.requires_auth());

        let by_name = ShowUser::new(UserTarget::screen_name("jack").unwrap());
        assert_eq!(by_name.params().encode(), "screen_name=jack");
    }

    #[test]
    fn test_show_user_always_identifies_someone() {
        assert!(UserTarget::id(0).map(ShowUser::new).is_none());
        assert!(UserTarget::screen_name("").map(ShowUser::new).is_none());

        let params = ShowUser::new(UserTarget::id(1).unwrap()).params();
        assert!(params.contains("user_id") ^ params.contains("screen_name"));
    }
}
