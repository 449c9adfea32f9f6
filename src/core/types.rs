use chrono::{DateTime, Utc};

/// A tweet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub id: u64,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    pub source: String,
    pub truncated: bool,
    pub favorited: bool,
    pub retweeted: bool,
    pub retweet_count: u64,
    pub in_reply_to_status_id: Option<u64>,
    pub in_reply_to_user_id: Option<u64>,
    pub in_reply_to_screen_name: Option<String>,
    pub user: Option<User>,
    pub retweeted_status: Option<Box<Status>>,
    pub entities: Entities,
}

impl Status {
    pub fn is_reply(&self) -> bool {
        self.in_reply_to_status_id.is_some()
    }

    pub fn is_retweet(&self) -> bool {
        self.retweeted_status.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub screen_name: String,
    pub description: String,
    pub location: String,
    pub url: Option<String>,
    pub profile_image_url: String,
    pub protected: bool,
    pub verified: bool,
    pub followers_count: u64,
    pub friends_count: u64,
    pub statuses_count: u64,
    pub favourites_count: u64,
    pub listed_count: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub lang: String,
    /// Most recent tweet, when the API embeds it
    pub status: Option<Box<Status>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectMessage {
    pub id: u64,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    pub sender_id: u64,
    pub sender_screen_name: String,
    pub recipient_id: u64,
    pub recipient_screen_name: String,
    pub sender: Option<User>,
    pub recipient: Option<User>,
    pub entities: Entities,
}

/// Structured pieces of tweet text, present when `include_entities` was requested
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entities {
    pub hashtags: Vec<Hashtag>,
    pub urls: Vec<UrlEntity>,
    pub user_mentions: Vec<UserMention>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.hashtags.is_empty() && self.urls.is_empty() && self.user_mentions.is_empty()
    }
}

/// Character range of an entity inside the tweet text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Indices {
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hashtag {
    pub text: String,
    pub indices: Indices,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlEntity {
    pub url: String,
    pub expanded_url: Option<String>,
    pub display_url: Option<String>,
    pub indices: Indices,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserMention {
    pub id: u64,
    pub screen_name: String,
    pub name: String,
    pub indices: Indices,
}

/// One page of users plus the opaque cursors around it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursoredUsers {
    pub users: Vec<User>,
    pub next_cursor: String,
    pub previous_cursor: String,
}

impl CursoredUsers {
    /// "0" and "" both mean there is no further page
    pub fn has_next(&self) -> bool {
        !self.next_cursor.is_empty() && self.next_cursor != "0"
    }

    pub fn has_previous(&self) -> bool {
        !self.previous_cursor.is_empty() && self.previous_cursor != "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_pages() {
        let page = CursoredUsers {
            users: Vec::new(),
            next_cursor: "1300794057949944903".to_string(),
            previous_cursor: "0".to_string(),
        };
        assert!(page.has_next());
        assert!(!page.has_previous());
        assert!(!CursoredUsers::default().has_next());
    }

    #[test]
    fn test_status_flags() {
        let status = Status {
            in_reply_to_status_id: Some(3),
            ..Default::default()
        };
        assert!(status.is_reply());
        assert!(!status.is_retweet());
        assert!(status.entities.is_empty());
    }
}
