//! Structured value to domain record mapping.
//!
//! Single records are strict: a missing identity field fails the mapping.
//! Lists are lenient: elements that fail to map are dropped and logged, the
//! rest of the page is kept. Numeric fields accept both JSON numbers and
//! numeric strings.

use crate::core::errors::TweetError;
use crate::core::types::{
    CursoredUsers, DirectMessage, Entities, Hashtag, Indices, Status, UrlEntity, User,
    UserMention,
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::warn;

/// Legacy REST timestamp layout, e.g. `Wed Aug 27 13:08:45 +0000 2008`
const TWITTER_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// A domain record that can be built from a structured value
pub trait FromStructured: Sized {
    /// Record name used in error messages and logs
    const RECORD: &'static str;

    fn from_structured(value: &Value) -> Result<Self, TweetError>;
}

/// Map a single-record response; any failure fails the operation
pub fn map_record<T: FromStructured>(value: &Value) -> Result<T, TweetError> {
    T::from_structured(value)
}

/// Map a sequence of records, dropping the elements that fail to map
pub fn map_list<T: FromStructured>(value: &Value) -> Result<Vec<T>, TweetError> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        Value::Null => &[],
        other => {
            return Err(TweetError::Mapping(format!(
                "Expected a sequence of {} records, found {}",
                T::RECORD,
                value_kind(other)
            )))
        }
    };

    Ok(items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::from_structured(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(record = T::RECORD, index, error = %e, "Dropping malformed list element");
                None
            }
        })
        .collect())
}

/// Map a `{"users": [...], "next_cursor_str": .., "previous_cursor_str": ..}` envelope
pub fn map_cursored_users(value: &Value) -> Result<CursoredUsers, TweetError> {
    let fields = Fields::new("CursoredUsers", value)?;
    let users = fields
        .get("users")
        .ok_or_else(|| TweetError::missing_field("CursoredUsers", "users"))?;

    Ok(CursoredUsers {
        users: map_list(users)?,
        next_cursor: cursor_token(value, &["next_cursor_str", "next_cursor"]),
        previous_cursor: cursor_token(
            value,
            &[
                "previous_cursor_str",
                "prev_cursor_str",
                "previous_cursor",
                "prev_cursor",
            ],
        ),
    })
}

/// First present cursor among `keys`, as an opaque string; empty when absent
pub fn cursor_token(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(scalar_string)
        .unwrap_or_default()
}

/// Unsigned integer from a JSON number or a numeric string
pub fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_u64().map(|n| n != 0),
        _ => None,
    }
}

pub fn parse_twitter_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(s.trim(), TWITTER_DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(s.trim()))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a map",
    }
}

/// Elements of a nested collection.
///
/// Accepts a plain sequence, or a single-key map wrapping one (the XML
/// `<hashtags><hashtag>..</hashtag></hashtags>` shape).
fn as_sequence(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) if map.len() == 1 => match map.values().next() {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(inner @ Value::Object(_)) => vec![inner],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Typed, defaulting accessors over one record's map
struct Fields<'a> {
    record: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn new(record: &'static str, value: &'a Value) -> Result<Self, TweetError> {
        match value {
            Value::Object(map) => Ok(Self { record, map }),
            other => Err(TweetError::Mapping(format!(
                "Expected a {} map, found {}",
                record,
                value_kind(other)
            ))),
        }
    }

    /// Present and non-null
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// Id from `{key}_str` or `{key}`, whichever parses first
    fn opt_id(&self, key: &str) -> Option<u64> {
        self.get(&format!("{}_str", key))
            .and_then(as_u64)
            .or_else(|| self.get(key).and_then(as_u64))
    }

    fn required_id(&self, key: &str) -> Result<u64, TweetError> {
        self.opt_id(key)
            .ok_or_else(|| TweetError::missing_field(self.record, key))
    }

    fn u64(&self, key: &str) -> u64 {
        self.opt_id(key).unwrap_or_default()
    }

    fn string(&self, key: &str) -> String {
        self.get(key).and_then(scalar_string).unwrap_or_default()
    }

    fn opt_string(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(scalar_string)
            .filter(|s| !s.is_empty())
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(as_bool).unwrap_or(false)
    }

    fn date(&self, key: &str) -> Option<DateTime<Utc>> {
        self.get(key)
            .and_then(Value::as_str)
            .and_then(parse_twitter_date)
    }

    fn indices(&self) -> Indices {
        match self.get("indices") {
            Some(Value::Array(bounds)) if bounds.len() == 2 => Indices {
                start: as_u64(&bounds[0]).unwrap_or_default(),
                end: as_u64(&bounds[1]).unwrap_or_default(),
            },
            _ => Indices {
                start: self.u64("start"),
                end: self.u64("end"),
            },
        }
    }

    /// Embedded record; a malformed one is dropped rather than failing the parent
    fn nested<T: FromStructured>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match T::from_structured(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(parent = self.record, field = key, error = %e, "Ignoring malformed embedded record");
                None
            }
        }
    }

    fn collection<T: FromStructured>(&self, key: &str) -> Vec<T> {
        self.get(key)
            .map(as_sequence)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| T::from_structured(item).ok())
            .collect()
    }

    fn entities(&self) -> Entities {
        let Some(entities) = self.get("entities") else {
            return Entities::default();
        };
        let Ok(fields) = Fields::new("Entities", entities) else {
            return Entities::default();
        };

        Entities {
            hashtags: fields.collection("hashtags"),
            urls: fields.collection("urls"),
            user_mentions: fields.collection("user_mentions"),
        }
    }
}

impl FromStructured for Status {
    const RECORD: &'static str = "Status";

    fn from_structured(value: &Value) -> Result<Self, TweetError> {
        let f = Fields::new(Self::RECORD, value)?;

        Ok(Self {
            id: f.required_id("id")?,
            text: f.string("text"),
            created_at: f.date("created_at"),
            source: f.string("source"),
            truncated: f.flag("truncated"),
            favorited: f.flag("favorited"),
            retweeted: f.flag("retweeted"),
            retweet_count: f.u64("retweet_count"),
            in_reply_to_status_id: f.opt_id("in_reply_to_status_id"),
            in_reply_to_user_id: f.opt_id("in_reply_to_user_id"),
            in_reply_to_screen_name: f.opt_string("in_reply_to_screen_name"),
            user: f.nested("user"),
            retweeted_status: f.nested::<Self>("retweeted_status").map(Box::new),
            entities: f.entities(),
        })
    }
}

impl FromStructured for User {
    const RECORD: &'static str = "User";

    fn from_structured(value: &Value) -> Result<Self, TweetError> {
        let f = Fields::new(Self::RECORD, value)?;

        Ok(Self {
            id: f.required_id("id")?,
            name: f.string("name"),
            screen_name: f.string("screen_name"),
            description: f.string("description"),
            location: f.string("location"),
            url: f.opt_string("url"),
            profile_image_url: f.string("profile_image_url"),
            protected: f.flag("protected"),
            verified: f.flag("verified"),
            followers_count: f.u64("followers_count"),
            friends_count: f.u64("friends_count"),
            statuses_count: f.u64("statuses_count"),
            favourites_count: f.u64("favourites_count"),
            listed_count: f.u64("listed_count"),
            created_at: f.date("created_at"),
            lang: f.string("lang"),
            status: f.nested::<Status>("status").map(Box::new),
        })
    }
}

impl FromStructured for DirectMessage {
    const RECORD: &'static str = "DirectMessage";

    fn from_structured(value: &Value) -> Result<Self, TweetError> {
        let f = Fields::new(Self::RECORD, value)?;

        Ok(Self {
            id: f.required_id("id")?,
            text: f.string("text"),
            created_at: f.date("created_at"),
            sender_id: f.u64("sender_id"),
            sender_screen_name: f.string("sender_screen_name"),
            recipient_id: f.u64("recipient_id"),
            recipient_screen_name: f.string("recipient_screen_name"),
            sender: f.nested("sender"),
            recipient: f.nested("recipient"),
            entities: f.entities(),
        })
    }
}

impl FromStructured for Hashtag {
    const RECORD: &'static str = "Hashtag";

    fn from_structured(value: &Value) -> Result<Self, TweetError> {
        let f = Fields::new(Self::RECORD, value)?;
        Ok(Self {
            text: f.string("text"),
            indices: f.indices(),
        })
    }
}

impl FromStructured for UrlEntity {
    const RECORD: &'static str = "UrlEntity";

    fn from_structured(value: &Value) -> Result<Self, TweetError> {
        let f = Fields::new(Self::RECORD, value)?;
        Ok(Self {
            url: f
                .opt_string("url")
                .ok_or_else(|| TweetError::missing_field(Self::RECORD, "url"))?,
            expanded_url: f.opt_string("expanded_url"),
            display_url: f.opt_string("display_url"),
            indices: f.indices(),
        })
    }
}

impl FromStructured for UserMention {
    const RECORD: &'static str = "UserMention";

    fn from_structured(value: &Value) -> Result<Self, TweetError> {
        let f = Fields::new(Self::RECORD, value)?;
        Ok(Self {
            id: f.required_id("id")?,
            screen_name: f.string("screen_name"),
            name: f.string("name"),
            indices: f.indices(),
        })
    }
}
