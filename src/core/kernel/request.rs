use crate::core::errors::TweetError;
use crate::core::kernel::signer::Authenticator;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Everything except the RFC 3986 unreserved set: ALPHA / DIGIT / "-" / "." / "_" / "~"
const RFC3986_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string for use in a query string, form body or OAuth signature.
pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, RFC3986_ENCODE_SET).to_string()
}

/// Wire format of a response, selected by the resource extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

impl ResponseFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A non-blank screen name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScreenName(String);

impl ScreenName {
    /// `None` for an empty or whitespace-only name
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let trimmed = name.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScreenName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user an operation targets.
///
/// Numeric id and screen name are mutually exclusive; the variant the caller
/// picks decides which parameter is sent. Neither variant can hold an unset
/// value, so an operation that takes a target always identifies someone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserTarget {
    Id(NonZeroU64),
    ScreenName(ScreenName),
}

impl UserTarget {
    /// `None` for the zero id
    pub fn id(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self::Id)
    }

    /// `None` for a blank name
    pub fn screen_name(name: impl Into<String>) -> Option<Self> {
        ScreenName::new(name).map(Self::ScreenName)
    }

    /// Encoded form for use inside a resource path
    pub fn path_segment(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::ScreenName(name) => percent_encode(name.as_str()),
        }
    }
}

impl From<NonZeroU64> for UserTarget {
    fn from(id: NonZeroU64) -> Self {
        Self::Id(id)
    }
}

impl From<ScreenName> for UserTarget {
    fn from(name: ScreenName) -> Self {
        Self::ScreenName(name)
    }
}

/// Ordered request parameters with the unset-sentinel rules applied on insertion.
///
/// Values are stored decoded; encoding happens once in [`QueryParams::encode`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Numeric identifier; zero is the unset sentinel
    pub fn id(&mut self, key: &str, id: u64) -> &mut Self {
        if id != 0 {
            self.pairs.push((key.to_string(), id.to_string()));
        }
        self
    }

    /// Count or page number; zero means "server default"
    pub fn count(&mut self, key: &str, count: u32) -> &mut Self {
        if count != 0 {
            self.pairs.push((key.to_string(), count.to_string()));
        }
        self
    }

    /// Boolean flag, sent as the literal "true" only when set
    pub fn flag(&mut self, key: &str, set: bool) -> &mut Self {
        if set {
            self.pairs.push((key.to_string(), "true".to_string()));
        }
        self
    }

    /// Free text or opaque token; empty is the unset sentinel
    pub fn text(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.pairs.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// `user_id` or `screen_name`, depending on the target variant
    pub fn target(&mut self, target: &UserTarget) -> &mut Self {
        match target {
            UserTarget::Id(id) => self.id("user_id", id.get()),
            UserTarget::ScreenName(name) => self.text("screen_name", name.as_str()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// `key=value&...` with each key and value percent-encoded individually
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A fully specified, signed HTTP request. Immutable once built.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    method: Method,
    resource_url: String,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    format: ResponseFormat,
}

impl SignedRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// URL including the query string (GET) or bare resource URL (POST)
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resource URL without any query string, as covered by the signature
    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    /// Query string portion of the URL, without the leading '?'
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, q)| q)
    }
}

/// Turns an endpoint path and parameter set into a [`SignedRequest`].
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    base_url: &'a str,
    format: ResponseFormat,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(base_url: &'a str, format: ResponseFormat) -> Self {
        Self { base_url, format }
    }

    /// `{base}/{path}.{json|xml}`
    pub fn resource_url(&self, path: &str) -> String {
        format!(
            "{}/{}.{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/'),
            self.format.extension()
        )
    }

    /// Build the request, signing it when an authenticator is supplied.
    ///
    /// GET parameters go into the query string; POST parameters become an
    /// `application/x-www-form-urlencoded` body.
    pub fn build(
        &self,
        method: Method,
        path: &str,
        params: &QueryParams,
        authenticator: Option<&dyn Authenticator>,
    ) -> Result<SignedRequest, TweetError> {
        let resource_url = self.resource_url(path);
        let encoded = params.encode();

        let mut headers = vec![(
            "Accept".to_string(),
            self.format.content_type().to_string(),
        )];

        if let Some(authenticator) = authenticator {
            let auth_header = authenticator.sign(&resource_url, &method, params.pairs())?;
            headers.push(("Authorization".to_string(), auth_header));
        }

        let (url, body) = if method == Method::GET || method == Method::DELETE {
            let url = if encoded.is_empty() {
                resource_url.clone()
            } else {
                format!("{}?{}", resource_url, encoded)
            };
            (url, None)
        } else {
            headers.push((
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ));
            (resource_url.clone(), Some(encoded.into_bytes()))
        };

        Ok(SignedRequest {
            method,
            resource_url,
            url,
            headers,
            body,
            format: self.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StaticAuth;

    impl Authenticator for StaticAuth {
        fn sign(
            &self,
            url: &str,
            method: &Method,
            params: &[(String, String)],
        ) -> Result<String, TweetError> {
            Ok(format!("Test {} {} {}", method, url, params.len()))
        }
    }

    fn user(id: u64) -> UserTarget {
        UserTarget::id(id).unwrap()
    }

    fn decode_pairs(query: &str) -> HashMap<String, String> {
        let url = reqwest::Url::parse(&format!("http://localhost/?{}", query)).unwrap();
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_percent_encode_unreserved() {
        assert_eq!(percent_encode("hello world"), "hello%20world");
        assert_eq!(percent_encode("a+b=c&d"), "a%2Bb%3Dc%26d");
        assert_eq!(percent_encode("safe-_.~"), "safe-_.~");
        assert_eq!(percent_encode("ça"), "%C3%A7a");
    }

    #[test]
    fn test_sentinels_are_omitted() {
        let mut params = QueryParams::new();
        params
            .id("since_id", 0)
            .count("count", 0)
            .flag("trim_user", false)
            .text("cursor", "");

        assert!(params.is_empty());
        assert_eq!(params.encode(), "");
    }

    #[test]
    fn test_flags_never_serialize_false() {
        let mut params = QueryParams::new();
        params.flag("include_entities", true).flag("exclude_replies", false);

        assert_eq!(params.get("include_entities"), Some("true"));
        assert!(!params.contains("exclude_replies"));
        assert!(!params.encode().contains("false"));
    }

    #[test]
    fn test_get_request_puts_params_in_query() {
        let mut params = QueryParams::new();
        params
            .target(&user(42))
            .text("text", "hi")
            .flag("include_entities", true);

        let request = RequestBuilder::new("https://api.twitter.com/1", ResponseFormat::Json)
            .build(Method::GET, "statuses/mentions", &params, None)
            .unwrap();

        assert_eq!(
            request.url(),
            "https://api.twitter.com/1/statuses/mentions.json?user_id=42&text=hi&include_entities=true"
        );
        assert_eq!(request.query(), Some("user_id=42&text=hi&include_entities=true"));
        assert!(request.body().is_none());
        assert!(request.header("Authorization").is_none());
        assert_eq!(request.header("accept"), Some("application/json"));
    }

    #[test]
    fn test_post_request_uses_form_body() {
        let mut params = QueryParams::new();
        params
            .target(&user(42))
            .text("text", "hi there & more")
            .flag("include_entities", true);

        let request = RequestBuilder::new("https://api.twitter.com/1/", ResponseFormat::Json)
            .build(Method::POST, "/direct_messages/new", &params, Some(&StaticAuth))
            .unwrap();

        assert_eq!(
            request.url(),
            "https://api.twitter.com/1/direct_messages/new.json"
        );
        assert_eq!(request.resource_url(), request.url());
        assert_eq!(
            request.body().unwrap(),
            b"user_id=42&text=hi%20there%20%26%20more&include_entities=true"
        );
        assert_eq!(
            request.header("Content-Type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(
            request.header("Authorization"),
            Some("Test POST https://api.twitter.com/1/direct_messages/new.json 3")
        );
        assert!(!String::from_utf8_lossy(request.body().unwrap()).contains("screen_name"));
    }

    #[test]
    fn test_query_round_trip_recovers_values() {
        let mut params = QueryParams::new();
        params
            .id("since_id", 1_234_567_890_123)
            .count("count", 200)
            .text("screen_name", "jack & jill")
            .text("cursor", "-1")
            .text("text", "100% + ünïcode ✓")
            .flag("include_rts", true)
            .flag("trim_user", false);

        let request = RequestBuilder::new("https://api.twitter.com/1", ResponseFormat::Xml)
            .build(Method::GET, "statuses/home_timeline", &params, None)
            .unwrap();
        assert!(request.url().contains("home_timeline.xml?"));

        let decoded = decode_pairs(request.query().unwrap());
        let expected: HashMap<String, String> = params.pairs().iter().cloned().collect();
        assert_eq!(decoded, expected);
        assert!(!decoded.contains_key("trim_user"));
    }

    #[test]
    fn test_screen_name_target_in_path() {
        assert_eq!(user(12).path_segment(), "12");
        assert_eq!(
            UserTarget::screen_name("a b").unwrap().path_segment(),
            "a%20b"
        );
    }

    #[test]
    fn test_unset_targets_cannot_be_built() {
        assert!(UserTarget::id(0).is_none());
        assert!(UserTarget::screen_name("").is_none());
        assert!(UserTarget::screen_name("   ").is_none());
        assert_eq!(
            ScreenName::new(" jack ").map(|n| n.to_string()),
            Some("jack".to_string())
        );

        let mut params = QueryParams::new();
        params.target(&UserTarget::screen_name("jack").unwrap());
        assert_eq!(params.encode(), "screen_name=jack");
    }
}
