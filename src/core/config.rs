use crate::core::kernel::ResponseFormat;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com/1";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct TwitterConfig {
    pub consumer_key: Secret<String>,
    pub consumer_secret: Secret<String>,
    pub access_token: Secret<String>,
    pub access_token_secret: Secret<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
    pub user_agent: Option<String>,
    pub format: ResponseFormat,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for TwitterConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("TwitterConfig", 8)?;
        state.serialize_field("consumer_key", "[REDACTED]")?;
        state.serialize_field("consumer_secret", "[REDACTED]")?;
        state.serialize_field("access_token", "[REDACTED]")?;
        state.serialize_field("access_token_secret", "[REDACTED]")?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.serialize_field("user_agent", &self.user_agent)?;
        state.serialize_field("format", &self.format)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for TwitterConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct TwitterConfigHelper {
            #[serde(default)]
            consumer_key: String,
            #[serde(default)]
            consumer_secret: String,
            #[serde(default)]
            access_token: String,
            #[serde(default)]
            access_token_secret: String,
            base_url: Option<String>,
            #[serde(default = "default_timeout_seconds")]
            timeout_seconds: u64,
            user_agent: Option<String>,
            #[serde(default)]
            format: ResponseFormat,
        }

        let helper = TwitterConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            consumer_key: Secret::new(helper.consumer_key),
            consumer_secret: Secret::new(helper.consumer_secret),
            access_token: Secret::new(helper.access_token),
            access_token_secret: Secret::new(helper.access_token_secret),
            base_url: helper.base_url,
            timeout_seconds: helper.timeout_seconds,
            user_agent: helper.user_agent,
            format: helper.format,
        })
    }
}

const fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl TwitterConfig {
    /// Create a new configuration with OAuth 1.0a user-context credentials
    #[must_use]
    pub fn new(
        consumer_key: String,
        consumer_secret: String,
        access_token: String,
        access_token_secret: String,
    ) -> Self {
        Self {
            consumer_key: Secret::new(consumer_key),
            consumer_secret: Secret::new(consumer_secret),
            access_token: Secret::new(access_token),
            access_token_secret: Secret::new(access_token_secret),
            base_url: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: None,
            format: ResponseFormat::Json,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_CONSUMER_KEY`
    /// - `{PREFIX}_CONSUMER_SECRET`
    /// - `{PREFIX}_ACCESS_TOKEN`
    /// - `{PREFIX}_ACCESS_TOKEN_SECRET`
    /// - `{PREFIX}_BASE_URL` (optional)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let var = |suffix: &str| {
            let name = format!("{}_{}", prefix, suffix);
            env::var(&name).map_err(|_| ConfigError::MissingEnvironmentVariable(name))
        };

        let mut config = Self::new(
            var("CONSUMER_KEY")?,
            var("CONSUMER_SECRET")?,
            var("ACCESS_TOKEN")?,
            var("ACCESS_TOKEN_SECRET")?,
        );
        config.base_url = var("BASE_URL").ok();

        Ok(config)
    }

    /// Create configuration from a .env file and environment variables
    ///
    /// A missing .env file is not an error; the process environment is used as-is.
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Configuration for public endpoints only; no authenticator is installed
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new(), String::new(), String::new())
    }

    /// Check if this configuration carries a complete OAuth credential set
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.consumer_key.expose_secret().is_empty()
            && !self.consumer_secret.expose_secret().is_empty()
            && !self.access_token.expose_secret().is_empty()
            && !self.access_token_secret.expose_secret().is_empty()
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the default response format for operations built from this config
    #[must_use]
    pub const fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Base URL with any trailing slash removed
    pub fn resolved_base_url(&self) -> Result<String, ConfigError> {
        let base_url = self
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');

        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(ConfigError::InvalidConfiguration(format!(
                "Base URL must be http(s): {}",
                base_url
            )));
        }

        Ok(base_url.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
