use crate::core::config::TwitterConfig;
use crate::core::errors::TweetError;
use crate::core::kernel::request::percent_encode;
use base64::engine::general_purpose;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::RngCore;
use reqwest::Method;
use secrecy::{ExposeSecret, Secret};
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

/// Authenticator trait for request signing
///
/// Implementations are shared between concurrent operations and must not keep
/// per-call mutable state.
pub trait Authenticator: Send + Sync {
    /// Produce the `Authorization` header value for a request
    ///
    /// # Arguments
    /// * `url` - Resource URL without query string
    /// * `method` - HTTP method
    /// * `params` - Decoded query or form parameters sent with the request
    fn sign(
        &self,
        url: &str,
        method: &Method,
        params: &[(String, String)],
    ) -> Result<String, TweetError>;
}

/// OAuth 1.0a HMAC-SHA1 signer for user-context requests
pub struct OAuth1Signer {
    consumer_key: Secret<String>,
    consumer_secret: Secret<String>,
    access_token: Secret<String>,
    access_token_secret: Secret<String>,
}

impl std::fmt::Debug for OAuth1Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth1Signer").finish_non_exhaustive()
    }
}

impl OAuth1Signer {
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
        }
    }

    pub fn from_config(config: &TwitterConfig) -> Self {
        Self {
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
            access_token: config.access_token.clone(),
            access_token_secret: config.access_token_secret.clone(),
        }
    }

    /// Sign with an explicit timestamp and nonce
    pub fn sign_with(
        &self,
        url: &str,
        method: &Method,
        params: &[(String, String)],
        timestamp: u64,
        nonce: &str,
    ) -> Result<String, TweetError> {
        let mut oauth_params = vec![
            (
                "oauth_consumer_key".to_string(),
                self.consumer_key.expose_secret().clone(),
            ),
            ("oauth_nonce".to_string(), nonce.to_string()),
            (
                "oauth_signature_method".to_string(),
                "HMAC-SHA1".to_string(),
            ),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            (
                "oauth_token".to_string(),
                self.access_token.expose_secret().clone(),
            ),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];

        let base_string = signature_base_string(method, url, &oauth_params, params);
        let signing_key = format!(
            "{}&{}",
            percent_encode(self.consumer_secret.expose_secret()),
            percent_encode(self.access_token_secret.expose_secret())
        );

        let mut mac = Hmac::<Sha1>::new_from_slice(signing_key.as_bytes()).map_err(|e| {
            TweetError::AuthenticationRequired(format!("Invalid signing key: {}", e))
        })?;
        mac.update(base_string.as_bytes());
        let signature = general_purpose::STANDARD.encode(mac.finalize().into_bytes());

        oauth_params.push(("oauth_signature".to_string(), signature));

        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", header))
    }
}

impl Authenticator for OAuth1Signer {
    fn sign(
        &self,
        url: &str,
        method: &Method,
        params: &[(String, String)],
    ) -> Result<String, TweetError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| {
                TweetError::AuthenticationRequired(format!("Failed to get timestamp: {}", e))
            })?;

        self.sign_with(url, method, params, timestamp, &generate_nonce())
    }
}

/// `METHOD&url&params` with parameters sorted by encoded key, then encoded value
fn signature_base_string(
    method: &Method,
    url: &str,
    oauth_params: &[(String, String)],
    params: &[(String, String)],
) -> String {
    let mut encoded: Vec<(String, String)> = oauth_params
        .iter()
        .chain(params)
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str().to_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    )
}

fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_signer() -> OAuth1Signer {
        OAuth1Signer::new(
            "xvz1evFS4wEEPTGEFPHBog".to_string(),
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".to_string(),
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".to_string(),
        )
    }

    #[test]
    fn test_reference_signature() {
        let params = vec![
            ("include_entities".to_string(), "true".to_string()),
            (
                "status".to_string(),
                "Hello Ladies + Gentlemen, a signed OAuth request!".to_string(),
            ),
        ];

        let header = reference_signer()
            .sign_with(
                "https://api.twitter.com/1.1/statuses/update.json",
                &Method::POST,
                &params,
                1_318_622_958,
                "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            )
            .unwrap();

        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(header.contains("oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
        assert!(header.contains("oauth_timestamp=\"1318622958\""));
    }

    #[test]
    fn test_base_string_sorts_and_encodes() {
        let base = signature_base_string(
            &Method::GET,
            "https://api.twitter.com/1/statuses/mentions.json",
            &[("oauth_nonce".to_string(), "n".to_string())],
            &[
                ("since_id".to_string(), "5".to_string()),
                ("count".to_string(), "20".to_string()),
            ],
        );

        assert_eq!(
            base,
            "GET&https%3A%2F%2Fapi.twitter.com%2F1%2Fstatuses%2Fmentions.json&count%3D20%26oauth_nonce%3Dn%26since_id%3D5"
        );
    }

    #[test]
    fn test_nonce_is_random_hex() {
        let a = generate_nonce();
        let b = generate_nonce();

        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sign_uses_fresh_nonce() {
        let signer = reference_signer();
        let first = signer
            .sign("https://api.twitter.com/1/x.json", &Method::GET, &[])
            .unwrap();
        let second = signer
            .sign("https://api.twitter.com/1/x.json", &Method::GET, &[])
            .unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_debug_hides_credentials() {
        let debug = format!("{:?}", reference_signer());
        assert!(!debug.contains("xvz1evFS4wEEPTGEFPHBog"));
    }
}
