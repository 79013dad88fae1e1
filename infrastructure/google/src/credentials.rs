use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::client::{error_message, transport_error};

pub const CLOUD_VISION_SCOPE: &str = "https://www.googleapis.com/auth/cloud-vision";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The parts of a Google service-account key file needed to mint tokens.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("credentials.invalid_json: {e}"))
    }

    pub fn from_file(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("credentials.unreadable_file {}: {e}", path.display()))?;
        Self::from_json(&raw)
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Exchanges a service-account key for OAuth2 access tokens and caches the
/// token until shortly before it expires.
pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
    scope: String,
    http: Client,
    cache: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenProvider {
    pub fn new(key: ServiceAccountKey, scope: &str, http: Client) -> Self {
        Self {
            key,
            scope: scope.to_string(),
            http,
            cache: Mutex::new(None),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, String> {
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: self.scope.clone(),
            aud: self.key.token_uri.clone(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| format!("credentials.invalid_private_key: {e}"))?;

        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| format!("credentials.signing_failed: {e}"))
    }

    /// Returns a cached token or fetches a fresh one.
    pub async fn access_token(&self) -> Result<String, String> {
        let mut cache = self.cache.lock().await;
        let now = Utc::now();

        if let Some(token) = cache.as_ref()
            && token.expires_at > now
        {
            return Ok(token.value.clone());
        }

        let assertion = self.sign_assertion(now)?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(format!(
                "credentials.token_exchange_failed: {}",
                error_message(response).await
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| format!("credentials.token_parse_failed: {}", transport_error(e)))?;

        let lifetime = (token.expires_in - REFRESH_MARGIN_SECS).max(0);
        *cache = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: now + Duration::seconds(lifetime),
        });

        Ok(token.access_token)
    }
}
