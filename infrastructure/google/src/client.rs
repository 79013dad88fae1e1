use reqwest::{Client, Response};
use serde::Deserialize;

const VISION_BASE_URL: &str = "https://vision.googleapis.com";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const SEARCH_BASE_URL: &str = "https://www.googleapis.com";

/// Header carrying API keys. Keeps keys out of URLs and therefore out of
/// transport error messages.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Shared Google HTTP client configuration.
pub struct GoogleClient {
    pub client: Client,
    pub vision_base_url: String,
    pub gemini_base_url: String,
    pub search_base_url: String,
}

impl GoogleClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            vision_base_url: VISION_BASE_URL.to_string(),
            gemini_base_url: GEMINI_BASE_URL.to_string(),
            search_base_url: SEARCH_BASE_URL.to_string(),
        }
    }

    /// Points every endpoint at one base URL.
    pub fn with_base_url(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            vision_base_url: base_url.clone(),
            gemini_base_url: base_url.clone(),
            search_base_url: base_url,
            ..Self::new()
        }
    }

    /// Returns the Vision `images:annotate` endpoint URL.
    pub fn vision_annotate_url(&self) -> String {
        format!("{}/v1/images:annotate", self.vision_base_url)
    }

    /// Returns the Gemini `generateContent` endpoint URL for a model.
    pub fn generate_content_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.gemini_base_url, model
        )
    }

    /// Returns the Custom Search JSON API endpoint URL.
    pub fn custom_search_url(&self) -> String {
        format!("{}/customsearch/v1", self.search_base_url)
    }
}

impl Default for GoogleClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Pulls `error.message` out of a Google error body.
pub fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty())
}

/// Describes a non-success response, preferring Google's own message.
pub async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    parse_error_message(&body).unwrap_or_else(|| format!("HTTP {}", status))
}

/// Renders a transport error without the request URL.
pub fn transport_error(err: reqwest::Error) -> String {
    err.without_url().to_string()
}
