use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use business::domain::menu::errors::{IllustrationFailure, MenuError};
use business::domain::menu::model::{IllustrationOutcome, MenuItem};
use business::domain::menu::services::IllustratorService;

use crate::client::{API_KEY_HEADER, GoogleClient, error_message, transport_error};
use crate::gemini::GenerateContentResponse;

pub const PROVIDER: &str = "gemini-image";

/// Finish reasons Gemini reports when a safety filter removed the output.
const SAFETY_FINISH_REASONS: [&str; 6] = [
    "SAFETY",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
    "IMAGE_SAFETY",
    "IMAGE_PROHIBITED_CONTENT",
];

/// Generates a food photograph for each dish with a Gemini image model.
pub struct GeminiImageIllustrator {
    client: Arc<GoogleClient>,
    api_key: Option<String>,
    model: String,
}

impl GeminiImageIllustrator {
    pub fn new(client: Arc<GoogleClient>, api_key: Option<String>, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    fn build_prompt(item: &MenuItem) -> String {
        let subject = match &item.description {
            Some(description) => format!("{}, {}", item.dish, description),
            None => item.dish.clone(),
        };
        format!(
            "A delicious plate of {}. Gourmet food photography, high resolution, \
             soft lighting, appetizing restaurant presentation, no text",
            subject
        )
    }

    fn request_body(item: &MenuItem) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": Self::build_prompt(item) }],
            }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"],
            },
        })
    }

    /// Turns a response into a data URI, or explains why there is none.
    fn to_outcome(data: &GenerateContentResponse) -> IllustrationOutcome {
        if let Some(image) = data.first_inline_image() {
            return Ok(Some(format!(
                "data:{};base64,{}",
                image.mime_type, image.data
            )));
        }

        if let Some(reason) = data.block_reason() {
            return Err(IllustrationFailure::ContentBlocked {
                reason: reason.to_string(),
            });
        }

        match data.finish_reason() {
            Some(reason) if SAFETY_FINISH_REASONS.contains(&reason) => {
                Err(IllustrationFailure::ContentBlocked {
                    reason: reason.to_string(),
                })
            }
            Some(reason) => Err(IllustrationFailure::GenerationUnavailable {
                reason: format!("no image returned (finish reason {})", reason),
            }),
            None => Err(IllustrationFailure::GenerationUnavailable {
                reason: "no image returned".to_string(),
            }),
        }
    }
}

#[async_trait]
impl IllustratorService for GeminiImageIllustrator {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn ensure_configured(&self) -> Result<(), MenuError> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(MenuError::ConfigurationMissing(
                "Gemini API key is not configured (GOOGLE_API_KEY)".to_string(),
            )),
        }
    }

    async fn illustrate(&self, item: &MenuItem) -> IllustrationOutcome {
        let unavailable = |reason: String| IllustrationFailure::GenerationUnavailable { reason };

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| unavailable("missing API key".to_string()))?;

        let response = self
            .client
            .client
            .post(self.client.generate_content_url(&self.model))
            .header(API_KEY_HEADER, api_key)
            .json(&Self::request_body(item))
            .send()
            .await
            .map_err(|e| unavailable(transport_error(e)))?;

        if !response.status().is_success() {
            return Err(unavailable(error_message(response).await));
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| unavailable(transport_error(e)))?;

        Self::to_outcome(&data)
    }
}
