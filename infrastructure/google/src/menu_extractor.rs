use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use business::domain::logger::Logger;
use business::domain::menu::errors::{ExtractionFailure, MenuError};
use business::domain::menu::model::{ExtractionResult, MenuItem};
use business::domain::menu::services::MenuExtractorService;
use business::domain::menu::value_objects::{MenuImage, TargetLanguage};

use crate::client::{API_KEY_HEADER, GoogleClient, error_message, transport_error};
use crate::gemini::GenerateContentResponse;

pub const PROVIDER: &str = "gemini";

/// One record of the enforced output schema. Every field is required.
#[derive(Debug, Deserialize)]
struct StructuredDish {
    dish: String,
    price: String,
    description: String,
}

/// Structured extraction: a multimodal model reads the menu and returns
/// schema-constrained dish records, translated into the target language.
pub struct GeminiMenuExtractor {
    client: Arc<GoogleClient>,
    api_key: Option<String>,
    model: String,
    logger: Arc<dyn Logger>,
}

impl GeminiMenuExtractor {
    pub fn new(
        client: Arc<GoogleClient>,
        api_key: Option<String>,
        model: String,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            logger,
        }
    }

    fn build_prompt(language: &TargetLanguage) -> String {
        format!(
            "You are reading a photographed restaurant menu. List every dish on it.\n\
             - \"dish\": the dish name translated into {lang}. If it is already in {lang}, keep it unchanged.\n\
             - \"description\": the dish description translated into {lang}, or an empty string if the menu gives none.\n\
             - \"price\": the price exactly as printed, including the currency symbol, or an empty string if none is shown.\n\
             Do not include section headers, restaurant details or drinks lists without dishes.",
            lang = language
        )
    }

    fn response_schema() -> serde_json::Value {
        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "dish": { "type": "STRING" },
                    "price": { "type": "STRING" },
                    "description": { "type": "STRING" },
                },
                "required": ["dish", "price", "description"],
            }
        })
    }

    fn request_body(image: &MenuImage, language: &TargetLanguage) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": image.mime_type(),
                            "data": image.base64(),
                        }
                    },
                    { "text": Self::build_prompt(language) },
                ],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": Self::response_schema(),
                "temperature": 0.1,
            },
        })
    }

    /// Strict parse: anything that is not a complete array of schema records
    /// is rejected as a whole.
    fn parse_dishes(text: &str) -> Result<Vec<StructuredDish>, ExtractionFailure> {
        serde_json::from_str(text.trim()).map_err(|_| ExtractionFailure::MalformedModelOutput)
    }

    fn provider_error(message: String) -> MenuError {
        ExtractionFailure::ProviderError {
            provider: PROVIDER.to_string(),
            message,
        }
        .into()
    }
}

#[async_trait]
impl MenuExtractorService for GeminiMenuExtractor {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn extract(
        &self,
        image: &MenuImage,
        language: &TargetLanguage,
    ) -> Result<ExtractionResult, MenuError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            MenuError::ConfigurationMissing(
                "Gemini API key is not configured (GOOGLE_API_KEY)".to_string(),
            )
        })?;

        let response = self
            .client
            .client
            .post(self.client.generate_content_url(&self.model))
            .header(API_KEY_HEADER, api_key)
            .json(&Self::request_body(image, language))
            .send()
            .await
            .map_err(|e| Self::provider_error(transport_error(e)))?;

        if !response.status().is_success() {
            return Err(Self::provider_error(error_message(response).await));
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Self::provider_error(transport_error(e)))?;

        if let Some(reason) = data.block_reason() {
            return Err(Self::provider_error(format!("prompt blocked: {}", reason)));
        }

        let text = data
            .text()
            .ok_or(ExtractionFailure::MalformedModelOutput)?;
        let records = Self::parse_dishes(&text)?;

        let total = records.len();
        let items: Vec<MenuItem> = records
            .into_iter()
            .filter_map(|r| MenuItem::new(r.dish, Some(r.price), Some(r.description)).ok())
            .collect();

        if items.len() < total {
            self.logger.warn(&format!(
                "{} returned {} records with a blank dish, dropped",
                PROVIDER,
                total - items.len()
            ));
        }

        Ok(ExtractionResult::Items(items))
    }
}
