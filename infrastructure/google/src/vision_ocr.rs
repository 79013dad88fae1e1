use std::sync::Arc;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde_json::json;

use business::domain::logger::Logger;
use business::domain::menu::errors::{ExtractionFailure, MenuError};
use business::domain::menu::model::ExtractionResult;
use business::domain::menu::services::MenuExtractorService;
use business::domain::menu::value_objects::{MenuImage, TargetLanguage};

use crate::client::{API_KEY_HEADER, GoogleClient, error_message, transport_error};
use crate::credentials::ServiceAccountTokenProvider;

pub const PROVIDER: &str = "google-vision";

#[derive(Debug, Default, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<AnnotateStatus>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct AnnotateStatus {
    #[serde(default)]
    message: String,
}

/// OCR extraction through Cloud Vision `TEXT_DETECTION`.
///
/// Tries the service account first and falls back once to the API key.
pub struct VisionOcrExtractor {
    client: Arc<GoogleClient>,
    service_account: Option<ServiceAccountTokenProvider>,
    api_key: Option<String>,
    logger: Arc<dyn Logger>,
}

impl VisionOcrExtractor {
    pub fn new(
        client: Arc<GoogleClient>,
        service_account: Option<ServiceAccountTokenProvider>,
        api_key: Option<String>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            client,
            service_account,
            api_key,
            logger,
        }
    }

    fn annotate_body(image: &MenuImage) -> serde_json::Value {
        json!({
            "requests": [{
                "image": { "content": image.base64() },
                "features": [{ "type": "TEXT_DETECTION" }],
            }]
        })
    }

    /// The first annotation holds the full text; later ones are single words.
    fn parse_lines(data: AnnotateResponse) -> Result<Vec<String>, String> {
        let Some(first) = data.responses.into_iter().next() else {
            return Ok(vec![]);
        };

        if let Some(full_text) = first.text_annotations.into_iter().next() {
            return Ok(full_text
                .description
                .lines()
                .map(str::to_string)
                .collect());
        }

        match first.error {
            Some(status) => Err(status.message),
            None => Ok(vec![]),
        }
    }

    async fn annotate(
        &self,
        request: RequestBuilder,
        image: &MenuImage,
    ) -> Result<Vec<String>, String> {
        let response = request
            .json(&Self::annotate_body(image))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_message(response).await);
        }

        let data: AnnotateResponse = response.json().await.map_err(transport_error)?;
        Self::parse_lines(data)
    }

    async fn detect_with_service_account(
        &self,
        provider: &ServiceAccountTokenProvider,
        image: &MenuImage,
    ) -> Result<Vec<String>, String> {
        let token = provider.access_token().await?;
        let request = self
            .client
            .client
            .post(self.client.vision_annotate_url())
            .bearer_auth(token);
        self.annotate(request, image).await
    }

    async fn detect_with_api_key(
        &self,
        api_key: &str,
        image: &MenuImage,
    ) -> Result<Vec<String>, String> {
        let request = self
            .client
            .client
            .post(self.client.vision_annotate_url())
            .header(API_KEY_HEADER, api_key);
        self.annotate(request, image).await
    }
}

#[async_trait]
impl MenuExtractorService for VisionOcrExtractor {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn extract(
        &self,
        image: &MenuImage,
        _language: &TargetLanguage,
    ) -> Result<ExtractionResult, MenuError> {
        let provider_error = |message: String| -> MenuError {
            ExtractionFailure::ProviderError {
                provider: PROVIDER.to_string(),
                message,
            }
            .into()
        };

        let mut service_account_error = None;
        if let Some(service_account) = &self.service_account {
            match self.detect_with_service_account(service_account, image).await {
                Ok(lines) => return Ok(ExtractionResult::Lines(lines)),
                Err(message) => {
                    self.logger.warn(&format!(
                        "{} service account {} failed, trying API key: {}",
                        PROVIDER,
                        service_account.client_email(),
                        message
                    ));
                    service_account_error = Some(message);
                }
            }
        }

        let Some(api_key) = self.api_key.as_deref() else {
            self.logger
                .error(&format!("{}: no working credentials found", PROVIDER));
            return Err(match service_account_error {
                Some(message) => provider_error(message),
                None => ExtractionFailure::NoCredentials.into(),
            });
        };

        self.detect_with_api_key(api_key, image)
            .await
            .map(ExtractionResult::Lines)
            .map_err(provider_error)
    }
}
