use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use business::domain::menu::errors::{IllustrationFailure, MenuError};
use business::domain::menu::model::{IllustrationOutcome, MenuItem};
use business::domain::menu::services::IllustratorService;

use crate::client::{API_KEY_HEADER, GoogleClient, error_message, transport_error};

pub const PROVIDER: &str = "google-custom-search";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

/// Looks up the first image result for each dish name.
pub struct CustomSearchIllustrator {
    client: Arc<GoogleClient>,
    api_key: Option<String>,
    engine_id: Option<String>,
}

impl CustomSearchIllustrator {
    pub fn new(
        client: Arc<GoogleClient>,
        api_key: Option<String>,
        engine_id: Option<String>,
    ) -> Self {
        Self {
            client,
            api_key,
            engine_id,
        }
    }

    fn first_link(data: SearchResponse) -> Option<String> {
        data.items.into_iter().next().map(|item| item.link)
    }
}

#[async_trait]
impl IllustratorService for CustomSearchIllustrator {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn ensure_configured(&self) -> Result<(), MenuError> {
        if self.api_key.is_none() {
            return Err(MenuError::ConfigurationMissing(
                "Missing Google Custom Search API Key (GOOGLE_API_KEY)".to_string(),
            ));
        }
        if self.engine_id.is_none() {
            return Err(MenuError::ConfigurationMissing(
                "Missing Google Custom Search Engine ID (GOOGLE_CUSTOM_SEARCH_ENGINE_ID)"
                    .to_string(),
            ));
        }
        Ok(())
    }

    async fn illustrate(&self, item: &MenuItem) -> IllustrationOutcome {
        let failed = |message: String| IllustrationFailure::SearchFailed { message };

        let (Some(api_key), Some(engine_id)) = (self.api_key.as_deref(), self.engine_id.as_deref())
        else {
            return Err(failed("image search is not configured".to_string()));
        };

        let response = self
            .client
            .client
            .get(self.client.custom_search_url())
            .header(API_KEY_HEADER, api_key)
            .query(&[
                ("q", item.dish.as_str()),
                ("cx", engine_id),
                ("searchType", "image"),
                ("num", "1"),
            ])
            .send()
            .await
            .map_err(|e| failed(transport_error(e)))?;

        if !response.status().is_success() {
            return Err(failed(error_message(response).await));
        }

        let data: SearchResponse = response
            .json()
            .await
            .map_err(|e| failed(transport_error(e)))?;

        Ok(Self::first_link(data))
    }
}
