use async_trait::async_trait;
use url::form_urlencoded::byte_serialize;

use business::domain::menu::errors::MenuError;
use business::domain::menu::model::{IllustrationOutcome, MenuItem};
use business::domain::menu::services::IllustratorService;

pub const PROVIDER: &str = "placeholder";

const PLACEHOLDER_BASE_URL: &str = "https://placehold.co/600x400";

/// Mock-mode illustrator: a deterministic stand-in image per dish, no
/// network calls and no credentials.
pub struct PlaceholderIllustrator;

impl PlaceholderIllustrator {
    pub fn placeholder_url(dish: &str) -> String {
        let text: String = byte_serialize(dish.as_bytes()).collect();
        format!("{}?text={}", PLACEHOLDER_BASE_URL, text)
    }
}

#[async_trait]
impl IllustratorService for PlaceholderIllustrator {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn ensure_configured(&self) -> Result<(), MenuError> {
        Ok(())
    }

    async fn illustrate(&self, item: &MenuItem) -> IllustrationOutcome {
        Ok(Some(Self::placeholder_url(&item.dish)))
    }
}
