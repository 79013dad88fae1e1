use async_trait::async_trait;

use super::errors::MenuError;
use super::model::{ExtractionResult, IllustrationOutcome, MenuItem};
use super::value_objects::{MenuImage, TargetLanguage};

/// Service port for reading dishes out of a menu photo.
///
/// Implementations either return raw OCR lines or schema-validated dish
/// records; the pipeline decides what to do with each.
#[async_trait]
pub trait MenuExtractorService: Send + Sync {
    /// Short provider name used in logs.
    fn provider(&self) -> &'static str;

    async fn extract(
        &self,
        image: &MenuImage,
        language: &TargetLanguage,
    ) -> Result<ExtractionResult, MenuError>;
}

/// Service port for obtaining one picture per dish.
#[async_trait]
pub trait IllustratorService: Send + Sync {
    fn provider(&self) -> &'static str;

    /// Checked once per request before any item is illustrated.
    fn ensure_configured(&self) -> Result<(), MenuError>;

    /// Single attempt, failures are returned as data.
    async fn illustrate(&self, item: &MenuItem) -> IllustrationOutcome;
}
