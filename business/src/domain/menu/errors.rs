/// Failures raised while turning a menu image into dish candidates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionFailure {
    #[error("extraction.no_credentials")]
    NoCredentials,
    #[error("extraction.provider_error")]
    ProviderError { provider: String, message: String },
    #[error("extraction.malformed_model_output")]
    MalformedModelOutput,
}

/// Request-level errors for the menu decoding pipeline.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MenuError {
    #[error("menu.image_missing")]
    ImageMissing,
    #[error("menu.image_invalid")]
    ImageInvalid,
    #[error("menu.dish_empty")]
    DishEmpty,
    #[error("menu.configuration_missing")]
    ConfigurationMissing(String),
    #[error("menu.extraction_failed")]
    Extraction(#[from] ExtractionFailure),
    #[error("menu.internal")]
    Internal,
}

/// Per-item illustration failure. Never aborts a request.
///
/// The display text ends up in the item's `error` field, so it is written
/// for people rather than for log parsers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IllustrationFailure {
    #[error("Image generation was blocked by the safety filter ({reason})")]
    ContentBlocked { reason: String },
    #[error("Image generation unavailable: {reason}")]
    GenerationUnavailable { reason: String },
    #[error("{message}")]
    SearchFailed { message: String },
}
