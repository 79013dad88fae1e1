use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::menu::errors::{ExtractionFailure, MenuError};

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for MenuError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, message) = match self {
            MenuError::ImageMissing => (StatusCode::BAD_REQUEST, "No image provided".to_string()),
            MenuError::ImageInvalid => {
                (StatusCode::BAD_REQUEST, "Invalid image payload".to_string())
            }
            MenuError::ConfigurationMissing(detail) => {
                (StatusCode::INTERNAL_SERVER_ERROR, detail)
            }
            MenuError::Extraction(ExtractionFailure::NoCredentials) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Google Cloud Vision API Error: Missing Service Account or API Key.".to_string(),
            ),
            MenuError::Extraction(ExtractionFailure::ProviderError { provider, message }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Menu extraction failed ({}): {}", provider, message),
            ),
            MenuError::Extraction(ExtractionFailure::MalformedModelOutput) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Menu extraction returned malformed data".to_string(),
            ),
            MenuError::DishEmpty | MenuError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Processing failed".to_string(),
            ),
        };

        (status, Json(ErrorResponse::new(message)))
    }
}
