use std::path::{Path, PathBuf};

const DEFAULT_KEY_FILE: &str = "service-account.json";
const DEFAULT_EXTRACTION_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// How the Vision service account is provided.
#[derive(Debug, Clone, PartialEq)]
pub enum VisionCredentials {
    /// Key file contents passed directly in the environment.
    Inline(String),
    KeyFile(PathBuf),
}

/// Credentials and model names for the Google adapters.
#[derive(Clone, Default)]
pub struct GoogleConfig {
    pub vision_credentials: Option<VisionCredentials>,
    pub vision_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub search_api_key: Option<String>,
    pub search_engine_id: Option<String>,
    pub extraction_model: String,
    pub image_model: String,
}

impl GoogleConfig {
    /// Environment variables:
    /// - GOOGLE_CLOUD_VISION_CREDENTIALS: inline service-account JSON or key file path
    ///   (default: GOOGLE_APPLICATION_CREDENTIALS, then ./service-account.json if present)
    /// - GOOGLE_API_KEY: Vision REST fallback and Gemini key
    /// - GEMINI_API_KEY: overrides GOOGLE_API_KEY for Gemini
    /// - GOOGLE_CUSTOM_SEARCH_KEY: image search key (default: GOOGLE_API_KEY)
    /// - GOOGLE_CUSTOM_SEARCH_ENGINE_ID or SEARCH_ENGINE_ID: search engine id
    /// - GEMINI_EXTRACTION_MODEL / GEMINI_IMAGE_MODEL: model names
    ///
    /// Values containing `YOUR_` are template leftovers and count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let vision_credentials = match secret(&lookup, &["GOOGLE_CLOUD_VISION_CREDENTIALS"]) {
            Some(value) if value.trim_start().starts_with('{') => {
                Some(VisionCredentials::Inline(value))
            }
            Some(path) => Some(VisionCredentials::KeyFile(PathBuf::from(path))),
            None => secret(&lookup, &["GOOGLE_APPLICATION_CREDENTIALS"])
                .map(PathBuf::from)
                .or_else(|| {
                    let default = Path::new(DEFAULT_KEY_FILE);
                    default.exists().then(|| default.to_path_buf())
                })
                .map(VisionCredentials::KeyFile),
        };

        Self {
            vision_credentials,
            vision_api_key: secret(&lookup, &["GOOGLE_API_KEY"]),
            gemini_api_key: secret(&lookup, &["GEMINI_API_KEY", "GOOGLE_API_KEY"]),
            search_api_key: secret(&lookup, &["GOOGLE_CUSTOM_SEARCH_KEY", "GOOGLE_API_KEY"]),
            search_engine_id: secret(
                &lookup,
                &["GOOGLE_CUSTOM_SEARCH_ENGINE_ID", "SEARCH_ENGINE_ID"],
            ),
            extraction_model: lookup("GEMINI_EXTRACTION_MODEL")
                .unwrap_or_else(|| DEFAULT_EXTRACTION_MODEL.to_string()),
            image_model: lookup("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
        }
    }
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("GoogleConfig")
            .field(
                "vision_credentials",
                &match &self.vision_credentials {
                    Some(VisionCredentials::Inline(_)) => "inline".to_string(),
                    Some(VisionCredentials::KeyFile(path)) => path.display().to_string(),
                    None => "<unset>".to_string(),
                },
            )
            .field("vision_api_key", &set(&self.vision_api_key))
            .field("gemini_api_key", &set(&self.gemini_api_key))
            .field("search_api_key", &set(&self.search_api_key))
            .field("search_engine_id", &set(&self.search_engine_id))
            .field("extraction_model", &self.extraction_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}

/// First non-blank value among `names`, skipping template placeholders.
fn secret(lookup: &impl Fn(&str) -> Option<String>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        let value = lookup(name)?.trim().to_string();
        if value.is_empty() {
            return None;
        }
        if value.contains("YOUR_") {
            tracing::warn!("{} holds a template placeholder, treating it as unset", name);
            return None;
        }
        Some(value)
    })
}
