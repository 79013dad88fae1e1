use std::sync::LazyLock;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use regex::Regex;

use super::errors::MenuError;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";
const DEFAULT_LANGUAGE: &str = "English";

static DATA_URI_HEADER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^data:(image/[\w.+-]+);base64,").ok());

/// Menu photo received from the client, validated and stripped of its
/// data URI header.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuImage {
    base64: String,
    mime_type: String,
    byte_len: usize,
}

impl MenuImage {
    /// Accepts a `data:image/<type>;base64,` URI or bare base64.
    pub fn parse(raw: Option<&str>) -> Result<Self, MenuError> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(MenuError::ImageMissing);
        }

        let (mime_type, payload) = DATA_URI_HEADER
            .as_ref()
            .and_then(|re| re.captures(raw))
            .and_then(|caps| {
                let header = caps.get(0)?;
                let mime = caps.get(1)?;
                Some((mime.as_str().to_string(), &raw[header.end()..]))
            })
            .unwrap_or_else(|| (DEFAULT_MIME_TYPE.to_string(), raw));

        let base64: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(base64.as_bytes())
            .map_err(|_| MenuError::ImageInvalid)?;
        if bytes.is_empty() {
            return Err(MenuError::ImageInvalid);
        }

        Ok(Self {
            base64,
            mime_type,
            byte_len: bytes.len(),
        })
    }

    pub fn base64(&self) -> &str {
        &self.base64
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

/// Language the dish names and descriptions should be translated into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLanguage(String);

impl TargetLanguage {
    /// Blank or absent input falls back to English.
    pub fn new(language: Option<String>) -> Self {
        match language {
            Some(lang) if !lang.trim().is_empty() => Self(lang.trim().to_string()),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TargetLanguage {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
