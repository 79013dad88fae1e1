use std::time::Duration;

use anyhow::anyhow;

const DEFAULT_ILLUSTRATION_TIMEOUT_SECS: u64 = 30;

/// Where dish names come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Cloud Vision text detection followed by the line filter.
    Ocr,
    /// Gemini structured output, translated into the target language.
    Structured,
}

impl std::str::FromStr for ExtractionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ocr" => Ok(ExtractionStrategy::Ocr),
            "structured" => Ok(ExtractionStrategy::Structured),
            other => Err(format!("Invalid extraction strategy: {}", other)),
        }
    }
}

/// Where dish pictures come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllustrationStrategy {
    Search,
    Generate,
}

impl std::str::FromStr for IllustrationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "search" => Ok(IllustrationStrategy::Search),
            "generate" => Ok(IllustrationStrategy::Generate),
            other => Err(format!("Invalid illustration strategy: {}", other)),
        }
    }
}

/// Pipeline configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct MenuConfig {
    pub extraction: ExtractionStrategy,
    pub illustration: IllustrationStrategy,
    pub mock_mode: bool,
    pub illustration_timeout: Duration,
}

impl MenuConfig {
    /// Environment variables:
    /// - MENU_EXTRACTION_STRATEGY: "ocr" or "structured" (default: "ocr")
    /// - MENU_ILLUSTRATION_STRATEGY: "search" or "generate" (default: "search")
    /// - MENU_MOCK_MODE: "true" to serve placeholder images (default: false)
    /// - MENU_ILLUSTRATION_TIMEOUT_SECS: per-dish timeout (default: 30)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let extraction = lookup("MENU_EXTRACTION_STRATEGY")
            .map(|v| v.parse::<ExtractionStrategy>())
            .transpose()
            .map_err(|e| anyhow!(e))?
            .unwrap_or(ExtractionStrategy::Ocr);

        let illustration = lookup("MENU_ILLUSTRATION_STRATEGY")
            .map(|v| v.parse::<IllustrationStrategy>())
            .transpose()
            .map_err(|e| anyhow!(e))?
            .unwrap_or(IllustrationStrategy::Search);

        let mock_mode = lookup("MENU_MOCK_MODE")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let timeout_secs = match lookup("MENU_ILLUSTRATION_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| anyhow!("Invalid MENU_ILLUSTRATION_TIMEOUT_SECS: {}", v))?,
            None => DEFAULT_ILLUSTRATION_TIMEOUT_SECS,
        };

        Ok(Self {
            extraction,
            illustration,
            mock_mode,
            illustration_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
