use super::errors::{IllustrationFailure, MenuError};
use super::value_objects::{MenuImage, TargetLanguage};
use crate::domain::shared::value_objects::RequestId;

/// Outcome of one illustration attempt: an image (URL or data URI), no
/// match, or a failure to surface on the item.
pub type IllustrationOutcome = Result<Option<String>, IllustrationFailure>;

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub dish: String,
    pub price: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub error: Option<String>,
}

impl MenuItem {
    pub fn new(
        dish: impl Into<String>,
        price: Option<String>,
        description: Option<String>,
    ) -> Result<Self, MenuError> {
        let dish = dish.into();
        if dish.trim().is_empty() {
            return Err(MenuError::DishEmpty);
        }

        Ok(Self {
            dish: dish.trim().to_string(),
            price: non_blank(price),
            description: non_blank(description),
            image: None,
            error: None,
        })
    }

    pub fn from_line(line: impl Into<String>) -> Result<Self, MenuError> {
        Self::new(line, None, None)
    }

    /// Attaches the illustration outcome. Items are not modified afterwards.
    pub fn illustrated(self, outcome: IllustrationOutcome) -> Self {
        match outcome {
            Ok(image) => Self {
                image,
                error: None,
                ..self
            },
            Err(failure) => Self {
                image: None,
                error: Some(failure.to_string()),
                ..self
            },
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// What an extraction strategy hands to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    /// Raw text lines in detection order; still need filtering.
    Lines(Vec<String>),
    /// Dish records produced by a schema-constrained model.
    Items(Vec<MenuItem>),
}

/// Everything one decode request needs. Never shared between requests.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub image: MenuImage,
    pub language: TargetLanguage,
}

/// Final payload returned to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMenu {
    pub results: Vec<MenuItem>,
    pub search_warning: Option<String>,
}

impl DecodedMenu {
    /// Zips outcomes back onto the items they were produced for.
    ///
    /// The warning carries the first recorded error, and only when no item
    /// ended up with an image.
    pub fn assemble(items: Vec<MenuItem>, outcomes: Vec<IllustrationOutcome>) -> Self {
        let results: Vec<MenuItem> = items
            .into_iter()
            .zip(outcomes)
            .map(|(item, outcome)| item.illustrated(outcome))
            .collect();

        let has_images = results.iter().any(|item| item.image.is_some());
        let search_warning = if has_images {
            None
        } else {
            results
                .iter()
                .filter_map(|item| item.error.as_deref())
                .find(|error| !error.is_empty())
                .map(str::to_string)
        };

        Self {
            results,
            search_warning,
        }
    }

    pub fn illustrated_count(&self) -> usize {
        self.results.iter().filter(|i| i.image.is_some()).count()
    }
}
