use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::logger::Logger;
use crate::domain::menu::errors::{IllustrationFailure, MenuError};
use crate::domain::menu::line_filter::{MAX_MENU_ITEMS, PLACEHOLDER_MENU, filter_dish_lines};
use crate::domain::menu::model::{
    DecodedMenu, ExtractionResult, IllustrationOutcome, MenuItem, RequestContext,
};
use crate::domain::menu::services::{IllustratorService, MenuExtractorService};
use crate::domain::menu::use_cases::decode::{DecodeMenuParams, DecodeMenuUseCase};
use crate::domain::menu::value_objects::{MenuImage, TargetLanguage};
use crate::domain::shared::value_objects::RequestId;

/// Extract, filter, illustrate and assemble one menu photo.
pub struct DecodeMenuUseCaseImpl {
    pub extractor: Arc<dyn MenuExtractorService>,
    pub illustrator: Arc<dyn IllustratorService>,
    pub logger: Arc<dyn Logger>,
    pub illustration_timeout: Duration,
}

impl DecodeMenuUseCaseImpl {
    fn build_context(&self, params: DecodeMenuParams) -> Result<RequestContext, MenuError> {
        let request_id = RequestId::generate();
        let image = MenuImage::parse(params.image.as_deref()).inspect_err(|err| {
            self.logger
                .warn(&format!("[{}] Rejected menu image: {}", request_id, err));
        })?;

        Ok(RequestContext {
            request_id,
            image,
            language: TargetLanguage::new(params.language),
        })
    }

    fn to_menu_items(&self, ctx: &RequestContext, extraction: ExtractionResult) -> Vec<MenuItem> {
        match extraction {
            ExtractionResult::Lines(lines) => {
                let lines = if lines.is_empty() {
                    self.logger.warn(&format!(
                        "[{}] Text detection found no lines, using placeholder menu",
                        ctx.request_id
                    ));
                    PLACEHOLDER_MENU.iter().map(|l| l.to_string()).collect()
                } else {
                    lines
                };

                let dishes = filter_dish_lines(&lines);
                self.logger.debug(&format!(
                    "[{}] Kept {} of {} OCR lines",
                    ctx.request_id,
                    dishes.len(),
                    lines.len()
                ));

                dishes
                    .into_iter()
                    .filter_map(|dish| MenuItem::from_line(dish).ok())
                    .collect()
            }
            ExtractionResult::Items(items) => {
                if items.len() > MAX_MENU_ITEMS {
                    self.logger.debug(&format!(
                        "[{}] Model returned {} dishes, keeping first {}",
                        ctx.request_id,
                        items.len(),
                        MAX_MENU_ITEMS
                    ));
                }
                items.into_iter().take(MAX_MENU_ITEMS).collect()
            }
        }
    }

    /// Runs every item concurrently and waits for the whole batch. Results
    /// come back in item order.
    async fn illustrate_all(
        &self,
        ctx: &RequestContext,
        items: &[MenuItem],
    ) -> Vec<IllustrationOutcome> {
        let timeout = self.illustration_timeout;
        let handles: Vec<_> = items
            .iter()
            .cloned()
            .map(|item| {
                let illustrator = Arc::clone(&self.illustrator);
                tokio::spawn(async move {
                    tokio::time::timeout(timeout, illustrator.illustrate(&item))
                        .await
                        .unwrap_or_else(|_| {
                            Err(IllustrationFailure::GenerationUnavailable {
                                reason: format!("timed out after {}s", timeout.as_secs_f32()),
                            })
                        })
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (item, handle) in items.iter().zip(handles) {
            let outcome = handle.await.unwrap_or_else(|err| {
                Err(IllustrationFailure::GenerationUnavailable {
                    reason: format!("illustration task aborted: {}", err),
                })
            });

            if let Err(failure) = &outcome {
                self.logger.warn(&format!(
                    "[{}] {} could not illustrate '{}': {}",
                    ctx.request_id,
                    self.illustrator.provider(),
                    item.dish,
                    failure
                ));
            }
            outcomes.push(outcome);
        }

        outcomes
    }
}

#[async_trait]
impl DecodeMenuUseCase for DecodeMenuUseCaseImpl {
    async fn execute(&self, params: DecodeMenuParams) -> Result<DecodedMenu, MenuError> {
        let ctx = self.build_context(params)?;

        self.logger.info(&format!(
            "[{}] Decoding menu image ({} bytes, {}) into {}",
            ctx.request_id,
            ctx.image.byte_len(),
            ctx.image.mime_type(),
            ctx.language
        ));

        self.illustrator.ensure_configured().inspect_err(|err| {
            self.logger.error(&format!(
                "[{}] {} is not configured: {}",
                ctx.request_id,
                self.illustrator.provider(),
                err
            ));
        })?;

        let extraction = self
            .extractor
            .extract(&ctx.image, &ctx.language)
            .await
            .inspect_err(|err| {
                self.logger.error(&format!(
                    "[{}] {} extraction failed: {:?}",
                    ctx.request_id,
                    self.extractor.provider(),
                    err
                ));
            })?;

        let items = self.to_menu_items(&ctx, extraction);
        let dishes: Vec<&str> = items.iter().map(|i| i.dish.as_str()).collect();
        self.logger.info(&format!(
            "[{}] Illustrating {} dishes via {}: {}",
            ctx.request_id,
            items.len(),
            self.illustrator.provider(),
            dishes.join(", ")
        ));

        let outcomes = self.illustrate_all(&ctx, &items).await;
        let menu = DecodedMenu::assemble(items, outcomes);

        if let Some(warning) = &menu.search_warning {
            self.logger.warn(&format!(
                "[{}] No dish could be illustrated: {}",
                ctx.request_id, warning
            ));
        }
        self.logger.info(&format!(
            "[{}] Menu decoded: {} dishes, {} illustrated",
            ctx.request_id,
            menu.results.len(),
            menu.illustrated_count()
        ));

        Ok(menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu::errors::ExtractionFailure;
    use mockall::mock;

    // "hello menu" in base64
    const IMAGE: &str = "data:image/jpeg;base64,aGVsbG8gbWVudQ==";

    mock! {
        pub Extractor {}

        #[async_trait]
        impl MenuExtractorService for Extractor {
            fn provider(&self) -> &'static str;
            async fn extract(
                &self,
                image: &MenuImage,
                language: &TargetLanguage,
            ) -> Result<ExtractionResult, MenuError>;
        }
    }

    mock! {
        pub Illustrator {}

        #[async_trait]
        impl IllustratorService for Illustrator {
            fn provider(&self) -> &'static str;
            fn ensure_configured(&self) -> Result<(), MenuError>;
            async fn illustrate(&self, item: &MenuItem) -> IllustrationOutcome;
        }
    }

    mock! {
        pub Log {}

        impl Logger for Log {
            fn info(&self, message: &str);
            fn warn(&self, message: &str);
            fn error(&self, message: &str);
            fn debug(&self, message: &str);
        }
    }

    fn mock_logger() -> Arc<dyn Logger> {
        let mut logger = MockLog::new();
        logger.expect_info().returning(|_| ());
        logger.expect_warn().returning(|_| ());
        logger.expect_error().returning(|_| ());
        logger.expect_debug().returning(|_| ());
        Arc::new(logger)
    }

    fn extractor_returning(result: Result<ExtractionResult, MenuError>) -> MockExtractor {
        let mut extractor = MockExtractor::new();
        extractor.expect_provider().return_const("test-extractor");
        extractor
            .expect_extract()
            .returning(move |_, _| result.clone());
        extractor
    }

    fn search_illustrator() -> MockIllustrator {
        let mut illustrator = MockIllustrator::new();
        illustrator.expect_provider().return_const("test-illustrator");
        illustrator.expect_ensure_configured().returning(|| Ok(()));
        illustrator
    }

    fn use_case(extractor: MockExtractor, illustrator: MockIllustrator) -> DecodeMenuUseCaseImpl {
        DecodeMenuUseCaseImpl {
            extractor: Arc::new(extractor),
            illustrator: Arc::new(illustrator),
            logger: mock_logger(),
            illustration_timeout: Duration::from_secs(5),
        }
    }

    fn params() -> DecodeMenuParams {
        DecodeMenuParams {
            image: Some(IMAGE.to_string()),
            language: None,
        }
    }

    fn lines(raw: &[&str]) -> Result<ExtractionResult, MenuError> {
        Ok(ExtractionResult::Lines(
            raw.iter().map(|l| l.to_string()).collect(),
        ))
    }

    #[tokio::test]
    async fn should_filter_ocr_lines_and_illustrate_each_dish() {
        let extractor = extractor_returning(lines(&[
            "Grilled Salmon with Lemon Butter",
            "Spicy Thai Green Curry",
            "42",
            "STARTERS",
        ]));
        let mut illustrator = search_illustrator();
        illustrator
            .expect_illustrate()
            .times(2)
            .returning(|item| Ok(Some(format!("https://img/{}.jpg", item.dish.len()))));

        let menu = use_case(extractor, illustrator)
            .execute(params())
            .await
            .unwrap();

        assert_eq!(menu.results.len(), 2);
        assert_eq!(menu.results[0].dish, "Grilled Salmon with Lemon Butter");
        assert_eq!(menu.results[1].dish, "Spicy Thai Green Curry");
        assert_eq!(menu.results[0].image.as_deref(), Some("https://img/32.jpg"));
        assert!(menu.search_warning.is_none());
    }

    #[tokio::test]
    async fn should_cap_illustration_calls_to_five() {
        let extractor = extractor_returning(lines(&[
            "Dish Number One",
            "Dish Number Two",
            "Dish Number Three",
            "Dish Number Four",
            "Dish Number Five",
            "Dish Number Six",
            "Dish Number Seven",
        ]));
        let mut illustrator = search_illustrator();
        illustrator
            .expect_illustrate()
            .times(5)
            .returning(|_| Ok(None));

        let menu = use_case(extractor, illustrator)
            .execute(params())
            .await
            .unwrap();

        assert_eq!(menu.results.len(), 5);
        assert_eq!(menu.results[4].dish, "Dish Number Five");
    }

    #[tokio::test]
    async fn should_use_placeholder_menu_when_no_text_detected() {
        let extractor = extractor_returning(lines(&[]));
        let mut illustrator = search_illustrator();
        illustrator.expect_illustrate().never();

        let menu = use_case(extractor, illustrator)
            .execute(params())
            .await
            .unwrap();

        assert!(menu.results.is_empty());
        assert!(menu.search_warning.is_none());
    }

    #[tokio::test]
    async fn should_keep_structured_items_without_filtering() {
        let items = vec![
            MenuItem::new(
                "Pollo al ajillo",
                Some("12 €".to_string()),
                Some("Garlic chicken".to_string()),
            )
            .unwrap(),
            MenuItem::new("Menu", None, None).unwrap(),
        ];
        let extractor = extractor_returning(Ok(ExtractionResult::Items(items)));
        let mut illustrator = search_illustrator();
        illustrator
            .expect_illustrate()
            .times(2)
            .returning(|_| Ok(Some("data:image/png;base64,AAAA".to_string())));

        let menu = use_case(extractor, illustrator)
            .execute(params())
            .await
            .unwrap();

        assert_eq!(menu.results.len(), 2);
        assert_eq!(menu.results[0].price.as_deref(), Some("12 €"));
        assert_eq!(menu.results[1].dish, "Menu");
    }

    #[tokio::test]
    async fn should_capture_per_item_failures_as_data() {
        let extractor = extractor_returning(lines(&["Margherita Pizza", "Caesar Salad"]));
        let mut illustrator = search_illustrator();
        illustrator.expect_illustrate().returning(|item| {
            if item.dish == "Caesar Salad" {
                Err(IllustrationFailure::ContentBlocked {
                    reason: "SAFETY".to_string(),
                })
            } else {
                Ok(Some("https://img/pizza.jpg".to_string()))
            }
        });

        let menu = use_case(extractor, illustrator)
            .execute(params())
            .await
            .unwrap();

        assert_eq!(menu.results[0].image.as_deref(), Some("https://img/pizza.jpg"));
        assert!(menu.results[1].image.is_none());
        assert!(menu.results[1].error.is_some());
        assert!(menu.search_warning.is_none());
    }

    #[tokio::test]
    async fn should_warn_when_every_illustration_fails() {
        let extractor = extractor_returning(lines(&["Margherita Pizza", "Caesar Salad"]));
        let mut illustrator = search_illustrator();
        illustrator.expect_illustrate().returning(|_| {
            Err(IllustrationFailure::SearchFailed {
                message: "Daily Limit Exceeded".to_string(),
            })
        });

        let menu = use_case(extractor, illustrator)
            .execute(params())
            .await
            .unwrap();

        assert_eq!(menu.search_warning.as_deref(), Some("Daily Limit Exceeded"));
        assert_eq!(menu.results.len(), 2);
    }

    #[tokio::test]
    async fn should_reject_request_without_image() {
        let mut extractor = MockExtractor::new();
        extractor.expect_extract().never();
        let mut illustrator = MockIllustrator::new();
        illustrator.expect_ensure_configured().never();

        let result = use_case(extractor, illustrator)
            .execute(DecodeMenuParams {
                image: None,
                language: Some("French".to_string()),
            })
            .await;

        assert_eq!(result.unwrap_err(), MenuError::ImageMissing);
    }

    #[tokio::test]
    async fn should_abort_before_extraction_when_illustrator_unconfigured() {
        let mut extractor = MockExtractor::new();
        extractor.expect_extract().never();
        let mut illustrator = MockIllustrator::new();
        illustrator.expect_provider().return_const("test-illustrator");
        illustrator.expect_ensure_configured().returning(|| {
            Err(MenuError::ConfigurationMissing(
                "Missing search key".to_string(),
            ))
        });

        let result = use_case(extractor, illustrator).execute(params()).await;

        assert!(matches!(
            result.unwrap_err(),
            MenuError::ConfigurationMissing(_)
        ));
    }

    #[tokio::test]
    async fn should_abort_without_partial_menu_when_extraction_fails() {
        let extractor =
            extractor_returning(Err(ExtractionFailure::MalformedModelOutput.into()));
        let mut illustrator = search_illustrator();
        illustrator.expect_illustrate().never();

        let result = use_case(extractor, illustrator).execute(params()).await;

        assert_eq!(
            result.unwrap_err(),
            MenuError::Extraction(ExtractionFailure::MalformedModelOutput)
        );
    }

    #[tokio::test]
    async fn should_pass_target_language_to_extractor() {
        let mut extractor = MockExtractor::new();
        extractor.expect_provider().return_const("test-extractor");
        extractor
            .expect_extract()
            .withf(|image, language| language.as_str() == "Japanese" && image.byte_len() == 10)
            .returning(|_, _| Ok(ExtractionResult::Items(vec![])));
        let illustrator = search_illustrator();

        let result = use_case(extractor, illustrator)
            .execute(DecodeMenuParams {
                image: Some(IMAGE.to_string()),
                language: Some("Japanese".to_string()),
            })
            .await;

        assert!(result.unwrap().results.is_empty());
    }

    struct SlowIllustrator;

    #[async_trait]
    impl IllustratorService for SlowIllustrator {
        fn provider(&self) -> &'static str {
            "slow"
        }

        fn ensure_configured(&self) -> Result<(), MenuError> {
            Ok(())
        }

        async fn illustrate(&self, item: &MenuItem) -> IllustrationOutcome {
            if item.dish == "Slow Braised Short Rib" {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            Ok(Some(format!("https://img/{}.jpg", item.dish.len())))
        }
    }

    #[tokio::test]
    async fn should_treat_timeout_as_unavailable_without_affecting_other_items() {
        let extractor = extractor_returning(lines(&["Slow Braised Short Rib", "Quick Bruschetta"]));
        let use_case = DecodeMenuUseCaseImpl {
            extractor: Arc::new(extractor),
            illustrator: Arc::new(SlowIllustrator),
            logger: mock_logger(),
            illustration_timeout: Duration::from_millis(50),
        };

        let menu = use_case.execute(params()).await.unwrap();

        assert!(menu.results[0].image.is_none());
        assert!(
            menu.results[0]
                .error
                .as_deref()
                .is_some_and(|e| e.starts_with("Image generation unavailable"))
        );
        assert!(menu.results[1].image.is_some());
        assert!(menu.search_warning.is_none());
    }
}
