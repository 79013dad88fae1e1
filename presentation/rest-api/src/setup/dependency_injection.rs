use std::sync::Arc;

use logger::TracingLogger;

use google::client::GoogleClient;
use google::credentials::{CLOUD_VISION_SCOPE, ServiceAccountKey, ServiceAccountTokenProvider};
use google::image_generator::GeminiImageIllustrator;
use google::menu_extractor::GeminiMenuExtractor;
use google::placeholder::PlaceholderIllustrator;
use google::search_illustrator::CustomSearchIllustrator;
use google::vision_ocr::VisionOcrExtractor;

use business::application::menu::decode::DecodeMenuUseCaseImpl;
use business::domain::logger::Logger;
use business::domain::menu::services::{IllustratorService, MenuExtractorService};

use crate::api::health::routes::HealthApi;
use crate::api::menu::routes::MenuApi;
use crate::config::app_config::AppConfig;
use crate::config::google_config::{GoogleConfig, VisionCredentials};
use crate::config::menu_config::{ExtractionStrategy, IllustrationStrategy};

pub struct DependencyContainer {
    pub health_api: HealthApi,
    pub menu_api: MenuApi,
}

impl DependencyContainer {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        Self::with_google_client(config, Arc::new(GoogleClient::new()))
    }

    pub fn with_google_client(
        config: &AppConfig,
        client: Arc<GoogleClient>,
    ) -> anyhow::Result<Self> {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger);
        let health_api = HealthApi::new();

        let extractor = build_extractor(config, client.clone(), logger.clone());
        let illustrator = build_illustrator(config, client);

        logger.info(&format!(
            "Menu pipeline: extraction={} illustration={} timeout={}s",
            extractor.provider(),
            illustrator.provider(),
            config.menu.illustration_timeout.as_secs()
        ));
        if config.menu.mock_mode {
            logger.warn("MENU_MOCK_MODE is on, dishes get placeholder images");
        } else if let Err(err) = illustrator.ensure_configured() {
            logger.warn(&format!(
                "Illustrator {} is not configured, requests will fail: {:?}",
                illustrator.provider(),
                err
            ));
        }

        let decode_use_case = Arc::new(DecodeMenuUseCaseImpl {
            extractor,
            illustrator,
            logger,
            illustration_timeout: config.menu.illustration_timeout,
        });

        let menu_api = MenuApi::new(decode_use_case);

        Ok(Self {
            health_api,
            menu_api,
        })
    }
}

fn build_extractor(
    config: &AppConfig,
    client: Arc<GoogleClient>,
    logger: Arc<dyn Logger>,
) -> Arc<dyn MenuExtractorService> {
    let google = &config.google;
    match config.menu.extraction {
        ExtractionStrategy::Ocr => {
            let service_account = service_account(google, &client, logger.as_ref());
            if service_account.is_none() && google.vision_api_key.is_none() {
                logger.warn("No Vision service account or GOOGLE_API_KEY configured");
            }
            Arc::new(VisionOcrExtractor::new(
                client,
                service_account,
                google.vision_api_key.clone(),
                logger,
            ))
        }
        ExtractionStrategy::Structured => Arc::new(GeminiMenuExtractor::new(
            client,
            google.gemini_api_key.clone(),
            google.extraction_model.clone(),
            logger,
        )),
    }
}

fn build_illustrator(config: &AppConfig, client: Arc<GoogleClient>) -> Arc<dyn IllustratorService> {
    if config.menu.mock_mode {
        return Arc::new(PlaceholderIllustrator);
    }

    let google = &config.google;
    match config.menu.illustration {
        IllustrationStrategy::Search => Arc::new(CustomSearchIllustrator::new(
            client,
            google.search_api_key.clone(),
            google.search_engine_id.clone(),
        )),
        IllustrationStrategy::Generate => Arc::new(GeminiImageIllustrator::new(
            client,
            google.gemini_api_key.clone(),
            google.image_model.clone(),
        )),
    }
}

/// Loads the Vision service account. An unreadable key is logged and the
/// extractor falls back to the API key.
fn service_account(
    google: &GoogleConfig,
    client: &GoogleClient,
    logger: &dyn Logger,
) -> Option<ServiceAccountTokenProvider> {
    let key = match google.vision_credentials.as_ref()? {
        VisionCredentials::Inline(raw) => ServiceAccountKey::from_json(raw),
        VisionCredentials::KeyFile(path) => ServiceAccountKey::from_file(path),
    };

    match key {
        Ok(key) => {
            let provider =
                ServiceAccountTokenProvider::new(key, CLOUD_VISION_SCOPE, client.client.clone());
            logger.info(&format!(
                "Vision service account loaded: {}",
                provider.client_email()
            ));
            Some(provider)
        }
        Err(err) => {
            logger.warn(&format!("Ignoring Vision service account: {}", err));
            None
        }
    }
}
