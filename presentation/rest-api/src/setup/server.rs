use std::sync::Arc;

use poem::http::{StatusCode, header};
use poem::{
    Endpoint, EndpointExt, IntoResponse, Request, Response, Route, Server as PoemServer,
    listener::TcpListener, middleware::Tracing,
};
use poem_openapi::OpenApiService;
use tokio::io::AsyncReadExt;

use crate::api::error::{any_error, method_not_allowed};
use crate::{config::app_config::AppConfig, setup::dependency_injection::DependencyContainer};

pub struct Server;

impl Server {
    pub fn build_app(config: AppConfig, container: DependencyContainer) -> impl Endpoint + 'static {
        let addr = config.server.bind_address();
        let max_body_bytes = config.server.max_body_bytes;
        let api_service = OpenApiService::new(
            (container.health_api, container.menu_api),
            "Menu Decoder API",
            env!("CARGO_PKG_VERSION"),
        )
        .server(format!("http://{}", addr));
        let ui = api_service.swagger_ui();
        let spec = api_service.spec_endpoint();

        Route::new()
            .nest("/", api_service)
            .nest("/docs", ui)
            .nest("/openapi.json", spec)
            .around(move |ep, req| limit_body(ep, req, max_body_bytes))
            .catch_error(method_not_allowed)
            .catch_all_error(any_error)
            .with(config.cors)
            .with(Tracing)
    }

    pub async fn run(config: AppConfig, container: DependencyContainer) -> anyhow::Result<()> {
        let addr = config.server.bind_address();
        let app = Self::build_app(config, container);
        tracing::info!("Server running at http://{}", addr);
        tracing::info!("Swagger UI at http://{}/docs", addr);
        tracing::info!("OpenAPI JSON at http://{}/openapi.json", addr);
        PoemServer::new(TcpListener::bind(&addr)).run(app).await?;
        Ok(())
    }
}

/// Rejects requests whose body exceeds `max` bytes. A declared
/// `Content-Length` is checked up front; streamed bodies are read at most
/// one byte past the limit.
async fn limit_body<E: Endpoint>(
    ep: Arc<E>,
    mut req: Request,
    max: usize,
) -> poem::Result<Response> {
    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());

    if declared.is_some_and(|len| len > max) {
        return Err(poem::Error::from_status(StatusCode::PAYLOAD_TOO_LARGE));
    }

    let mut buf = Vec::new();
    req.take_body()
        .into_async_read()
        .take(max as u64 + 1)
        .read_to_end(&mut buf)
        .await
        .map_err(|err| poem::Error::new(err, StatusCode::BAD_REQUEST))?;

    if buf.len() > max {
        return Err(poem::Error::from_status(StatusCode::PAYLOAD_TOO_LARGE));
    }
    req.set_body(buf);

    Ok(ep.call(req).await?.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use poem::listener::{Acceptor, Listener};
    use poem::test::TestClient;
    use poem::endpoint::make_sync;
    use poem::{Body, post};
    use poem::web::Json;
    use serde_json::{Value, json};

    use business::domain::menu::errors::MenuError;
    use business::domain::menu::model::{DecodedMenu, MenuItem};
    use business::domain::menu::use_cases::decode::{DecodeMenuParams, DecodeMenuUseCase};
    use google::client::GoogleClient;

    use crate::api::health::routes::HealthApi;
    use crate::api::menu::routes::MenuApi;

    const PNG_DATA_URI: &str = "data:image/png;base64,aGVsbG8gbWVudQ==";

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(move |name| vars.get(name).cloned()).unwrap()
    }

    /// Answers every decode with one fixed dish.
    struct FixedMenu;

    #[async_trait]
    impl DecodeMenuUseCase for FixedMenu {
        async fn execute(&self, params: DecodeMenuParams) -> Result<DecodedMenu, MenuError> {
            if params.image.is_none() {
                return Err(MenuError::ImageMissing);
            }
            let item = MenuItem::new("Paella Valenciana", Some("18 €".to_string()), None)?;
            Ok(DecodedMenu::assemble(
                vec![item],
                vec![Ok(Some("https://img.example/paella.jpg".to_string()))],
            ))
        }
    }

    fn stub_app() -> impl Endpoint {
        let container = DependencyContainer {
            health_api: HealthApi::new(),
            menu_api: MenuApi::new(Arc::new(FixedMenu)),
        };
        Server::build_app(config(&[("MAX_BODY_BYTES", "1024")]), container)
    }

    async fn body_json(resp: poem::test::TestResponse) -> Value {
        resp.0.into_body().into_json::<Value>().await.unwrap()
    }

    /// Serves a fake Gemini endpoint answering with `text` and returns a
    /// client pointed at it.
    async fn fake_gemini(text: &'static str) -> Arc<GoogleClient> {
        let generate = make_sync(move |_| {
            Json(json!({
                "candidates": [{ "content": { "parts": [{ "text": text }] } }]
            }))
        });

        let acceptor = TcpListener::bind("127.0.0.1:0")
            .into_acceptor()
            .await
            .unwrap();
        let addr = *acceptor.local_addr()[0].as_socket_addr().unwrap();
        let app = Route::new().at(
            "/v1beta/models/gemini-2.5-flash:generateContent",
            post(generate),
        );
        tokio::spawn(PoemServer::new_with_acceptor(acceptor).run(app));

        Arc::new(GoogleClient::with_base_url(&format!("http://{}", addr)))
    }

    async fn structured_app(text: &'static str) -> impl Endpoint {
        let config = config(&[
            ("MENU_EXTRACTION_STRATEGY", "structured"),
            ("MENU_MOCK_MODE", "true"),
            ("GEMINI_API_KEY", "test-key"),
        ]);
        let container =
            DependencyContainer::with_google_client(&config, fake_gemini(text).await).unwrap();
        Server::build_app(config, container)
    }

    #[tokio::test]
    async fn should_reject_request_without_image() {
        let cli = TestClient::new(stub_app());

        let resp = cli
            .post("/api/decode-menu")
            .body_json(&json!({ "language": "Spanish" }))
            .send()
            .await;

        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.assert_header("access-control-allow-origin", "*");
        resp.assert_json(json!({ "error": "No image provided" })).await;
    }

    #[tokio::test]
    async fn should_answer_preflight_with_cors_headers_and_empty_body() {
        let cli = TestClient::new(stub_app());

        let resp = cli.options("/api/decode-menu").send().await;

        resp.assert_status_is_ok();
        resp.assert_header("access-control-allow-origin", "*");
        resp.assert_header("access-control-allow-methods", "POST, OPTIONS");
        resp.assert_header("access-control-allow-headers", "Content-Type");
        resp.assert_text("").await;
    }

    #[tokio::test]
    async fn should_reject_other_methods_with_json_error() {
        let cli = TestClient::new(stub_app());

        let resp = cli.get("/api/decode-menu").send().await;

        resp.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        resp.assert_header("access-control-allow-origin", "*");
        resp.assert_json(json!({ "error": "Method Not Allowed" })).await;
    }

    #[tokio::test]
    async fn should_reject_unparsable_body() {
        let cli = TestClient::new(stub_app());

        let resp = cli
            .post("/api/decode-menu")
            .content_type("application/json")
            .body("{\"image\": ")
            .send()
            .await;

        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.assert_json(json!({ "error": "Invalid request body" })).await;
    }

    #[tokio::test]
    async fn should_reject_oversized_body() {
        let cli = TestClient::new(stub_app());

        let resp = cli
            .post("/api/decode-menu")
            .content_type("application/json")
            .header("content-length", "4096")
            .body("{}")
            .send()
            .await;

        resp.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        resp.assert_json(json!({ "error": "Request body too large" }))
            .await;
    }

    fn streamed(body: String) -> Body {
        Body::from_async_read(std::io::Cursor::new(body.into_bytes()))
    }

    #[tokio::test]
    async fn should_reject_streamed_body_over_limit_without_content_length() {
        let cli = TestClient::new(stub_app());
        let oversized = json!({ "image": "A".repeat(100_000) }).to_string();

        let resp = cli
            .post("/api/decode-menu")
            .content_type("application/json")
            .body(streamed(oversized))
            .send()
            .await;

        resp.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        resp.assert_header("access-control-allow-origin", "*");
        resp.assert_json(json!({ "error": "Request body too large" }))
            .await;
    }

    #[tokio::test]
    async fn should_accept_streamed_body_within_limit() {
        let cli = TestClient::new(stub_app());
        let body = json!({ "image": PNG_DATA_URI }).to_string();

        let resp = cli
            .post("/api/decode-menu")
            .content_type("application/json")
            .body(streamed(body))
            .send()
            .await;

        resp.assert_status_is_ok();
        let body = body_json(resp).await;
        assert_eq!(body["results"][0]["dish"], "Paella Valenciana");
    }

    #[tokio::test]
    async fn should_return_decoded_menu() {
        let cli = TestClient::new(stub_app());

        let resp = cli
            .post("/api/decode-menu")
            .body_json(&json!({ "image": PNG_DATA_URI }))
            .send()
            .await;

        resp.assert_status_is_ok();
        resp.assert_json(json!({
            "results": [{
                "dish": "Paella Valenciana",
                "price": "18 €",
                "image": "https://img.example/paella.jpg"
            }],
            "searchWarning": null
        }))
        .await;
    }

    #[tokio::test]
    async fn should_report_health() {
        let cli = TestClient::new(stub_app());

        let resp = cli.get("/health").send().await;

        resp.assert_status_is_ok();
        let body = body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn should_decode_structured_menu_with_placeholder_images() {
        let app = structured_app(
            r#"[{"dish":"Tortilla de patatas","price":"9 €","description":"Potato omelette"},{"dish":"Gazpacho","price":"","description":""}]"#,
        )
        .await;
        let cli = TestClient::new(app);

        let resp = cli
            .post("/api/decode-menu")
            .body_json(&json!({ "image": PNG_DATA_URI, "language": "English" }))
            .send()
            .await;

        resp.assert_status_is_ok();
        let body = body_json(resp).await;
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["dish"], "Tortilla de patatas");
        assert_eq!(results[0]["description"], "Potato omelette");
        assert_eq!(
            results[0]["image"],
            "https://placehold.co/600x400?text=Tortilla+de+patatas"
        );
        assert!(results[1].get("price").is_none());
        assert!(body["searchWarning"].is_null());
    }

    #[tokio::test]
    async fn should_fail_whole_request_on_truncated_structured_output() {
        let app = structured_app(r#"[{"dish":"Tortilla de patatas","price":"9 €","desc"#).await;
        let cli = TestClient::new(app);

        let resp = cli
            .post("/api/decode-menu")
            .body_json(&json!({ "image": PNG_DATA_URI }))
            .send()
            .await;

        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        resp.assert_json(json!({ "error": "Menu extraction returned malformed data" }))
            .await;
    }
}
