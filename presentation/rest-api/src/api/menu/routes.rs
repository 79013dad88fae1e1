use std::sync::Arc;

use poem_openapi::{ApiResponse, OpenApi, payload::Json};

use business::domain::menu::use_cases::decode::{DecodeMenuParams, DecodeMenuUseCase};

use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::menu::dto::{DecodeMenuRequest, DecodedMenuResponse};
use crate::api::tags::ApiTags;

pub struct MenuApi {
    decode_use_case: Arc<dyn DecodeMenuUseCase>,
}

impl MenuApi {
    pub fn new(decode_use_case: Arc<dyn DecodeMenuUseCase>) -> Self {
        Self { decode_use_case }
    }
}

/// Menu API
///
/// Turns a photographed menu into a short list of illustrated dishes.
#[OpenApi]
impl MenuApi {
    /// Decode a menu photo
    ///
    /// Extracts up to five dishes from the image and attaches a picture to
    /// each one. Per-dish illustration failures are reported in the dish's
    /// `error` field and do not fail the request.
    #[oai(path = "/api/decode-menu", method = "post", tag = "ApiTags::Menu")]
    async fn decode_menu(&self, body: Json<DecodeMenuRequest>) -> DecodeMenuResponse {
        let params = DecodeMenuParams {
            image: body.0.image,
            language: body.0.language,
        };

        match self.decode_use_case.execute(params).await {
            Ok(menu) => DecodeMenuResponse::Ok(Json(menu.into())),
            Err(err) => {
                let (status, json) = err.into_error_response();
                if status.is_client_error() {
                    DecodeMenuResponse::BadRequest(json)
                } else {
                    DecodeMenuResponse::InternalError(json)
                }
            }
        }
    }

    /// CORS preflight
    #[oai(path = "/api/decode-menu", method = "options", tag = "ApiTags::Menu")]
    async fn decode_menu_preflight(&self) -> PreflightResponse {
        PreflightResponse::Ok
    }
}

#[derive(ApiResponse)]
#[oai(bad_request_handler = "invalid_request_body")]
pub enum DecodeMenuResponse {
    #[oai(status = 200)]
    Ok(Json<DecodedMenuResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

fn invalid_request_body(_: poem::Error) -> DecodeMenuResponse {
    DecodeMenuResponse::BadRequest(Json(ErrorResponse::new("Invalid request body")))
}

#[derive(ApiResponse)]
pub enum PreflightResponse {
    #[oai(status = 200)]
    Ok,
}
