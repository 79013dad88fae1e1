use poem::http::header;
use poem::middleware::SetHeader;

/// Permissive CORS headers attached to every response
///
/// The browser client posts from any origin, so the API answers with:
/// - Access-Control-Allow-Origin: *
/// - Access-Control-Allow-Methods: POST, OPTIONS
/// - Access-Control-Allow-Headers: Content-Type
///
/// Preflight `OPTIONS` requests are answered by the menu routes themselves.
pub fn init_cors() -> SetHeader {
    SetHeader::new()
        .overriding(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .overriding(header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS")
        .overriding(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type")
}
