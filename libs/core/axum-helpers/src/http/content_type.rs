use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// Content type stamped by [`force_json_content_type`]
pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Middleware that labels every response as UTF-8 JSON, whatever its body.
///
/// For clients that expect one content type from every route, including the
/// plain-text messages.
pub async fn force_json_content_type(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));
    response
}
