//! Permissive CORS for browser callers
//!
//! Every response carries the allow headers, including error responses, and
//! pre-flight `OPTIONS` requests are answered here without reaching a route.

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
};

/// Value of `Access-Control-Allow-Origin`
pub const ALLOW_ORIGIN: &str = "*";

/// Value of `Access-Control-Allow-Methods`
pub const ALLOW_METHODS: &str = "POST, OPTIONS";

/// Value of `Access-Control-Allow-Headers`
pub const ALLOW_HEADERS: &str = "Content-Type, X-UDP-Host, X-UDP-Port";

/// Middleware adding CORS headers and short-circuiting pre-flight requests
pub async fn cors(req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::OK;
        response
    } else {
        next.run(req).await
    };

    apply_cors_headers(&mut response);
    response
}

/// Insert the CORS headers into `response`
pub fn apply_cors_headers(response: &mut Response) {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}
