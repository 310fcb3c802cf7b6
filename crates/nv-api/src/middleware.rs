//! Request middleware: ids, metrics and CORS.
use crate::state::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use nv_core::RequestContext;
use tower_http::cors::CorsLayer;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
pub const TRACE_ID_HEADER: HeaderName = HeaderName::from_static("x-trace-id");

pub fn cors() -> CorsLayer {
    CorsLayer::permissive()
}

/// Attaches a [`RequestContext`] to the request and echoes its ids on the response.
/// An incoming `x-trace-id` is kept; the request id is always fresh.
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ctx = match req
        .headers()
        .get(&TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        Some(trace_id) => RequestContext::with_trace(trace_id),
        None => RequestContext::new(),
    };
    tracing::debug!(
        request_id = %ctx.request_id,
        trace_id = %ctx.trace_id,
        method = %req.method(),
        path = %req.uri().path(),
        "request received"
    );
    req.extensions_mut().insert(ctx.clone());

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&ctx.request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&ctx.trace_id) {
        headers.insert(TRACE_ID_HEADER, value);
    }
    response
}

/// Counts every response by method and status.
pub async fn track_requests(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let method = req.method().as_str().to_string();
    let response = next.run(req).await;
    state.metrics.observe(&method, response.status().as_u16());
    response
}
