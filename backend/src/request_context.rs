use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Tag each request with an id (caller-supplied or generated), run it inside
/// a span carrying that id and echo the id back on the response.
pub async fn request_context_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty() && value.len() <= 128)
        .map(ToOwned::to_owned)
        .unwrap_or_else(next_request_id);

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );
    let started_at = Instant::now();

    let mut response = next.run(request).instrument(span.clone()).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    let status = response.status();
    if status.is_server_error() {
        tracing::warn!(
            parent: &span,
            status = status.as_u16(),
            elapsed_ms = started_at.elapsed().as_millis(),
            "request completed"
        );
    } else {
        tracing::info!(
            parent: &span,
            status = status.as_u16(),
            elapsed_ms = started_at.elapsed().as_millis(),
            "request completed"
        );
    }

    response
}

fn next_request_id() -> String {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or_default();
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("pr-{now_ms:x}-{counter:06x}")
}

#[cfg(test)]
mod tests {
    use super::next_request_id;

    #[test]
    fn generated_ids_are_unique() {
        let first = next_request_id();
        let second = next_request_id();
        assert!(first.starts_with("pr-"));
        assert_ne!(first, second);
    }
}
