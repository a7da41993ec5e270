use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use pressroom_shared::sitemap::{render_robots, render_sitemap};

use crate::state::AppState;

/// GET /sitemap.xml
pub async fn sitemap_xml(State(state): State<AppState>) -> Response {
    // Lenient: a CMS outage still yields the static pages.
    let slugs = state.cms.all_post_slugs().await;
    tracing::debug!(posts = slugs.len(), "sitemap generated");

    let xml = render_sitemap(&state.config.site_base_url, &slugs);
    (StatusCode::OK, [(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml)
        .into_response()
}

/// GET /robots.txt
pub async fn robots_txt(State(state): State<AppState>) -> Response {
    let body = render_robots(&state.config.site_base_url);
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}
