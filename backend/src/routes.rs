use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::{exchange_rate, handlers, request_context, seo, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // Read-only API, open to any origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/posts", get(handlers::list_posts))
        .route("/api/posts/:slug", get(handlers::get_post))
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/exchange-rates", get(exchange_rate::exchange_rates))
        .route("/sitemap.xml", get(seo::sitemap_xml))
        .route("/robots.txt", get(seo::robots_txt))
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(request_context::request_context_middleware))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::create_router;
    use crate::{config::BackendConfig, state::AppState};

    fn post_json(id: u64, slug: &str, categories: &[u64]) -> Value {
        json!({
            "id": id,
            "slug": slug,
            "title": { "rendered": format!("Post {id}") },
            "excerpt": { "rendered": "<p>Resumen &amp; más</p>" },
            "content": { "rendered": "<p>Cuerpo</p>" },
            "date": "2024-03-15T10:00:00",
            "categories": categories,
            "_embedded": {
                "author": [{ "name": "Ana" }],
                "wp:term": [[{ "id": categories[0], "name": "Finanzas", "slug": "finance", "taxonomy": "category" }]]
            }
        })
    }

    fn categories_json() -> Value {
        json!([
            { "id": 1, "slug": "news", "name": "News", "count": 4 },
            { "id": 2, "slug": "finance", "name": "Finance", "count": 9 }
        ])
    }

    fn app_for(cms: &MockServer, rates: &MockServer) -> Router {
        let config = BackendConfig {
            wordpress_api_url: cms.uri(),
            exchange_rate_api_url: format!("{}/api", rates.uri()),
            exchange_rate_timeout: Duration::from_millis(500),
            site_base_url: "https://galileocapital.io".to_string(),
            ..BackendConfig::default()
        };
        create_router(AppState::new(config).expect("state"))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String, axum::http::HeaderMap) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, String::from_utf8(body.to_vec()).expect("utf8"), headers)
    }

    #[tokio::test]
    async fn list_posts_maps_slugs_to_ids() {
        let cms = MockServer::start().await;
        let rates = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(categories_json()))
            .mount(&cms)
            .await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("categories", "1,2"))
            .and(query_param("search", "dólar"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-WP-Total", "12")
                    .insert_header("X-WP-TotalPages", "2")
                    .set_body_json(json!([post_json(7, "dolar-hoy", &[2])])),
            )
            .expect(1)
            .mount(&cms)
            .await;

        let (status, body, headers) = get(
            app_for(&cms, &rates),
            "/api/posts?categories=news,finance,ghost&q=d%C3%B3lar",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.contains_key("x-request-id"));

        let body: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(body["pagination"]["total"], 12);
        assert_eq!(body["pagination"]["total_pages"], 2);
        assert_eq!(body["has_more"], true);
        assert_eq!(body["truncated"], false);
        assert_eq!(body["posts"][0]["href"], "/news/dolar-hoy");
        assert_eq!(body["posts"][0]["excerpt"], "Resumen & más");
        assert_eq!(body["posts"][0]["date"], "15 de marzo de 2024");
    }

    #[tokio::test]
    async fn cms_failure_is_bad_gateway() {
        let cms = MockServer::start().await;
        let rates = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(categories_json()))
            .mount(&cms)
            .await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&cms)
            .await;

        let (status, body, _) = get(app_for(&cms, &rates), "/api/posts").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let body: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(body["code"], 502);
    }

    #[tokio::test]
    async fn unfiltered_listing_does_not_need_categories() {
        let cms = MockServer::start().await;
        let rates = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(ResponseTemplate::new(503))
            .expect(0)
            .mount(&cms)
            .await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-WP-Total", "1")
                    .insert_header("X-WP-TotalPages", "1")
                    .set_body_json(json!([post_json(7, "dolar-hoy", &[2])])),
            )
            .mount(&cms)
            .await;

        let (status, body, _) = get(app_for(&cms, &rates), "/api/posts?q=tasas").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(body["posts"][0]["slug"], "dolar-hoy");
        assert_eq!(body["has_more"], false);
    }

    #[tokio::test]
    async fn unknown_sort_is_rejected() {
        let cms = MockServer::start().await;
        let rates = MockServer::start().await;
        let (status, _, _) = get(app_for(&cms, &rates), "/api/posts?sort=random").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let cms = MockServer::start().await;
        let rates = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("slug", "nope"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&cms)
            .await;

        let (status, _, _) = get(app_for(&cms, &rates), "/api/posts/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn post_detail_includes_related() {
        let cms = MockServer::start().await;
        let rates = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("slug", "dolar-hoy"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([post_json(7, "dolar-hoy", &[2])])),
            )
            .mount(&cms)
            .await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("exclude", "7"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([post_json(8, "euro-hoy", &[2])])),
            )
            .mount(&cms)
            .await;

        let (status, body, _) = get(app_for(&cms, &rates), "/api/posts/dolar-hoy").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(body["post"]["slug"], "dolar-hoy");
        assert_eq!(body["post"]["content_html"], "<p>Cuerpo</p>");
        assert_eq!(body["related"][0]["slug"], "euro-hoy");
    }

    #[tokio::test]
    async fn categories_are_served_by_count() {
        let cms = MockServer::start().await;
        let rates = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(categories_json()))
            .expect(1)
            .mount(&cms)
            .await;

        let app = app_for(&cms, &rates);
        let (status, body, _) = get(app.clone(), "/api/categories").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(body["categories"][0]["slug"], "finance");

        // Second call is served from the catalog cache.
        let (status, _, _) = get(app, "/api/categories").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn sitemap_survives_cms_outage() {
        let cms = MockServer::start().await;
        let rates = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&cms)
            .await;

        let (status, body, headers) = get(app_for(&cms, &rates), "/sitemap.xml").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-type"], "application/xml; charset=utf-8");
        assert!(body.contains("<loc>https://galileocapital.io/news</loc>"));
        assert!(!body.contains("/news/"));
    }

    #[tokio::test]
    async fn robots_names_sitemap() {
        let cms = MockServer::start().await;
        let rates = MockServer::start().await;
        let (status, body, _) = get(app_for(&cms, &rates), "/robots.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Sitemap: https://galileocapital.io/sitemap.xml"));
    }

    #[tokio::test]
    async fn exchange_rates_carry_cache_control() {
        let cms = MockServer::start().await;
        let rates = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "compra": "503.12", "venta": 509.4 })),
            )
            .mount(&rates)
            .await;

        let (status, body, headers) = get(app_for(&cms, &rates), "/api/exchange-rates").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers["cache-control"],
            "public, max-age=300, stale-while-revalidate=60"
        );
        let body: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(body["compra"], 503.12);
    }
}
