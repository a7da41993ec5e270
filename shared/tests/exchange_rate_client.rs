use std::time::Duration;

use pressroom_shared::exchange_rate::{ExchangeRateClient, ExchangeRateError};
use serde_json::json;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer, timeout: Duration) -> ExchangeRateClient {
    ExchangeRateClient::new(&format!("{}/api", server.uri()), timeout).expect("build client")
}

#[tokio::test]
async fn fetch_sends_json_accept_and_normalizes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .and(header("accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "compra": 501.5, "venta": "507.25" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let rates = client_for(&server, Duration::from_secs(2))
        .fetch()
        .await
        .expect("rates");
    assert_eq!(rates.venta, 507.25);
    assert_eq!(rates.fecha, None);
}

#[tokio::test]
async fn zero_or_text_rates_are_invalid_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "compra": 0, "venta": "n/a" })))
        .mount(&server)
        .await;

    let err = client_for(&server, Duration::from_secs(2))
        .fetch()
        .await
        .expect_err("zero rate must be rejected");
    assert!(matches!(err, ExchangeRateError::InvalidPayload(_)));
    assert_eq!(err.status_code(), 502);
}

#[tokio::test]
async fn upstream_error_maps_to_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server, Duration::from_secs(2))
        .fetch()
        .await
        .expect_err("503 must fail");
    assert!(matches!(err, ExchangeRateError::UpstreamStatus(503)));
    assert_eq!(err.status_code(), 502);
    assert_eq!(err.public_message(), "Failed to fetch exchange rates");
}

#[tokio::test]
async fn slow_upstream_maps_to_gateway_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "compra": 501.5, "venta": 507.25 }))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, Duration::from_millis(100))
        .fetch()
        .await
        .expect_err("must time out");
    assert!(matches!(err, ExchangeRateError::Timeout(_)));
    assert_eq!(err.status_code(), 504);
    assert_eq!(err.public_message(), "Request timeout");
}

#[tokio::test]
async fn non_json_body_is_an_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>down</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server, Duration::from_secs(2))
        .fetch()
        .await
        .expect_err("html is not json");
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.public_message(), "Internal server error");
}
