//! `GET /api/exchange-rates`: proxy to the CRC/USD rate provider.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
pub use pressroom_shared::exchange_rate::{
    DEFAULT_EXCHANGE_RATE_API_URL, DEFAULT_EXCHANGE_RATE_TIMEOUT_MS,
};
use pressroom_shared::exchange_rate::ExchangeRateError;

use crate::{handlers::ErrorResponse, state::AppState};

pub const EXCHANGE_RATE_CACHE_CONTROL: &str = "public, max-age=300, stale-while-revalidate=60";

pub async fn exchange_rates(State(state): State<AppState>) -> Response {
    match state.rates.fetch().await {
        Ok(rates) => (
            [(header::CACHE_CONTROL, EXCHANGE_RATE_CACHE_CONTROL)],
            Json(rates),
        )
            .into_response(),
        Err(err) => {
            match &err {
                ExchangeRateError::Timeout(_) => tracing::error!("exchange rate api timeout"),
                other => tracing::error!("exchange rate api error: {other}"),
            }
            error_response(&err)
        },
    }
}

/// Generic body and status for `err`; details stay in the logs.
fn error_response(err: &ExchangeRateError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: err.public_message().to_string(),
            code: status.as_u16(),
        }),
    )
        .into_response()
}
