//! CRC/USD exchange-rate client with payload validation.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

/// Default rate provider.
pub const DEFAULT_EXCHANGE_RATE_API_URL: &str = "https://tipodecambio.paginasweb.cr/api";
/// Default upstream timeout.
pub const DEFAULT_EXCHANGE_RATE_TIMEOUT_MS: u64 = 8000;

const UPSTREAM_USER_AGENT: &str = "Mozilla/5.0 (compatible; Galileo-Finance/1.0)";

/// Normalized rate payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRates {
    /// Buy rate.
    pub compra: f64,
    /// Sell rate.
    pub venta: f64,
    /// Provider date, passed through as sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha: Option<Value>,
    /// When the rates were fetched (RFC 3339, UTC).
    pub timestamp: String,
}

/// Why a rate lookup failed.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeRateError {
    /// Provider answered with a non-success status.
    #[error("exchange rate api returned HTTP {0}")]
    UpstreamStatus(u16),
    /// `compra`/`venta` missing, zero or not numeric.
    #[error("invalid exchange rate data: {0}")]
    InvalidPayload(String),
    /// No answer within the configured timeout.
    #[error("exchange rate api timed out after {0:?}")]
    Timeout(Duration),
    /// Anything else: transport, non-JSON body, client setup.
    #[error("exchange rate request failed: {0}")]
    Internal(String),
}

impl ExchangeRateError {
    /// HTTP status a proxy should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ExchangeRateError::UpstreamStatus(_) | ExchangeRateError::InvalidPayload(_) => 502,
            ExchangeRateError::Timeout(_) => 504,
            ExchangeRateError::Internal(_) => 500,
        }
    }

    /// Message safe to show clients; details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ExchangeRateError::UpstreamStatus(_) => "Failed to fetch exchange rates",
            ExchangeRateError::InvalidPayload(_) => "Invalid exchange rate data",
            ExchangeRateError::Timeout(_) => "Request timeout",
            ExchangeRateError::Internal(_) => "Internal server error",
        }
    }
}

/// Client for the rate provider.
#[derive(Clone, Debug)]
pub struct ExchangeRateClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl ExchangeRateClient {
    /// Client for `url`; whole lookups are bounded by `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ExchangeRateError> {
        let http = reqwest::Client::builder()
            .user_agent(UPSTREAM_USER_AGENT)
            .build()
            .map_err(|err| ExchangeRateError::Internal(err.to_string()))?;
        Ok(Self {
            http,
            url: url.to_string(),
            timeout,
        })
    }

    /// Provider URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and validate the current rates.
    pub async fn fetch(&self) -> Result<ExchangeRates, ExchangeRateError> {
        let payload = tokio::time::timeout(self.timeout, self.fetch_payload())
            .await
            .map_err(|_| ExchangeRateError::Timeout(self.timeout))??;
        normalize(&payload)
    }

    async fn fetch_payload(&self) -> Result<Value, ExchangeRateError> {
        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeRateError::UpstreamStatus(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| self.transport_error(err))
    }

    fn transport_error(&self, err: reqwest::Error) -> ExchangeRateError {
        if err.is_timeout() {
            ExchangeRateError::Timeout(self.timeout)
        } else {
            ExchangeRateError::Internal(err.to_string())
        }
    }
}

/// Validate `compra`/`venta` and stamp the response time.
///
/// Rates arrive as numbers or numeric strings; missing, zero or non-numeric
/// values reject the whole payload.
pub fn normalize(payload: &Value) -> Result<ExchangeRates, ExchangeRateError> {
    let rate = |field: &str| {
        parse_rate(payload.get(field))
            .ok_or_else(|| ExchangeRateError::InvalidPayload(format!("bad `{field}` in {payload}")))
    };
    let compra = rate("compra")?;
    let venta = rate("venta")?;

    Ok(ExchangeRates {
        compra,
        venta,
        fecha: payload.get("fecha").filter(|value| !value.is_null()).cloned(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

fn parse_rate(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (number.is_finite() && number != 0.0).then_some(number)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::normalize;

    #[test]
    fn normalize_accepts_numeric_strings() {
        let rates = normalize(&json!({ "compra": "503.12", "venta": 509.4, "fecha": "2024-06-02" }))
            .expect("valid payload");
        assert_eq!(rates.compra, 503.12);
        assert_eq!(rates.venta, 509.4);
        assert_eq!(rates.fecha, Some(json!("2024-06-02")));
        assert!(rates.timestamp.ends_with('Z'));
    }

    #[test]
    fn normalize_rejects_missing_zero_or_text_rates() {
        for payload in [
            json!({ "venta": 509.4 }),
            json!({ "compra": 0, "venta": 509.4 }),
            json!({ "compra": "n/a", "venta": 509.4 }),
            json!({ "compra": 503.1, "venta": null }),
            json!({ "compra": 503.1, "venta": "NaN" }),
            json!([]),
        ] {
            let err = normalize(&payload).expect_err("payload must be rejected");
            assert_eq!(err.status_code(), 502);
            assert_eq!(err.public_message(), "Invalid exchange rate data");
        }
    }
}
