use std::time::Duration;

use anyhow::{Context, Result};
use pressroom_shared::exchange_rate::{ExchangeRateClient, ExchangeRateError, ExchangeRates};

use super::print;
use crate::cli::OutputFormat;

pub async fn run(url: &str, timeout_ms: u64, format: OutputFormat) -> Result<()> {
    let rates = fetch(url, timeout_ms).await?;
    print(&rates, format)
}

async fn fetch(url: &str, timeout_ms: u64) -> Result<ExchangeRates> {
    let client = ExchangeRateClient::new(url, Duration::from_millis(timeout_ms))?;
    client.fetch().await.map_err(|err| match err {
        ExchangeRateError::Timeout(after) => {
            anyhow::anyhow!("exchange rate api at {url} did not answer within {after:?}")
        },
        other => anyhow::Error::new(other).context(format!("exchange rate lookup at {url} failed")),
    })
    .context("rates unavailable")
}
