//! Pressroom backend: blog JSON API over a headless WordPress, sitemap and
//! robots documents, and the exchange-rate proxy.

mod config;
mod exchange_rate;
mod handlers;
mod request_context;
mod routes;
mod seo;
mod state;

use anyhow::{Context, Result};
use pressroom_runtime::{init_logging, LoggingOptions};

use crate::config::BackendConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let _logging = init_logging(&LoggingOptions::from_env("pressroom-backend"))?;

    let config = BackendConfig::from_env()?;
    tracing::info!("Starting pressroom backend server");
    tracing::info!("WordPress API: {}", config.wordpress_api_url);
    tracing::info!("Site base URL: {}", config.site_base_url);
    tracing::info!(
        timeout_ms = config.exchange_rate_timeout.as_millis(),
        "Exchange rate API: {}",
        config.exchange_rate_api_url
    );

    let addr = config.listen_addr();
    let app_state = state::AppState::new(config)?;
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        return;
    }
    tracing::info!("Shutdown signal received");
}
