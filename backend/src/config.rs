use std::{env, time::Duration};

use anyhow::{Context, Result};
use pressroom_shared::{query::DEFAULT_PER_PAGE, wordpress::DEFAULT_WORDPRESS_API_URL};
use url::Url;

use crate::exchange_rate::{DEFAULT_EXCHANGE_RATE_API_URL, DEFAULT_EXCHANGE_RATE_TIMEOUT_MS};

const DEFAULT_SITE_BASE_URL: &str = "https://galileocapital.io";
const DEFAULT_CATEGORY_CACHE_TTL_SECONDS: u64 = 3600;

/// Startup configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub bind_addr: String,
    pub port: u16,
    pub wordpress_api_url: String,
    pub site_base_url: String,
    pub exchange_rate_api_url: String,
    pub exchange_rate_timeout: Duration,
    pub posts_per_page: u32,
    pub category_cache_ttl: Duration,
    /// Date locale when a request names no language.
    pub default_locale: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
            wordpress_api_url: DEFAULT_WORDPRESS_API_URL.to_string(),
            site_base_url: DEFAULT_SITE_BASE_URL.to_string(),
            exchange_rate_api_url: DEFAULT_EXCHANGE_RATE_API_URL.to_string(),
            exchange_rate_timeout: Duration::from_millis(DEFAULT_EXCHANGE_RATE_TIMEOUT_MS),
            posts_per_page: DEFAULT_PER_PAGE,
            category_cache_ttl: Duration::from_secs(DEFAULT_CATEGORY_CACHE_TTL_SECONDS),
            default_locale: "es".to_string(),
        }
    }
}

impl BackendConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = match non_empty_env("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid PORT: {raw}"))?,
            None => defaults.port,
        };

        let config = Self {
            bind_addr: non_empty_env("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            wordpress_api_url: non_empty_env("WORDPRESS_API_URL")
                .unwrap_or(defaults.wordpress_api_url),
            site_base_url: non_empty_env("SITE_BASE_URL")
                .map(|value| value.trim_end_matches('/').to_string())
                .unwrap_or(defaults.site_base_url),
            exchange_rate_api_url: non_empty_env("EXCHANGE_RATE_API_URL")
                .unwrap_or(defaults.exchange_rate_api_url),
            exchange_rate_timeout: parse_env::<u64>("EXCHANGE_RATE_TIMEOUT_MS")
                .map(|ms| Duration::from_millis(ms.max(100)))
                .unwrap_or(defaults.exchange_rate_timeout),
            posts_per_page: parse_env::<u32>("POSTS_PER_PAGE")
                .map(|value| value.clamp(1, 100))
                .unwrap_or(defaults.posts_per_page),
            category_cache_ttl: parse_env::<u64>("CATEGORY_CACHE_TTL_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.category_cache_ttl),
            default_locale: non_empty_env("DEFAULT_LOCALE").unwrap_or(defaults.default_locale),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("WORDPRESS_API_URL", &self.wordpress_api_url),
            ("SITE_BASE_URL", &self.site_base_url),
            ("EXCHANGE_RATE_API_URL", &self.exchange_rate_api_url),
        ] {
            let parsed = Url::parse(value).with_context(|| format!("invalid {name}: {value}"))?;
            match parsed.scheme() {
                "http" | "https" => {},
                other => anyhow::bail!("{name} must use http or https, got `{other}`"),
            }
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// `es`/`en` locale for date formatting.
    pub fn locale_for(&self, lang: Option<&str>) -> String {
        lang.filter(|value| !value.is_empty())
            .unwrap_or(&self.default_locale)
            .to_ascii_lowercase()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    non_empty_env(name).and_then(|value| value.parse::<T>().ok())
}
