use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use pressroom_shared::{
    exchange_rate::ExchangeRateClient, CategoryCatalog, CmsError, WordPressClient,
};
use tokio::sync::RwLock;

use crate::config::BackendConfig;

struct CachedCatalog {
    catalog: CategoryCatalog,
    loaded_at: Instant,
}

#[derive(Clone)]
pub struct AppState {
    pub cms: WordPressClient,
    pub rates: ExchangeRateClient,
    pub config: Arc<BackendConfig>,
    /// Category catalogs keyed by language (`""` for no language).
    catalogs: Arc<RwLock<HashMap<String, CachedCatalog>>>,
}

impl AppState {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let cms = WordPressClient::new(&config.wordpress_api_url)
            .context("failed to build wordpress client")?;
        let rates =
            ExchangeRateClient::new(&config.exchange_rate_api_url, config.exchange_rate_timeout)
                .context("failed to build exchange rate client")?;

        Ok(Self {
            cms,
            rates,
            config: Arc::new(config),
            catalogs: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Category catalog for `lang`, reloaded from the CMS once the cached
    /// copy is older than the configured TTL. Failures are not cached.
    pub async fn category_catalog(&self, lang: Option<&str>) -> Result<CategoryCatalog, CmsError> {
        let key = lang.unwrap_or_default().to_string();
        let ttl = self.config.category_cache_ttl;

        if let Some(catalog) = self.cached_catalog(&key, ttl).await {
            return Ok(catalog);
        }

        let categories = self.cms.try_categories(lang).await?;
        let catalog = CategoryCatalog::new(categories);
        tracing::debug!(
            lang = %key,
            categories = catalog.categories().len(),
            "category catalog refreshed"
        );

        self.catalogs.write().await.insert(key, CachedCatalog {
            catalog: catalog.clone(),
            loaded_at: Instant::now(),
        });
        Ok(catalog)
    }

    async fn cached_catalog(&self, key: &str, ttl: Duration) -> Option<CategoryCatalog> {
        let catalogs = self.catalogs.read().await;
        catalogs
            .get(key)
            .filter(|cached| !ttl.is_zero() && cached.loaded_at.elapsed() < ttl)
            .map(|cached| cached.catalog.clone())
    }
}
