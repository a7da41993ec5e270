//! WordPress REST adapter (`/wp-json/wp/v2`).
//!
//! Every operation comes in two flavours: `try_*` returns a [`CmsError`]
//! and lets the caller pick an error policy, the plain variant logs the
//! failure and resolves to an empty/`None` default.

use std::env;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT};
use serde::de::DeserializeOwned;

use crate::{
    language::{self, LANGUAGE_OVERFETCH_CAP},
    pagination::{Pagination, TOTAL_HEADER, TOTAL_PAGES_HEADER},
    query::{encode_params, MAX_PER_PAGE},
    Category, Post, PostsQuery, SlugOnly,
};

/// CMS used when `WORDPRESS_API_URL` is unset.
pub const DEFAULT_WORDPRESS_API_URL: &str = "https://galieloblog.aurigital.com/wp-json/wp/v2";

/// Related posts shown under an article.
pub const DEFAULT_RELATED_LIMIT: u32 = 3;

const USER_AGENT: &str = concat!("pressroom/", env!("CARGO_PKG_VERSION"));

/// Failure talking to the CMS.
#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    /// The HTTP client could not be constructed.
    #[error("failed to build wordpress http client: {0}")]
    Client(#[source] reqwest::Error),
    /// Connection, TLS or body read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying error.
        source: reqwest::Error,
    },
    /// Non-success HTTP status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },
    /// Body was not the JSON shape we expect.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// One page of posts plus its pagination state.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    /// Posts on this page, in server order.
    pub posts: Vec<Post>,
    /// Totals for the whole query.
    pub pagination: Pagination,
    /// Language reconciliation hit the over-fetch cap and upstream had more.
    pub truncated: bool,
}

impl PostPage {
    /// The result reported when the fetch failed.
    pub fn empty(per_page: u32) -> Self {
        Self {
            posts: Vec::new(),
            pagination: Pagination::empty(per_page),
            truncated: false,
        }
    }
}

/// Where the listing gets its data from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// All categories, optionally restricted to one language.
    async fn fetch_categories(&self, lang: Option<&str>) -> Result<Vec<Category>, CmsError>;

    /// One listing page.
    async fn fetch_posts(&self, query: &PostsQuery) -> Result<PostPage, CmsError>;
}

/// HTTP client bound to one WordPress REST root.
#[derive(Clone, Debug)]
pub struct WordPressClient {
    base_url: String,
    http: reqwest::Client,
}

impl WordPressClient {
    /// Client for `base_url` (the `.../wp-json/wp/v2` root).
    pub fn new(base_url: &str) -> Result<Self, CmsError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(CmsError::Client)?;
        Ok(Self::with_http_client(base_url, http))
    }

    /// Client for `WORDPRESS_API_URL`, falling back to the production CMS.
    pub fn from_env() -> Result<Self, CmsError> {
        let base_url = env::var("WORDPRESS_API_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_WORDPRESS_API_URL.to_string());
        Self::new(&base_url)
    }

    /// Reuse an existing `reqwest` client.
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// REST root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, collection: &str, params: &[(&str, String)]) -> String {
        if params.is_empty() {
            return format!("{}/{}", self.base_url, collection);
        }
        format!("{}/{}?{}", self.base_url, collection, encode_params(params))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<(T, HeaderMap), CmsError> {
        tracing::debug!(url, "wordpress request");
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| CmsError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let headers = response.headers().clone();
        let body = response.text().await.map_err(|source| CmsError::Transport {
            url: url.to_string(),
            source,
        })?;
        let value = serde_json::from_str(&body).map_err(|source| CmsError::Decode {
            url: url.to_string(),
            source,
        })?;
        Ok((value, headers))
    }

    /// One listing page. Engages language reconciliation when `query.lang`
    /// is set, otherwise trusts the server's pagination headers.
    pub async fn try_posts(&self, query: &PostsQuery) -> Result<PostPage, CmsError> {
        let Some(lang) = query.lang.as_deref().filter(|lang| !lang.is_empty()) else {
            return self.try_posts_page(query).await;
        };

        let wide = self
            .try_posts_page(&query.overfetch(LANGUAGE_OVERFETCH_CAP))
            .await?;
        let lang_categories = self.try_categories(Some(lang)).await?;
        let page = language::reconcile_page(wide, &lang_categories, query.page, query.per_page);
        if page.truncated {
            tracing::warn!(
                lang,
                cap = LANGUAGE_OVERFETCH_CAP,
                "language-filtered listing truncated at over-fetch cap"
            );
        }
        Ok(page)
    }

    async fn try_posts_page(&self, query: &PostsQuery) -> Result<PostPage, CmsError> {
        let url = self.url("posts", &query.params());
        let (posts, headers) = self.get_json::<Vec<Post>>(&url).await?;
        let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
        let pagination = Pagination::from_headers(
            header(TOTAL_HEADER),
            header(TOTAL_PAGES_HEADER),
            query.page.max(1),
            query.per_page,
        );
        Ok(PostPage {
            posts,
            pagination,
            truncated: false,
        })
    }

    /// Lenient [`Self::try_posts`]: empty page with total 0 on failure.
    pub async fn posts(&self, query: &PostsQuery) -> PostPage {
        match self.try_posts(query).await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!("failed to fetch posts: {err}");
                PostPage::empty(query.per_page)
            },
        }
    }

    /// First post matching `slug` exactly.
    pub async fn try_post_by_slug(
        &self,
        slug: &str,
        lang: Option<&str>,
    ) -> Result<Option<Post>, CmsError> {
        let mut params = vec![("slug", slug.to_string()), ("_embed", String::new())];
        if let Some(lang) = lang.filter(|lang| !lang.is_empty()) {
            params.push(("lang", lang.to_string()));
        }
        let url = self.url("posts", &params);
        let (posts, _) = self.get_json::<Vec<Post>>(&url).await?;
        Ok(posts.into_iter().next())
    }

    /// Lenient [`Self::try_post_by_slug`].
    pub async fn post_by_slug(&self, slug: &str, lang: Option<&str>) -> Option<Post> {
        self.try_post_by_slug(slug, lang)
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(slug, "failed to fetch post: {err}");
                None
            })
    }

    /// Categories, optionally restricted to a language.
    pub async fn try_categories(&self, lang: Option<&str>) -> Result<Vec<Category>, CmsError> {
        let mut params = vec![("per_page", MAX_PER_PAGE.to_string())];
        if let Some(lang) = lang.filter(|lang| !lang.is_empty()) {
            params.push(("lang", lang.to_string()));
        }
        let url = self.url("categories", &params);
        let (categories, _) = self.get_json::<Vec<Category>>(&url).await?;
        Ok(categories)
    }

    /// Lenient [`Self::try_categories`].
    pub async fn categories(&self, lang: Option<&str>) -> Vec<Category> {
        self.try_categories(lang).await.unwrap_or_else(|err| {
            tracing::warn!("failed to fetch categories: {err}");
            Vec::new()
        })
    }

    /// Newest posts in `category_id`, excluding `exclude_id`.
    pub async fn try_related_posts(
        &self,
        category_id: u64,
        exclude_id: u64,
        limit: u32,
    ) -> Result<Vec<Post>, CmsError> {
        let params = vec![
            ("_embed", String::new()),
            ("categories", category_id.to_string()),
            ("exclude", exclude_id.to_string()),
            ("per_page", limit.clamp(1, MAX_PER_PAGE).to_string()),
            ("orderby", "date".to_string()),
            ("order", "desc".to_string()),
        ];
        let url = self.url("posts", &params);
        let (posts, _) = self.get_json::<Vec<Post>>(&url).await?;
        Ok(posts)
    }

    /// Lenient [`Self::try_related_posts`].
    pub async fn related_posts(&self, category_id: u64, exclude_id: u64, limit: u32) -> Vec<Post> {
        self.try_related_posts(category_id, exclude_id, limit)
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(category_id, exclude_id, "failed to fetch related posts: {err}");
                Vec::new()
            })
    }

    /// Slugs of the newest 100 posts, for sitemaps and static generation.
    pub async fn try_all_post_slugs(&self) -> Result<Vec<String>, CmsError> {
        let params = vec![
            ("per_page", MAX_PER_PAGE.to_string()),
            ("_fields", "slug".to_string()),
        ];
        let url = self.url("posts", &params);
        let (slugs, _) = self.get_json::<Vec<SlugOnly>>(&url).await?;
        Ok(slugs.into_iter().map(|item| item.slug).collect())
    }

    /// Lenient [`Self::try_all_post_slugs`].
    pub async fn all_post_slugs(&self) -> Vec<String> {
        self.try_all_post_slugs().await.unwrap_or_else(|err| {
            tracing::warn!("failed to fetch post slugs: {err}");
            Vec::new()
        })
    }
}

#[async_trait]
impl ContentSource for WordPressClient {
    async fn fetch_categories(&self, lang: Option<&str>) -> Result<Vec<Category>, CmsError> {
        self.try_categories(lang).await
    }

    async fn fetch_posts(&self, query: &PostsQuery) -> Result<PostPage, CmsError> {
        self.try_posts(query).await
    }
}
