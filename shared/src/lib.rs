//! Shared WordPress content layer for the pressroom backend and CLI.
//!
//! Holds the CMS data model, the REST adapter, language reconciliation,
//! pagination, presentation formatting, the listing page state machine,
//! sitemap rendering and the exchange-rate client.

use serde::{Deserialize, Serialize};

pub mod card;
pub mod catalog;
pub mod exchange_rate;
pub mod format;
pub mod language;
pub mod listing;
pub mod pagination;
pub mod query;
pub mod sitemap;
pub mod wordpress;

pub use catalog::CategoryCatalog;
pub use pagination::Pagination;
pub use query::{PostsQuery, SortKey};
pub use wordpress::{CmsError, ContentSource, PostPage, WordPressClient};

/// WordPress 富文本字段（`{ "rendered": "..." }`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    /// HTML as rendered by WordPress.
    #[serde(default)]
    pub rendered: String,
}

/// A post snapshot as returned by `/wp/v2/posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Numeric post id.
    pub id: u64,
    /// URL-safe unique name.
    #[serde(default)]
    pub slug: String,
    /// Post title.
    #[serde(default)]
    pub title: Rendered,
    /// Post excerpt.
    #[serde(default)]
    pub excerpt: Rendered,
    /// Post body.
    #[serde(default)]
    pub content: Rendered,
    /// Publish date, local site time without offset (`2024-03-15T10:00:00`).
    #[serde(default)]
    pub date: String,
    /// Category ids the post belongs to.
    #[serde(default)]
    pub categories: Vec<u64>,
    /// Language tag (Polylang), when the CMS exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Sub-resources pulled inline by `_embed`.
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
}

/// Inline sub-resources of a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embedded {
    /// Featured media records; WordPress may embed an error object here.
    #[serde(rename = "wp:featuredmedia", default)]
    pub featured_media: Vec<FeaturedMedia>,
    /// Author records.
    #[serde(default)]
    pub author: Vec<EmbeddedAuthor>,
    /// Term groups, categories first then tags.
    #[serde(rename = "wp:term", default)]
    pub terms: Vec<Vec<Term>>,
}

/// Embedded featured media record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturedMedia {
    /// Original image URL.
    #[serde(default)]
    pub source_url: Option<String>,
    /// Alt text.
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// Embedded author record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedAuthor {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Embedded taxonomy term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Term id.
    #[serde(default)]
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// URL-safe name.
    #[serde(default)]
    pub slug: String,
    /// `category` or `post_tag`.
    #[serde(default)]
    pub taxonomy: Option<String>,
}

/// A category as returned by `/wp/v2/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Numeric category id (what the API filters on).
    pub id: u64,
    /// URL-facing unique name (what the UI filters on).
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Number of published posts.
    #[serde(default)]
    pub count: u64,
    /// Language tag (Polylang).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// A post slug as returned by `_fields=slug`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlugOnly {
    /// URL-safe unique name.
    pub slug: String,
}
