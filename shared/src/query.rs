//! Outbound query construction for the `/posts` and `/categories` collections.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Posts per listing page when the caller does not say otherwise.
pub const DEFAULT_PER_PAGE: u32 = 9;

/// Largest page size the WordPress REST API accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Newest first.
    #[default]
    Date,
    /// Title A→Z.
    TitleAsc,
    /// Title Z→A.
    TitleDesc,
}

impl SortKey {
    /// `(orderby, order)` pair understood by WordPress.
    pub fn ordering(self) -> (&'static str, &'static str) {
        match self {
            SortKey::Date => ("date", "desc"),
            SortKey::TitleAsc => ("title", "asc"),
            SortKey::TitleDesc => ("title", "desc"),
        }
    }

    /// Name used in site URLs and CLI flags.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::TitleAsc => "title-asc",
            SortKey::TitleDesc => "title-desc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | "date" => Ok(SortKey::Date),
            "title-asc" => Ok(SortKey::TitleAsc),
            "title-desc" => Ok(SortKey::TitleDesc),
            other => Err(format!("unknown sort key `{other}`")),
        }
    }
}

/// One listing request against the posts collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostsQuery {
    /// Two-letter language code; engages language reconciliation.
    pub lang: Option<String>,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Category ids (already resolved from slugs).
    pub categories: Vec<u64>,
    /// Free-text search term.
    pub search: String,
    /// Ordering.
    pub sort: SortKey,
}

impl Default for PostsQuery {
    fn default() -> Self {
        Self {
            lang: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            categories: Vec::new(),
            search: String::new(),
            sort: SortKey::Date,
        }
    }
}

impl PostsQuery {
    /// Query parameters for this request, `_embed` first.
    ///
    /// Page and size are clamped into the range the API accepts; empty
    /// category lists and blank search terms are omitted.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let (orderby, order) = self.sort.ordering();
        let mut params = vec![
            ("_embed", String::new()),
            ("per_page", self.per_page.clamp(1, MAX_PER_PAGE).to_string()),
            ("page", self.page.max(1).to_string()),
            ("orderby", orderby.to_string()),
            ("order", order.to_string()),
        ];
        if !self.categories.is_empty() {
            params.push(("categories", join_ids(&self.categories)));
        }
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        if let Some(lang) = self.lang.as_deref().filter(|lang| !lang.is_empty()) {
            params.push(("lang", lang.to_string()));
        }
        params
    }

    /// Over-fetch variant used by language reconciliation: first page of
    /// `cap` posts, every other filter kept.
    pub fn overfetch(&self, cap: u32) -> Self {
        Self {
            page: 1,
            per_page: cap,
            ..self.clone()
        }
    }
}

/// Join ids the way WordPress expects list filters (`3,7,12`).
pub fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Render params as a query string. Bare keys (empty value) are emitted
/// without `=`, which is how `_embed` is normally written.
pub fn encode_params(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| {
            if value.is_empty() {
                urlencoding::encode(key).into_owned()
            } else {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn default_query_orders_by_date_desc_with_embed() {
        let params = PostsQuery::default().params();
        assert_eq!(params[0], ("_embed", String::new()));
        assert_eq!(param(&params, "orderby"), Some("date"));
        assert_eq!(param(&params, "order"), Some("desc"));
        assert_eq!(param(&params, "per_page"), Some("9"));
        assert_eq!(param(&params, "page"), Some("1"));
        assert_eq!(param(&params, "categories"), None);
        assert_eq!(param(&params, "search"), None);
        assert_eq!(param(&params, "lang"), None);
    }

    #[test]
    fn title_sorts_map_to_title_ordering() {
        assert_eq!(SortKey::TitleAsc.ordering(), ("title", "asc"));
        assert_eq!(SortKey::TitleDesc.ordering(), ("title", "desc"));
        assert_eq!("title-desc".parse::<SortKey>(), Ok(SortKey::TitleDesc));
        assert_eq!("".parse::<SortKey>(), Ok(SortKey::Date));
        assert!("newest".parse::<SortKey>().is_err());
    }

    #[test]
    fn filters_and_search_are_encoded() {
        let query = PostsQuery {
            categories: vec![4, 11],
            search: "  bitcoin & co ".to_string(),
            lang: Some("en".to_string()),
            ..PostsQuery::default()
        };
        let params = query.params();
        assert_eq!(param(&params, "categories"), Some("4,11"));
        assert_eq!(param(&params, "search"), Some("bitcoin & co"));
        assert_eq!(param(&params, "lang"), Some("en"));

        let encoded = encode_params(&params);
        assert!(encoded.starts_with("_embed&per_page=9&page=1"));
        assert!(encoded.contains("categories=4%2C11"));
        assert!(encoded.contains("search=bitcoin%20%26%20co"));
    }

    #[test]
    fn page_and_size_are_clamped() {
        let query = PostsQuery {
            page: 0,
            per_page: 500,
            ..PostsQuery::default()
        };
        let params = query.params();
        assert_eq!(param(&params, "page"), Some("1"));
        assert_eq!(param(&params, "per_page"), Some("100"));
    }

    #[test]
    fn overfetch_resets_paging_and_keeps_filters() {
        let query = PostsQuery {
            page: 4,
            categories: vec![2],
            search: "crypto".to_string(),
            ..PostsQuery::default()
        };
        let wide = query.overfetch(100);
        assert_eq!(wide.page, 1);
        assert_eq!(wide.per_page, 100);
        assert_eq!(wide.categories, vec![2]);
        assert_eq!(wide.search, "crypto");
    }
}
