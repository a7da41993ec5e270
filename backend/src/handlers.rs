use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use pressroom_shared::{
    card::{PostCard, PostDetail},
    catalog::CategoryChip,
    format::primary_category_id,
    pagination::{visible_slots, PageSlot},
    wordpress::DEFAULT_RELATED_LIMIT,
    Pagination, PostsQuery, SortKey,
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PostsParams {
    /// Comma-joined category slugs.
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LangParams {
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostCard>,
    pub pagination: Pagination,
    pub page_slots: Vec<PageSlot>,
    pub has_more: bool,
    /// Language results were cut at the over-fetch cap.
    pub truncated: bool,
}

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub post: PostDetail,
    pub related: Vec<PostCard>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryChip>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PostsParams>,
) -> Result<Json<PostListResponse>, ApiError> {
    let sort = params
        .sort
        .as_deref()
        .unwrap_or_default()
        .parse::<SortKey>()
        .map_err(|err| bad_request(&err))?;
    let lang = normalize_lang(params.lang.as_deref());

    let slugs: Vec<String> = params
        .categories
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .map(str::to_string)
        .collect();

    // Filters travel as slugs in the URL but as ids to the CMS.
    let categories = if slugs.is_empty() {
        Vec::new()
    } else {
        state
            .category_catalog(lang.as_deref())
            .await
            .map_err(|e| bad_gateway("Failed to fetch categories", e))?
            .resolve(&slugs)
    };

    let query = PostsQuery {
        lang: lang.clone(),
        page: params.page.unwrap_or(1).max(1),
        per_page: params
            .per_page
            .unwrap_or(state.config.posts_per_page)
            .clamp(1, 100),
        categories,
        search: params.q.unwrap_or_default(),
        sort,
    };

    let page = state
        .cms
        .try_posts(&query)
        .await
        .map_err(|e| bad_gateway("Failed to fetch posts", e))?;

    let locale = state.config.locale_for(lang.as_deref());
    let posts = page
        .posts
        .iter()
        .map(|post| PostCard::from_post(post, &locale))
        .collect();

    let pagination = page.pagination;
    Ok(Json(PostListResponse {
        posts,
        page_slots: visible_slots(u64::from(pagination.current_page), pagination.total_pages),
        has_more: pagination.has_more(),
        pagination,
        truncated: page.truncated,
    }))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<LangParams>,
) -> Result<Json<PostDetailResponse>, ApiError> {
    let lang = normalize_lang(params.lang.as_deref());
    let post = state
        .cms
        .try_post_by_slug(&slug, lang.as_deref())
        .await
        .map_err(|e| bad_gateway("Failed to fetch post", e))?
        .ok_or_else(|| not_found("Post not found"))?;

    // Related posts are decoration; a failure only hides the section.
    let related = match primary_category_id(&post) {
        Some(category_id) => {
            state
                .cms
                .related_posts(category_id, post.id, DEFAULT_RELATED_LIMIT)
                .await
        },
        None => Vec::new(),
    };

    let locale = state.config.locale_for(lang.as_deref());
    Ok(Json(PostDetailResponse {
        post: PostDetail::from_post(&post, &locale),
        related: related
            .iter()
            .map(|item| PostCard::from_post(item, &locale))
            .collect(),
    }))
}

pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<LangParams>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let lang = normalize_lang(params.lang.as_deref());
    let catalog = state
        .category_catalog(lang.as_deref())
        .await
        .map_err(|e| bad_gateway("Failed to fetch categories", e))?;
    Ok(Json(CategoriesResponse {
        categories: catalog.chips(),
    }))
}

fn normalize_lang(lang: Option<&str>) -> Option<String> {
    lang.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_ascii_lowercase)
}

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
            code: 400,
        }),
    )
}

fn not_found(message: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message.to_string(),
            code: 404,
        }),
    )
}

fn bad_gateway(message: &str, err: impl std::fmt::Display) -> ApiError {
    tracing::error!("{}: {}", message, err);
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            error: message.to_string(),
            code: 502,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::normalize_lang;

    #[test]
    fn lang_is_trimmed_and_lowercased() {
        assert_eq!(normalize_lang(Some(" EN ")), Some("en".to_string()));
        assert_eq!(normalize_lang(Some("  ")), None);
        assert_eq!(normalize_lang(None), None);
    }
}
