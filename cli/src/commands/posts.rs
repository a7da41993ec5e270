use anyhow::{bail, Result};
use pressroom_shared::{
    card::{PostCard, PostDetail},
    CategoryCatalog, PostsQuery, SortKey, WordPressClient,
};
use serde::Serialize;

use super::{locale, print};
use crate::cli::OutputFormat;

pub struct ListRequest {
    pub lang: Option<String>,
    pub categories: Vec<String>,
    pub search: String,
    pub sort: SortKey,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Serialize)]
struct PostListOutput {
    posts: Vec<PostCard>,
    total: u64,
    total_pages: u64,
    current_page: u32,
    truncated: bool,
}

pub async fn list(client: &WordPressClient, request: ListRequest, format: OutputFormat) -> Result<()> {
    let lang = request.lang.as_deref();
    let slugs: Vec<String> = request
        .categories
        .iter()
        .map(|slug| slug.trim().to_string())
        .filter(|slug| !slug.is_empty())
        .collect();

    let categories = if slugs.is_empty() {
        Vec::new()
    } else {
        let catalog = CategoryCatalog::new(client.try_categories(lang).await?);
        let ids = catalog.resolve(&slugs);
        if ids.len() < slugs.len() {
            tracing::warn!("ignoring unknown category slugs in {:?}", slugs);
        }
        ids
    };

    let query = PostsQuery {
        lang: request.lang.clone(),
        page: request.page,
        per_page: request.per_page,
        categories,
        search: request.search,
        sort: request.sort,
    };
    let page = client.try_posts(&query).await?;
    let locale = locale(lang);
    let posts: Vec<PostCard> = page
        .posts
        .iter()
        .map(|post| PostCard::from_post(post, locale))
        .collect();

    match format {
        OutputFormat::Json => print(
            &PostListOutput {
                posts,
                total: page.pagination.total,
                total_pages: page.pagination.total_pages,
                current_page: page.pagination.current_page,
                truncated: page.truncated,
            },
            format,
        ),
        OutputFormat::Vertical => {
            print(&posts, format)?;
            println!(
                "page {} of {} ({} posts{})",
                page.pagination.current_page,
                page.pagination.total_pages,
                page.pagination.total,
                if page.truncated { ", truncated" } else { "" }
            );
            Ok(())
        },
    }
}

pub async fn show(
    client: &WordPressClient,
    slug: &str,
    lang: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let Some(post) = client.try_post_by_slug(slug, lang).await? else {
        bail!("post not found: {slug}");
    };
    print(&PostDetail::from_post(&post, locale(lang)), format)
}
