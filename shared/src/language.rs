//! Language reconciliation.
//!
//! The posts collection cannot be filtered by language in this CMS, but
//! categories can. A language-restricted listing therefore over-fetches
//! posts and keeps those whose categories belong to the language.

use std::collections::HashSet;

use crate::{
    pagination::{page_window, Pagination},
    wordpress::PostPage,
    Category, Post,
};

/// Posts fetched per language-restricted query. Results beyond this are
/// not seen.
pub const LANGUAGE_OVERFETCH_CAP: u32 = 100;

/// Ids of the categories tagged with the requested language.
pub fn valid_category_ids(lang_categories: &[Category]) -> HashSet<u64> {
    lang_categories.iter().map(|category| category.id).collect()
}

/// Keep posts with at least one category in `valid`, preserving order.
pub fn filter_posts(posts: Vec<Post>, valid: &HashSet<u64>) -> Vec<Post> {
    posts
        .into_iter()
        .filter(|post| post.categories.iter().any(|id| valid.contains(id)))
        .collect()
}

/// Turn an over-fetched page into the requested page of the reconciled list.
///
/// Totals come from the reconciled list, never from the upstream headers.
/// `truncated` is set when upstream reported more posts than were fetched.
pub fn reconcile_page(
    overfetched: PostPage,
    lang_categories: &[Category],
    page: u32,
    per_page: u32,
) -> PostPage {
    let fetched = overfetched.posts.len() as u64;
    let truncated = overfetched.pagination.total > fetched;
    let valid = valid_category_ids(lang_categories);
    let kept = filter_posts(overfetched.posts, &valid);
    let page = page.max(1);

    PostPage {
        posts: page_window(&kept, page, per_page),
        pagination: Pagination::from_reconciled(kept.len(), page, per_page),
        truncated,
    }
}
