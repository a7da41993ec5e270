//! News listing session: category filters, search, sort and page kept in
//! step with the URL and with the posts shown.
//!
//! A session moves `LoadingCategories → Ready` once the slug→id map is
//! loaded; no posts query is issued before that. Later responses replace
//! earlier ones, and responses that arrive after [`ListingController::unmount`]
//! or after a newer query was issued are dropped.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use parking_lot::{Mutex, RwLock};

use crate::{
    catalog::{CategoryChip, CategoryCatalog},
    query::DEFAULT_PER_PAGE,
    wordpress::ContentSource,
    Pagination, Post, PostsQuery, SortKey,
};

/// Route of the listing page.
pub const LISTING_PATH: &str = "/news";

/// Route of one article.
pub fn detail_path(slug: &str) -> String {
    format!("{LISTING_PATH}/{}", urlencoding::encode(slug))
}

/// Selected category slugs plus the submitted search term, as mirrored in
/// the URL (`?categories=a,b&q=term`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    /// Selected slugs in selection order.
    pub categories: Vec<String>,
    /// Submitted search term.
    pub search: String,
}

impl FilterSelection {
    /// Read `categories` and `q` from a query string (leading `?` optional).
    pub fn from_query(query: &str) -> Self {
        let mut selection = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = decode_component(value);
            match key {
                "categories" => {
                    selection.categories = value
                        .split(',')
                        .map(str::trim)
                        .filter(|slug| !slug.is_empty())
                        .map(str::to_string)
                        .collect();
                },
                "q" => selection.search = value.trim().to_string(),
                _ => {},
            }
        }
        selection
    }

    /// Listing URL carrying this selection.
    pub fn to_url(&self) -> String {
        let mut params = Vec::new();
        if !self.categories.is_empty() {
            let slugs = self
                .categories
                .iter()
                .map(|slug| urlencoding::encode(slug).into_owned())
                .collect::<Vec<_>>()
                .join(",");
            params.push(format!("categories={slugs}"));
        }
        if !self.search.is_empty() {
            params.push(format!("q={}", urlencoding::encode(&self.search)));
        }
        if params.is_empty() {
            LISTING_PATH.to_string()
        } else {
            format!("{LISTING_PATH}?{}", params.join("&"))
        }
    }

    /// Add `slug` if absent, remove it if present.
    pub fn toggle(&mut self, slug: &str) {
        if let Some(pos) = self.categories.iter().position(|selected| selected == slug) {
            self.categories.remove(pos);
        } else {
            self.categories.push(slug.to_string());
        }
    }

    /// Whether `slug` is selected.
    pub fn is_selected(&self, slug: &str) -> bool {
        self.categories.iter().any(|selected| selected == slug)
    }
}

fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|value| value.into_owned())
        .unwrap_or(raw)
}

/// How a URL rewrite lands in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// Replace the current entry (already on the listing route).
    Replace,
    /// Push a new entry (coming from another route).
    Push,
}

/// The host's router.
pub trait Navigator: Send + Sync {
    /// Path currently shown, without query.
    fn current_path(&self) -> String;

    /// Go to `url`.
    fn navigate(&self, url: &str, mode: HistoryMode);
}

/// Search box text shared between the sidebar (writer) and the grid
/// (reader). Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    term: Arc<RwLock<String>>,
}

impl SearchContext {
    /// Current text.
    pub fn term(&self) -> String {
        self.term.read().clone()
    }

    /// Replace the text.
    pub fn set_term(&self, term: impl Into<String>) {
        *self.term.write() = term.into();
    }
}

/// Lifecycle of a listing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingPhase {
    /// Waiting for the category catalog.
    LoadingCategories,
    /// Catalog loaded; filters are live.
    Ready,
    /// Catalog failed to load; only [`ListingController::retry`] is accepted.
    Error(String),
}

/// Operation rejected by the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    /// Filters are not live yet (or the catalog failed).
    #[error("listing is not ready")]
    NotReady,
    /// Nothing to retry.
    #[error("nothing to retry")]
    NothingToRetry,
    /// The last page is already shown.
    #[error("no more pages")]
    NoMorePages,
}

/// What happened to a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response was applied to the view.
    Applied,
    /// The effective query did not change; nothing was fetched.
    Unchanged,
    /// A newer query or an unmount superseded this response.
    Discarded,
    /// The fetch failed; the reason is on the view.
    Failed(String),
}

/// Session settings.
#[derive(Debug, Clone)]
pub struct ListingOptions {
    /// Language for reconciliation.
    pub lang: Option<String>,
    /// Page size.
    pub per_page: u32,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            lang: None,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Snapshot of everything the sidebar and grid render.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingView {
    /// Session phase.
    pub phase: ListingPhase,
    /// Filter chips in display order.
    pub chips: Vec<CategoryChip>,
    /// Current selection.
    pub selection: FilterSelection,
    /// Current ordering.
    pub sort: SortKey,
    /// Posts shown: the current page, or every page loaded so far after
    /// [`ListingController::load_more`].
    pub posts: Vec<Post>,
    /// Pagination of the current query.
    pub pagination: Pagination,
    /// Language results were cut at the over-fetch cap.
    pub truncated: bool,
    /// A posts fetch is in flight.
    pub loading: bool,
    /// Error of the last posts fetch, shown with a retry action.
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QueryKey {
    categories: Vec<u64>,
    search: String,
    sort: SortKey,
}

struct SessionState {
    phase: ListingPhase,
    catalog: CategoryCatalog,
    url_query: String,
    selection: FilterSelection,
    sort: SortKey,
    page: u32,
    posts: Vec<Post>,
    pagination: Pagination,
    truncated: bool,
    loading: bool,
    last_error: Option<String>,
    last_key: Option<QueryKey>,
    generation: u64,
}

/// One mounted listing page.
pub struct ListingController<S, N> {
    source: Arc<S>,
    navigator: Arc<N>,
    search: SearchContext,
    options: ListingOptions,
    alive: Arc<AtomicBool>,
    state: Mutex<SessionState>,
}

impl<S: ContentSource, N: Navigator> ListingController<S, N> {
    /// New session in `LoadingCategories`. Nothing is fetched until
    /// [`Self::mount`].
    pub fn new(
        source: Arc<S>,
        navigator: Arc<N>,
        search: SearchContext,
        options: ListingOptions,
    ) -> Self {
        let per_page = options.per_page.max(1);
        Self {
            source,
            navigator,
            search,
            options: ListingOptions { per_page, ..options },
            alive: Arc::new(AtomicBool::new(true)),
            state: Mutex::new(SessionState {
                phase: ListingPhase::LoadingCategories,
                catalog: CategoryCatalog::default(),
                url_query: String::new(),
                selection: FilterSelection::default(),
                sort: SortKey::Date,
                page: 1,
                posts: Vec::new(),
                pagination: Pagination::empty(per_page),
                truncated: false,
                loading: false,
                last_error: None,
                last_key: None,
                generation: 0,
            }),
        }
    }

    /// Load the catalog, seed filters from `url_query` and fetch page 1.
    pub async fn mount(&self, url_query: &str) -> FetchOutcome {
        {
            let mut state = self.state.lock();
            state.phase = ListingPhase::LoadingCategories;
            state.url_query = url_query.to_string();
        }
        self.load_catalog().await
    }

    async fn load_catalog(&self) -> FetchOutcome {
        let result = self
            .source
            .fetch_categories(self.options.lang.as_deref())
            .await;
        if !self.is_mounted() {
            return FetchOutcome::Discarded;
        }

        let categories = match result {
            Ok(categories) => categories,
            Err(err) => {
                tracing::warn!("listing: failed to load categories: {err}");
                let reason = err.to_string();
                self.state.lock().phase = ListingPhase::Error(reason.clone());
                return FetchOutcome::Failed(reason);
            },
        };

        {
            let mut state = self.state.lock();
            state.catalog = CategoryCatalog::new(categories);
            let selection = FilterSelection::from_query(&state.url_query);
            state.selection = selection;
            self.search.set_term(state.selection.search.clone());
            state.phase = ListingPhase::Ready;
            state.page = 1;
            let key = query_key(&state);
            state.last_key = Some(key);
        }
        self.fetch_current().await
    }

    /// Re-attempt whatever failed: the catalog in `Error`, or the last posts
    /// fetch while `Ready`.
    pub async fn retry(&self) -> Result<FetchOutcome, ListingError> {
        let phase = self.state.lock().phase.clone();
        match phase {
            ListingPhase::Error(_) => {
                self.state.lock().phase = ListingPhase::LoadingCategories;
                Ok(self.load_catalog().await)
            },
            ListingPhase::Ready => {
                let failed = self.state.lock().last_error.is_some();
                if !failed {
                    return Err(ListingError::NothingToRetry);
                }
                Ok(self.fetch_current().await)
            },
            ListingPhase::LoadingCategories => Err(ListingError::NotReady),
        }
    }

    /// Select or deselect a category chip.
    pub async fn toggle_category(&self, slug: &str) -> Result<FetchOutcome, ListingError> {
        let url = {
            let mut state = self.state.lock();
            ensure_ready(&state)?;
            state.selection.toggle(slug);
            state.selection.to_url()
        };
        self.write_url(&url);
        Ok(self.apply_change().await)
    }

    /// Typing in the search box; nothing is fetched until submit.
    pub fn set_search_input(&self, text: &str) {
        self.search.set_term(text);
    }

    /// Submit the search form.
    pub async fn submit_search(&self) -> Result<FetchOutcome, ListingError> {
        let term = self.search.term().trim().to_string();
        let url = {
            let mut state = self.state.lock();
            ensure_ready(&state)?;
            state.selection.search = term;
            state.selection.to_url()
        };
        self.write_url(&url);
        Ok(self.apply_change().await)
    }

    /// Change ordering.
    pub async fn set_sort(&self, sort: SortKey) -> Result<FetchOutcome, ListingError> {
        {
            let mut state = self.state.lock();
            ensure_ready(&state)?;
            state.sort = sort;
        }
        Ok(self.apply_change().await)
    }

    /// Jump to `page` of the current query, replacing the grid.
    pub async fn go_to_page(&self, page: u32) -> Result<FetchOutcome, ListingError> {
        {
            let mut state = self.state.lock();
            ensure_ready(&state)?;
            state.page = page.max(1);
        }
        Ok(self.fetch_current().await)
    }

    /// Append the next page of the current query to the grid.
    ///
    /// Only offered while the pagination reports more pages and no fetch is
    /// in flight. Any filter, search or sort change goes back to a single
    /// replaced page 1.
    pub async fn load_more(&self) -> Result<FetchOutcome, ListingError> {
        let next = {
            let state = self.state.lock();
            ensure_ready(&state)?;
            if state.loading || state.last_error.is_some() || !state.pagination.has_more() {
                return Err(ListingError::NoMorePages);
            }
            state.page + 1
        };
        Ok(self.fetch_page(next, Merge::Append).await)
    }

    /// Tear the session down; in-flight responses are dropped.
    pub fn unmount(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Whether the session is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Shared search box state.
    pub fn search_context(&self) -> &SearchContext {
        &self.search
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> ListingView {
        let state = self.state.lock();
        ListingView {
            phase: state.phase.clone(),
            chips: state.catalog.chips(),
            selection: state.selection.clone(),
            sort: state.sort,
            posts: state.posts.clone(),
            pagination: state.pagination,
            truncated: state.truncated,
            loading: state.loading,
            last_error: state.last_error.clone(),
        }
    }

    fn write_url(&self, url: &str) {
        let mode = if self.navigator.current_path() == LISTING_PATH {
            HistoryMode::Replace
        } else {
            HistoryMode::Push
        };
        self.navigator.navigate(url, mode);
    }

    async fn apply_change(&self) -> FetchOutcome {
        {
            let mut state = self.state.lock();
            let key = query_key(&state);
            if state.last_key.as_ref() == Some(&key) {
                return FetchOutcome::Unchanged;
            }
            state.last_key = Some(key);
            state.page = 1;
        }
        self.fetch_current().await
    }

    async fn fetch_current(&self) -> FetchOutcome {
        let page = self.state.lock().page;
        self.fetch_page(page, Merge::Replace).await
    }

    async fn fetch_page(&self, page: u32, merge: Merge) -> FetchOutcome {
        let (query, generation) = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.loading = true;
            let query = PostsQuery {
                lang: self.options.lang.clone(),
                page,
                per_page: self.options.per_page,
                categories: state.catalog.resolve(&state.selection.categories),
                search: state.selection.search.clone(),
                sort: state.sort,
            };
            (query, state.generation)
        };

        let result = self.source.fetch_posts(&query).await;
        if !self.is_mounted() {
            return FetchOutcome::Discarded;
        }

        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::debug!(generation, latest = state.generation, "listing: stale response dropped");
            return FetchOutcome::Discarded;
        }
        state.loading = false;
        match result {
            Ok(fetched) => {
                match merge {
                    Merge::Replace => state.posts = fetched.posts,
                    Merge::Append => state.posts.extend(fetched.posts),
                }
                state.page = page;
                state.pagination = fetched.pagination;
                state.truncated = fetched.truncated;
                state.last_error = None;
                FetchOutcome::Applied
            },
            Err(err) => {
                tracing::warn!("listing: failed to fetch posts: {err}");
                let reason = err.to_string();
                state.last_error = Some(reason.clone());
                FetchOutcome::Failed(reason)
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Merge {
    Replace,
    Append,
}

fn ensure_ready(state: &SessionState) -> Result<(), ListingError> {
    match state.phase {
        ListingPhase::Ready => Ok(()),
        _ => Err(ListingError::NotReady),
    }
}

fn query_key(state: &SessionState) -> QueryKey {
    QueryKey {
        categories: state.catalog.resolve(&state.selection.categories),
        search: state.selection.search.clone(),
        sort: state.sort,
    }
}
