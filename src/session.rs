//! Client-side fetch orchestration: one search session per submitted
//! username, an append-only accumulated result set, and a derived
//! sorted/paginated view.
//!
//! The session itself performs no I/O. Transitions that need the network
//! hand out a [`FetchRequest`] token; the caller performs the fetch and
//! feeds the outcome back together with the token. Tokens carry the epoch
//! of the search they were issued under, so a response that arrives after a
//! newer search has started is discarded instead of overwriting fresher
//! state.

use crate::types::Repository;

/// Sort criterion for the derived view. Sorting is local only and never
/// triggers a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Original accumulation (fetch) order.
    #[default]
    None,
    /// Descending star count.
    Stars,
    /// Descending fork count.
    Forks,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Items per local (display) page.
    pub local_page_size: usize,
    /// Items requested per upstream page.
    pub fetch_page_size: u32,
    /// Cap on the accumulated set. When reached, load-more is withheld even
    /// if upstream reports more data.
    pub max_accumulated: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            local_page_size: 9,
            fetch_page_size: 30,
            max_accumulated: None,
        }
    }
}

/// A fetch the session wants performed. The epoch ties the eventual outcome
/// back to the search that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub username: String,
    pub page: u32,
    pub per_page: u32,
    pub epoch: u64,
}

/// One page of results as delivered to the session.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub repositories: Vec<Repository>,
    pub has_more: bool,
}

/// The slice of the accumulated set currently on display, plus the numbers
/// the surrounding UI needs for its pagination controls.
#[derive(Debug, Clone)]
pub struct PageView {
    pub repositories: Vec<Repository>,
    pub local_page: usize,
    pub total_pages: usize,
    /// 1-based index of the first displayed item, 0 when empty.
    pub start_index: usize,
    /// 1-based index of the last displayed item, 0 when empty.
    pub end_index: usize,
    pub total_count: usize,
    pub is_last_page: bool,
}

/// State container for one search session. Exactly one mutator; the loading
/// flags serialize fetches, so no search and load-more ever run concurrently.
#[derive(Debug)]
pub struct SearchSession {
    config: SessionConfig,
    username: String,
    repositories: Vec<Repository>,
    fetch_page: u32,
    has_more: bool,
    sort_by: SortBy,
    local_page: usize,
    loading: bool,
    loading_more: bool,
    error: Option<String>,
    epoch: u64,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SearchSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            username: String::new(),
            repositories: Vec::new(),
            fetch_page: 1,
            has_more: false,
            sort_by: SortBy::None,
            local_page: 1,
            loading: false,
            loading_more: false,
            error: None,
            epoch: 0,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn has_more(&self) -> bool {
        self.has_more && !self.at_capacity()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn accumulated_len(&self) -> usize {
        self.repositories.len()
    }

    fn at_capacity(&self) -> bool {
        self.config
            .max_accumulated
            .is_some_and(|cap| self.repositories.len() >= cap)
    }

    /// Submit a username. Resets the accumulated set, cursor, sort mode and
    /// local page, and returns the page-1 fetch to perform. A blank username
    /// is a validation error and produces no fetch.
    pub fn begin_search(&mut self, username: &str) -> Option<FetchRequest> {
        let username = username.trim();
        if username.is_empty() {
            self.error = Some("Please enter a username".to_string());
            return None;
        }

        self.epoch += 1;
        self.username = username.to_string();
        self.repositories.clear();
        self.fetch_page = 1;
        self.has_more = false;
        self.sort_by = SortBy::None;
        self.local_page = 1;
        self.error = None;
        self.loading = true;
        self.loading_more = false;

        Some(FetchRequest {
            username: self.username.clone(),
            page: 1,
            per_page: self.config.fetch_page_size,
            epoch: self.epoch,
        })
    }

    /// Deliver the outcome of a search fetch. Outcomes from a superseded
    /// search (stale epoch) are ignored entirely.
    pub fn finish_search(
        &mut self,
        request: &FetchRequest,
        outcome: Result<FetchedPage, String>,
    ) {
        if request.epoch != self.epoch {
            return;
        }

        match outcome {
            Ok(page) => {
                self.repositories = page.repositories;
                self.fetch_page = 1;
                self.has_more = page.has_more;
            }
            Err(message) => {
                self.repositories.clear();
                self.has_more = false;
                self.error = Some(message);
            }
        }
        self.local_page = 1;
        self.loading = false;
    }

    /// Request the next upstream page. No-op while a fetch is in flight,
    /// without a username, or when upstream has no more data.
    pub fn begin_load_more(&mut self) -> Option<FetchRequest> {
        if self.loading || self.loading_more || self.username.is_empty() || !self.has_more() {
            return None;
        }

        self.loading_more = true;
        self.error = None;

        Some(FetchRequest {
            username: self.username.clone(),
            page: self.fetch_page + 1,
            per_page: self.config.fetch_page_size,
            epoch: self.epoch,
        })
    }

    /// Deliver the outcome of a load-more fetch. A failure surfaces its
    /// message but never discards already-accumulated items. Stale epochs
    /// are ignored.
    pub fn finish_load_more(
        &mut self,
        request: &FetchRequest,
        outcome: Result<FetchedPage, String>,
    ) {
        if request.epoch != self.epoch {
            return;
        }

        match outcome {
            Ok(page) => {
                self.repositories.extend(page.repositories);
                self.fetch_page = request.page;
                self.has_more = page.has_more;
                // The accumulated set changed, so the local page starts over.
                self.local_page = 1;
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
        self.loading_more = false;
    }

    /// Change the sort criterion. Resets the local page to 1; no fetch.
    pub fn set_sort(&mut self, sort_by: SortBy) {
        self.sort_by = sort_by;
        self.local_page = 1;
    }

    /// Move to a local page, clamped to the valid range. No fetch.
    pub fn set_local_page(&mut self, page: usize) {
        self.local_page = self.clamp_page(page);
    }

    pub fn local_page(&self) -> usize {
        self.local_page
    }

    pub fn total_pages(&self) -> usize {
        self.repositories.len().div_ceil(self.config.local_page_size)
    }

    fn clamp_page(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages().max(1))
    }

    /// True when the user is on the last local page and upstream may have
    /// more data. Gating on the last page keeps incremental fetches from
    /// firing while the user is still paging through what is already here.
    pub fn can_load_more(&self) -> bool {
        !self.repositories.is_empty()
            && self.local_page == self.total_pages()
            && self.has_more()
            && !self.loading
            && !self.loading_more
    }

    /// Derive the current view: stable-sort a copy of the accumulated set by
    /// the active criterion, then slice at the local page. Recomputed on
    /// every call, never cached.
    pub fn view(&self) -> PageView {
        let mut sorted = self.repositories.clone();
        match self.sort_by {
            SortBy::Stars => sorted.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count)),
            SortBy::Forks => sorted.sort_by(|a, b| b.forks_count.cmp(&a.forks_count)),
            SortBy::None => {}
        }

        let total_count = sorted.len();
        let total_pages = self.total_pages();
        let page_size = self.config.local_page_size;
        let start = (self.local_page - 1) * page_size;
        let end = (start + page_size).min(total_count);
        let repositories = if start < total_count {
            sorted[start..end].to_vec()
        } else {
            Vec::new()
        };

        PageView {
            start_index: if repositories.is_empty() { 0 } else { start + 1 },
            end_index: if repositories.is_empty() { 0 } else { end },
            repositories,
            local_page: self.local_page,
            total_pages,
            total_count,
            is_last_page: self.local_page >= total_pages,
        }
    }
}
