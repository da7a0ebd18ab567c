//! Browse controller: search, tag and page state for the prompt list.
//!
//! Every prompt fetch takes a sequence number from a monotonically increasing
//! counter. When the response arrives it is applied only if no newer fetch has
//! been issued since; otherwise it is dropped. A fetch that fails logs the
//! error, clears the loading flag and leaves the previous page in place.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, error};

use promptdeck_core::{defaults, ListPromptsRequest, PaginationMeta, Prompt};

use crate::client::PromptClient;
use crate::view::BrowseView;

/// Mutable browse state.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseState {
    pub search: String,
    pub selected_tags: Vec<String>,
    pub page: i64,
    pub per_page: i64,
    pub prompts: Vec<Prompt>,
    pub pagination: Option<PaginationMeta>,
    pub all_tags: Vec<String>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            search: String::new(),
            selected_tags: Vec::new(),
            page: defaults::PAGE,
            per_page: defaults::PAGE_LIMIT,
            prompts: Vec::new(),
            pagination: None,
            all_tags: Vec::new(),
            loading: false,
            last_error: None,
        }
    }
}

impl BrowseState {
    /// Whether a search term or tag filter is active.
    pub fn has_filters(&self) -> bool {
        !self.search.trim().is_empty() || !self.selected_tags.is_empty()
    }

    fn to_request(&self) -> ListPromptsRequest {
        ListPromptsRequest {
            tags: self.selected_tags.clone(),
            search: Some(self.search.clone()).filter(|s| !s.trim().is_empty()),
            page: self.page,
            limit: self.per_page,
        }
    }
}

/// What happened to a fetch's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the current page.
    Applied,
    /// A newer fetch was issued before this one completed.
    Stale,
    /// The request failed; prior state was kept.
    Failed,
}

pub struct BrowseController {
    client: PromptClient,
    state: Mutex<BrowseState>,
    sequence: AtomicU64,
}

impl BrowseController {
    pub fn new(client: PromptClient) -> Self {
        Self::with_state(client, BrowseState::default())
    }

    pub fn with_state(client: PromptClient, state: BrowseState) -> Self {
        Self {
            client,
            state: Mutex::new(state),
            sequence: AtomicU64::new(0),
        }
    }

    pub async fn snapshot(&self) -> BrowseState {
        self.state.lock().await.clone()
    }

    pub async fn view(&self) -> BrowseView {
        BrowseView::from_state(&*self.state.lock().await)
    }

    /// Initial load: the first page and the tag list.
    pub async fn load(&self) -> FetchOutcome {
        let (outcome, _) = tokio::join!(self.refresh(), self.load_tags());
        outcome
    }

    /// Change the search term and return to page 1.
    pub async fn set_search(&self, search: impl Into<String>) -> FetchOutcome {
        {
            let mut state = self.state.lock().await;
            state.search = search.into();
            state.page = defaults::PAGE;
        }
        self.refresh().await
    }

    /// Replace the selected tags and return to page 1.
    pub async fn set_tags(&self, tags: Vec<String>) -> FetchOutcome {
        {
            let mut state = self.state.lock().await;
            state.selected_tags = dedup_tags(tags);
            state.page = defaults::PAGE;
        }
        self.refresh().await
    }

    /// Select `tag` if unselected, deselect it otherwise, and return to page 1.
    pub async fn toggle_tag(&self, tag: &str) -> FetchOutcome {
        let tag = tag.trim();
        {
            let mut state = self.state.lock().await;
            if let Some(pos) = state.selected_tags.iter().position(|t| t == tag) {
                state.selected_tags.remove(pos);
            } else if !tag.is_empty() {
                state.selected_tags.push(tag.to_string());
            }
            state.page = defaults::PAGE;
        }
        self.refresh().await
    }

    /// Navigate to `page`, keeping the current filters.
    pub async fn go_to_page(&self, page: u32) -> FetchOutcome {
        {
            let mut state = self.state.lock().await;
            state.page = i64::from(page.max(1));
        }
        self.refresh().await
    }

    /// Fetch the current page for the current filters.
    pub async fn refresh(&self) -> FetchOutcome {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let request = {
            let mut state = self.state.lock().await;
            state.loading = true;
            state.to_request()
        };

        let result = self.client.list_prompts(&request).await;

        let mut state = self.state.lock().await;
        if self.sequence.load(Ordering::SeqCst) != seq {
            debug!(
                subsystem = "client",
                component = "browse",
                op = "fetch",
                seq,
                "Discarding stale prompt page"
            );
            return FetchOutcome::Stale;
        }

        state.loading = false;
        match result {
            Ok(page) => {
                debug!(
                    subsystem = "client",
                    component = "browse",
                    op = "fetch",
                    seq,
                    result_count = page.data.len(),
                    total_count = page.pagination.total_count,
                    "Applied prompt page"
                );
                state.page = page.pagination.current_page;
                state.prompts = page.data;
                state.pagination = Some(page.pagination);
                state.last_error = None;
                FetchOutcome::Applied
            }
            Err(e) => {
                error!(
                    subsystem = "client",
                    component = "browse",
                    op = "fetch",
                    seq,
                    error = %e,
                    "Error fetching prompts"
                );
                state.last_error = Some(e.to_string());
                FetchOutcome::Failed
            }
        }
    }

    /// Refresh the list of tags offered by the filter.
    pub async fn load_tags(&self) -> FetchOutcome {
        match self.client.list_tags().await {
            Ok(tags) => {
                self.state.lock().await.all_tags = tags;
                FetchOutcome::Applied
            }
            Err(e) => {
                error!(
                    subsystem = "client",
                    component = "browse",
                    op = "load_tags",
                    error = %e,
                    "Error fetching tags"
                );
                FetchOutcome::Failed
            }
        }
    }
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
