//! Render-ready projection of the browse state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use promptdeck_core::{defaults, PageControls, PageSummary, Prompt};

use crate::browse::BrowseState;

/// One prompt as displayed in the list, with display defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptCard {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub cover_img: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Prompt> for PromptCard {
    fn from(prompt: &Prompt) -> Self {
        let cover_img = prompt
            .cover_img
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(defaults::COVER_IMAGE);

        Self {
            id: prompt.id,
            title: prompt.title.clone(),
            content: prompt.content.clone(),
            tags: prompt.tag_list(),
            cover_img: cover_img.to_string(),
            version: prompt.version_or_default().to_string(),
            created_at: prompt.created_at,
        }
    }
}

/// Why the list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// The user has no prompts at all.
    NoPrompts,
    /// A search or tag filter excluded everything.
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoPrompts => "No prompts yet",
            EmptyState::NoMatches => "No matching prompts found",
        }
    }
}

/// Everything a renderer needs for the prompt list page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowseView {
    pub loading: bool,
    pub cards: Vec<PromptCard>,
    pub available_tags: Vec<String>,
    pub selected_tags: Vec<String>,
    pub search: String,
    /// Present only when the current page holds at least one match.
    pub summary: Option<PageSummary>,
    /// Present only when there is more than one page.
    pub controls: Option<PageControls>,
    pub empty: Option<EmptyState>,
}

impl BrowseView {
    pub fn from_state(state: &BrowseState) -> Self {
        let cards: Vec<PromptCard> = state.prompts.iter().map(PromptCard::from).collect();

        let (summary, controls) = match &state.pagination {
            Some(meta) if meta.total_count > 0 => (
                meta.summary(),
                PageControls::new(
                    to_page(meta.current_page),
                    to_page(meta.total_pages),
                    defaults::PAGE_WINDOW_DELTA,
                ),
            ),
            _ => (None, None),
        };

        let empty = if state.loading || !cards.is_empty() {
            None
        } else if state.has_filters() {
            Some(EmptyState::NoMatches)
        } else {
            Some(EmptyState::NoPrompts)
        };

        Self {
            loading: state.loading,
            cards,
            available_tags: state.all_tags.clone(),
            selected_tags: state.selected_tags.clone(),
            search: state.search.clone(),
            summary,
            controls,
            empty,
        }
    }
}

fn to_page(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
