//! # promptdeck-core
//!
//! Core types, traits, and pagination logic for promptdeck.
//!
//! This crate provides the data structures and repository traits shared by
//! the database layer, the HTTP API and the browse client, plus the two pure
//! algorithms the rest of the system leans on: tag-string parsing and the
//! page-window computation used to render pagination controls.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use pagination::{
    compute_page_window, PageControls, PageMarker, PageSummary, PaginationMeta,
};
pub use tags::{collect_distinct_tags, has_tag, normalize_tag_string, split_tags};
pub use traits::*;
