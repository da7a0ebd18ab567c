//! # promptdeck-client
//!
//! reqwest client for the promptdeck HTTP API and the browse controller that
//! drives a prompt list view: search box, tag filter and pagination bar.
//!
//! ```rust,no_run
//! use promptdeck_client::{BrowseController, PromptClient};
//!
//! # async fn run() -> promptdeck_core::Result<()> {
//! let controller = BrowseController::new(PromptClient::from_env()?);
//! controller.load().await;
//! controller.toggle_tag("writing").await;
//! let view = controller.view().await;
//! println!("{} prompts shown", view.cards.len());
//! # Ok(())
//! # }
//! ```

pub mod browse;
pub mod client;
pub mod config;
pub mod view;

pub use browse::{BrowseController, BrowseState, FetchOutcome};
pub use client::PromptClient;
pub use config::ClientConfig;
pub use view::{BrowseView, EmptyState, PromptCard};
