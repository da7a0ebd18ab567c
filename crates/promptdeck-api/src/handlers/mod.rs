//! HTTP handler modules for promptdeck-api.

pub mod prompts;
pub mod system;
pub mod tags;
