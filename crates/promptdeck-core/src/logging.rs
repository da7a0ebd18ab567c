//! Structured logging conventions for promptdeck.
//!
//! Events carry `subsystem`, `component` and `op` fields. The request span
//! declares the entity fields below empty, and handlers record them once the
//! owner or prompt is known.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Failed request or storage operation |
//! | WARN  | Recoverable issue (rejected identity, rate limit, stale response) |
//! | INFO  | Lifecycle events (startup, shutdown), record creation |
//! | DEBUG | Query shapes, intermediate values, config choices |
//! | TRACE | Per-row iteration |

/// Owner identity a request is scoped to.
pub const OWNER_ID: &str = "owner_id";

/// Prompt UUID created by the request.
pub const PROMPT_ID: &str = "prompt_id";
