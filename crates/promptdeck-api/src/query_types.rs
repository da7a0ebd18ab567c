//! Query string parsing for the prompt list endpoint.
//!
//! The list endpoint reads every key/value pair in order so that repeated
//! `tags` keys and the `tag` alias all contribute to one tag list.

use url::form_urlencoded;

use promptdeck_core::{defaults, Error, ListPromptsRequest, Result};

/// Parse the raw `GET /api/prompts` query string into a validated request.
///
/// Accepted keys:
/// - `tags` (or `tags[]`): repeatable; each value may hold comma-separated tags
/// - `tag`: singular alias for `tags`
/// - `search`: free-text term (last value wins)
/// - `page`, `limit`: positive integers, defaulting to 1 and 12
///
/// Unknown keys are ignored. Empty `page`/`limit` values count as absent.
pub fn parse_list_query(raw: Option<&str>) -> Result<ListPromptsRequest> {
    let mut req = ListPromptsRequest::default();

    for (key, value) in form_urlencoded::parse(raw.unwrap_or("").as_bytes()) {
        match key.as_ref() {
            "tags" | "tags[]" | "tag" => {
                req.tags.extend(
                    value
                        .split(defaults::TAG_DELIMITER)
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(String::from),
                );
            }
            "search" => req.search = Some(value.into_owned()),
            "page" => {
                if let Some(page) = parse_int("page", &value)? {
                    req.page = page;
                }
            }
            "limit" => {
                if let Some(limit) = parse_int("limit", &value)? {
                    req.limit = limit;
                }
            }
            _ => {}
        }
    }

    req.validate()?;
    Ok(req)
}

fn parse_int(name: &str, value: &str) -> Result<Option<i64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| Error::InvalidInput(format!("{} must be an integer, got '{}'", name, value)))
}
