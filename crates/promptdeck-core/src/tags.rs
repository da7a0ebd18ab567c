//! Tag string parsing.
//!
//! Prompts store their tags as one comma-separated string. The helpers here
//! derive the tag set from that string the same way everywhere: split on `,`,
//! trim each token, drop empty tokens.

use std::collections::{BTreeSet, HashSet};

use crate::defaults::TAG_DELIMITER;

/// Split a stored tag string into its tokens, in stored order.
///
/// # Examples
///
/// ```
/// use promptdeck_core::split_tags;
///
/// assert_eq!(split_tags(" ai, writing ,,"), vec!["ai", "writing"]);
/// assert!(split_tags("").is_empty());
/// ```
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(TAG_DELIMITER)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Canonical stored form of a tag string.
///
/// Tokens are trimmed, blanks dropped, and exact duplicates removed keeping
/// the first occurrence.
pub fn normalize_tag_string(raw: &str) -> String {
    let mut seen = HashSet::new();
    split_tags(raw)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Whether `tag` is one of the tokens of `raw`.
///
/// Comparison is per whole token and case-insensitive, so `ai` matches
/// `"ai,writing"` but never `"chatai"`.
pub fn has_tag(raw: &str, tag: &str) -> bool {
    let wanted = tag.trim().to_lowercase();
    if wanted.is_empty() {
        return false;
    }
    raw.split(TAG_DELIMITER)
        .map(str::trim)
        .any(|t| t.to_lowercase() == wanted)
}

/// Distinct tags across many stored tag strings, lexicographically sorted.
///
/// De-duplication is by exact string equality after trimming.
pub fn collect_distinct_tags<'a, I>(raw_tags: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    raw_tags
        .into_iter()
        .flat_map(split_tags)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
