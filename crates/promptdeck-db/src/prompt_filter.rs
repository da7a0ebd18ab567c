//! Prompt list filter query builder.
//!
//! Turns an owner plus a [`ListPromptsRequest`] into a parameterized WHERE
//! clause over the `prompt p` table alias. The owner predicate is always
//! present and always `$1`.

use promptdeck_core::{ListPromptsRequest, OwnerId};

use crate::escape_like;

/// Type-safe parameter binding for SQL queries.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// String parameter.
    String(String),
    /// Array of strings (for tag membership).
    StringArray(Vec<String>),
    /// 64-bit integer parameter (limit/offset).
    Int(i64),
}

/// Bind a slice of [`QueryParam`]s onto a `sqlx::query` or `sqlx::query_scalar`
/// builder, in order.
macro_rules! bind_query_params {
    ($query:expr, $params:expr) => {{
        let mut q = $query;
        for param in $params {
            q = match param {
                $crate::prompt_filter::QueryParam::String(s) => q.bind(s),
                $crate::prompt_filter::QueryParam::StringArray(arr) => q.bind(arr),
                $crate::prompt_filter::QueryParam::Int(v) => q.bind(v),
            };
        }
        q
    }};
}
pub(crate) use bind_query_params;

/// Generates the WHERE clause for listing one owner's prompts.
///
/// - Tags: a prompt matches when any requested tag equals one of its stored
///   tokens (trimmed, case-insensitive). Several tags are OR-ed.
/// - Search: case-insensitive substring of title OR content. LIKE wildcards
///   in the term are matched literally.
/// - Tag and search filters are AND-ed with each other and with the owner.
///
/// # Example
///
/// ```rust,ignore
/// let builder = PromptFilterQueryBuilder::new(&owner, &req);
/// let (sql, params) = builder.build();
/// // sql: "p.user_id = $1 AND EXISTS (...$2...) AND (p.title ILIKE $3 ESCAPE '\' OR ...)"
/// ```
pub struct PromptFilterQueryBuilder {
    owner: String,
    tags: Vec<String>,
    search: Option<String>,
}

impl PromptFilterQueryBuilder {
    pub fn new(owner: &OwnerId, req: &ListPromptsRequest) -> Self {
        Self {
            owner: owner.as_str().to_string(),
            tags: req.effective_tags(),
            search: req.effective_search().map(String::from),
        }
    }

    /// Build the WHERE clause fragment and its parameters in placeholder order.
    pub fn build(&self) -> (String, Vec<QueryParam>) {
        let mut clauses = vec!["p.user_id = $1".to_string()];
        let mut params = vec![QueryParam::String(self.owner.clone())];
        let mut param_idx = 1;

        if !self.tags.is_empty() {
            param_idx += 1;
            clauses.push(format!(
                "EXISTS (SELECT 1 FROM unnest(string_to_array(p.tags, ',')) AS t(tag) WHERE LOWER(btrim(t.tag)) = ANY(SELECT LOWER(unnest(${}::text[]))))",
                param_idx
            ));
            params.push(QueryParam::StringArray(self.tags.clone()));
        }

        if let Some(search) = &self.search {
            param_idx += 1;
            clauses.push(format!(
                "(p.title ILIKE ${0} ESCAPE '\\' OR p.content ILIKE ${0} ESCAPE '\\')",
                param_idx
            ));
            params.push(QueryParam::String(format!("%{}%", escape_like(search))));
        }

        (clauses.join(" AND "), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        OwnerId::new("user_1").unwrap()
    }

    #[test]
    fn test_owner_only() {
        let (sql, params) =
            PromptFilterQueryBuilder::new(&owner(), &ListPromptsRequest::default()).build();

        assert_eq!(sql, "p.user_id = $1");
        assert_eq!(params, vec![QueryParam::String("user_1".to_string())]);
    }

    #[test]
    fn test_tags_bind_as_array() {
        let req = ListPromptsRequest {
            tags: vec!["ai".to_string(), " coding ".to_string(), "".to_string()],
            ..Default::default()
        };
        let (sql, params) = PromptFilterQueryBuilder::new(&owner(), &req).build();

        assert!(sql.starts_with("p.user_id = $1 AND EXISTS ("));
        assert!(sql.contains("string_to_array(p.tags, ',')"));
        assert!(sql.contains("ANY(SELECT LOWER(unnest($2::text[])))"));
        assert_eq!(params.len(), 2);
        assert_eq!(
            params[1],
            QueryParam::StringArray(vec!["ai".to_string(), "coding".to_string()])
        );
    }

    #[test]
    fn test_blank_tags_add_no_clause() {
        let req = ListPromptsRequest {
            tags: vec!["  ".to_string()],
            ..Default::default()
        };
        let (sql, params) = PromptFilterQueryBuilder::new(&owner(), &req).build();

        assert_eq!(sql, "p.user_id = $1");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_search_matches_title_or_content() {
        let req = ListPromptsRequest {
            search: Some(" poem ".to_string()),
            ..Default::default()
        };
        let (sql, params) = PromptFilterQueryBuilder::new(&owner(), &req).build();

        assert_eq!(
            sql,
            "p.user_id = $1 AND (p.title ILIKE $2 ESCAPE '\\' OR p.content ILIKE $2 ESCAPE '\\')"
        );
        assert_eq!(params[1], QueryParam::String("%poem%".to_string()));
    }

    #[test]
    fn test_search_escapes_wildcards() {
        let req = ListPromptsRequest {
            search: Some("50%_off".to_string()),
            ..Default::default()
        };
        let (_, params) = PromptFilterQueryBuilder::new(&owner(), &req).build();

        assert_eq!(params[1], QueryParam::String("%50\\%\\_off%".to_string()));
    }

    #[test]
    fn test_tags_and_search_combined_in_order() {
        let req = ListPromptsRequest {
            tags: vec!["ai".to_string()],
            search: Some("draft".to_string()),
            ..Default::default()
        };
        let (sql, params) = PromptFilterQueryBuilder::new(&owner(), &req).build();

        assert!(sql.contains("$2::text[]"));
        assert!(sql.contains("p.title ILIKE $3"));
        assert_eq!(sql.matches(" AND ").count(), 2);
        assert!(matches!(params[1], QueryParam::StringArray(_)));
        assert_eq!(params[2], QueryParam::String("%draft%".to_string()));
    }
}
