//! Search constants and helpers.
//!
//! This module lives in `core` (zero internal deps) so the repository layer
//! and the HTTP handlers share one definition of the search contract.

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum results returned per entity type by unified search.
pub const SEARCH_RESULT_LIMIT: i64 = 25;

/// Default page size for list endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Maximum page size for list endpoints.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Default number of tag suggestions.
pub const DEFAULT_SUGGEST_LIMIT: i64 = 10;

/// Maximum number of tag suggestions.
pub const MAX_SUGGEST_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Query builder helpers
// ---------------------------------------------------------------------------

/// Normalize a raw query string. Returns `None` when nothing searchable remains.
pub fn normalize_query(query: &str) -> Option<String> {
    let collapsed = query.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Escape `LIKE` metacharacters (`\`, `%`, `_`) so user input matches literally.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build a `%...%` substring pattern for `ILIKE`, or `None` for blank input.
///
/// # Examples
///
/// ```
/// use reelnotes_core::search::build_contains_pattern;
/// assert_eq!(build_contains_pattern("  noir "), Some("%noir%".to_string()));
/// assert_eq!(build_contains_pattern("50%"), Some("%50\\%%".to_string()));
/// assert_eq!(build_contains_pattern("   "), None);
/// ```
pub fn build_contains_pattern(query: &str) -> Option<String> {
    normalize_query(query).map(|q| format!("%{}%", escape_like(&q)))
}

/// Build a `prefix%` pattern for autocomplete, or `None` for blank input.
pub fn build_prefix_pattern(prefix: &str) -> Option<String> {
    normalize_query(prefix).map(|q| format!("{}%", escape_like(&q)))
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
