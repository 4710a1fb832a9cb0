//! Tag name normalization and validation.
//!
//! Tag names are stored trimmed and lowercased so that `"Noir"`, `" noir "`
//! and `"NOIR"` all resolve to the same row.

use crate::error::CoreError;

/// Maximum length of a normalized tag name (matches `tags.name VARCHAR(50)`).
pub const MAX_TAG_NAME_LENGTH: usize = 50;

/// Normalize a tag name: trim whitespace and lowercase.
pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalize and validate a single tag name.
pub fn validate_tag_name(name: &str) -> Result<String, CoreError> {
    let normalized = normalize_tag_name(name);
    if normalized.is_empty() {
        return Err(CoreError::Validation("Tag name cannot be empty.".into()));
    }
    if normalized.chars().count() > MAX_TAG_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tag name must be {MAX_TAG_NAME_LENGTH} characters or fewer."
        )));
    }
    Ok(normalized)
}

/// Normalize a list of tag names, dropping duplicates while keeping the
/// first-seen order. Fails on the first invalid name.
pub fn normalize_tag_list(names: &[String]) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let normalized = validate_tag_name(name)?;
        if !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    Ok(out)
}
