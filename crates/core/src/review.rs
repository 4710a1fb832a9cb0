//! Review/article constants and validation functions.
//!
//! A review row doubles as an article when it has no movie. The content type
//! discriminator decides which rating rules apply.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lowest accepted rating.
pub const MIN_RATING: i16 = 1;

/// Highest accepted rating.
pub const MAX_RATING: i16 = 10;

/// Maximum length of a review or article title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Length of the teaser returned by [`short_content`].
pub const SHORT_CONTENT_CHARS: usize = 200;

/// Discriminator stored in `reviews.content_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Review,
    Article,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Review => "review",
            ContentType::Article => "article",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "review" => Ok(ContentType::Review),
            "article" => Ok(ContentType::Article),
            other => Err(CoreError::Validation(format!(
                "Invalid content type '{other}'. Must be one of: review, article"
            ))),
        }
    }
}

/// Validate that a rating is within `MIN_RATING..=MAX_RATING`.
pub fn validate_rating(rating: i16) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be an integer between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(())
}

/// Validate a rating against the content type it belongs to.
///
/// - reviews require a rating in range;
/// - articles must not carry a rating.
pub fn validate_rating_for(content_type: ContentType, rating: Option<i16>) -> Result<(), CoreError> {
    match (content_type, rating) {
        (ContentType::Review, Some(r)) => validate_rating(r),
        (ContentType::Review, None) => Err(CoreError::Validation(
            "Rating is required for reviews".into(),
        )),
        (ContentType::Article, None) => Ok(()),
        (ContentType::Article, Some(_)) => Err(CoreError::Validation(
            "Articles cannot have a rating".into(),
        )),
    }
}

/// Trim a required text field, rejecting empty values.
///
/// `label` is used in the error message, e.g. `"Review text"`.
pub fn require_text(label: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{label} cannot be empty.")));
    }
    Ok(trimmed.to_string())
}

/// Trim and validate a title.
pub fn validate_title(value: &str) -> Result<String, CoreError> {
    let title = require_text("Title", value)?;
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be {MAX_TITLE_LENGTH} characters or fewer."
        )));
    }
    Ok(title)
}

/// First [`SHORT_CONTENT_CHARS`] characters of `text`, with `...` when cut.
pub fn short_content(text: &str) -> String {
    truncate_chars(text, SHORT_CONTENT_CHARS)
}

/// Truncate on a char boundary, appending `...` when anything was dropped.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        for r in MIN_RATING..=MAX_RATING {
            assert!(validate_rating(r).is_ok());
        }
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(11).is_err());
        assert!(validate_rating(-3).is_err());
    }

    #[test]
    fn reviews_require_rating() {
        assert!(validate_rating_for(ContentType::Review, None).is_err());
        assert!(validate_rating_for(ContentType::Review, Some(8)).is_ok());
        assert!(validate_rating_for(ContentType::Review, Some(12)).is_err());
    }

    #[test]
    fn articles_reject_rating() {
        assert!(validate_rating_for(ContentType::Article, None).is_ok());
        assert!(validate_rating_for(ContentType::Article, Some(5)).is_err());
    }

    #[test]
    fn content_type_parses() {
        assert_eq!("article".parse::<ContentType>().unwrap(), ContentType::Article);
        assert!("Article".parse::<ContentType>().is_err());
    }

    #[test]
    fn require_text_trims() {
        assert_eq!(require_text("Review text", "  great  ").unwrap(), "great");
        let err = require_text("Review text", "   ").unwrap_err();
        assert!(err.to_string().contains("Review text cannot be empty"));
    }

    #[test]
    fn title_length_limit() {
        assert!(validate_title(&"t".repeat(MAX_TITLE_LENGTH)).is_ok());
        assert!(validate_title(&"t".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn short_content_is_char_safe() {
        let text = "é".repeat(250);
        let short = short_content(&text);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), SHORT_CONTENT_CHARS + 3);
        assert_eq!(short_content("brief"), "brief");
    }
}
