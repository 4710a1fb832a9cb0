use std::collections::BTreeMap;

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Per-field validation messages, keyed by field name.
    #[error("Validation failed for fields: {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
    InvalidFields(BTreeMap<String, String>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .map(|e| match &e.message {
                        Some(msg) => msg.to_string(),
                        None => format!("invalid value ({})", e.code),
                    })
                    .unwrap_or_else(|| "invalid value".to_string());
                (field.to_string(), message)
            })
            .collect();
        CoreError::InvalidFields(fields)
    }
}

/// Run `validator` derive rules on a DTO, mapping failures to [`CoreError`].
pub fn validate_input<T: validator::Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(CoreError::from)
}
