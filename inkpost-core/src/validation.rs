//! Validation error types

use std::fmt;

/// Validation error for caller-supplied input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// String doesn't match required format (e.g., a post id)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Upload content type is not on the allow-list
    UnsupportedType { value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::UnsupportedType { value } => write!(f, "unsupported file type: '{}'", value),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Reject empty (or whitespace-only) required fields.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

/// Post ids are filename stems and must stay a single path component.
pub fn validate_post_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::Empty { field: "id" });
    }
    if id.starts_with('.') || id.contains(['/', '\\', '\0']) {
        return Err(ValidationError::InvalidFormat {
            field: "id",
            reason: "must be a plain file name",
        });
    }
    Ok(())
}
