//! Post record and caller input

use serde::{Deserialize, Serialize};

use crate::validation::{require_non_empty, ValidationError};

/// A blog post as reconstructed from its document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub category: String,
    pub summary: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created: String,
    pub updated: String,
    pub deleted: bool,
}

impl Post {
    /// File name of the backing document
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, crate::config::POST_EXTENSION)
    }
}

/// Caller-supplied post fields for create and update
///
/// `created` is honoured only by update; `updated` and `deleted` are
/// accepted for wire compatibility and always recomputed by the store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostInput {
    pub title: String,
    pub category: String,
    pub summary: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created: String,
    pub updated: String,
    pub deleted: bool,
}

impl PostInput {
    /// Title and content are required
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("content", &self.content)?;
        Ok(())
    }
}

/// Map every character that is not a letter or digit to `-`.
///
/// No collapsing or trimming: "Hello, World" becomes "Hello--World".
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect()
}

/// Build a post id from the civil id prefix and the title
pub fn build_post_id(id_prefix: &str, title: &str) -> String {
    format!("{}-{}", id_prefix, sanitize_title(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Hello World"), "Hello-World");
        assert_eq!(sanitize_title("Hello, World!"), "Hello--World-");
        assert_eq!(sanitize_title("Rust 2024"), "Rust-2024");
        assert_eq!(sanitize_title("a/b\\c"), "a-b-c");
    }

    #[test]
    fn test_sanitize_keeps_non_ascii_letters() {
        assert_eq!(sanitize_title("你好 世界"), "你好-世界");
    }

    #[test]
    fn test_build_post_id() {
        assert_eq!(
            build_post_id("2024-03-05T09-07", "Hello World"),
            "2024-03-05T09-07-Hello-World"
        );
    }

    #[test]
    fn test_input_validation() {
        let mut input = PostInput {
            title: "Title".into(),
            content: "Body".into(),
            ..Default::default()
        };
        assert!(input.validate().is_ok());

        input.content.clear();
        assert_eq!(
            input.validate(),
            Err(ValidationError::Empty { field: "content" })
        );

        input.title.clear();
        assert_eq!(
            input.validate(),
            Err(ValidationError::Empty { field: "title" })
        );
    }

    #[test]
    fn test_input_defaults_missing_fields() {
        let input: PostInput = serde_json::from_str(r#"{"title":"T","content":"C"}"#).unwrap();
        assert!(input.tags.is_empty());
        assert!(input.category.is_empty());
        assert!(!input.deleted);
    }
}
