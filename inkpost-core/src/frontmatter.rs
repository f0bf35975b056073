//! Post document format: line-oriented frontmatter + markdown body
//!
//! ```markdown
//! ---
//! title:    Hello World
//! created:  2024-03-05 09:07
//! updated:  2024-03-05 09:07
//! category: notes
//! summary:  A first post
//! tags:
//!   - rust
//!   - blog
//! deleted: true
//! ---
//!
//! Body here
//! ```
//!
//! This is not YAML. Scalar fields are found by line-anchored `key:`
//! matching, tags are the `  - ` list lines inside the block, and values are
//! written raw without escaping. A value containing a newline or a `---`
//! line will corrupt the document; that limitation is inherited as-is.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::post::Post;

const DELIMITER: &str = "---";

/// Opening delimiter, lazily-matched block, closing delimiter, body
static DOCUMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---\n(.*?)\n---\n(.*)\z").expect("invalid document regex")
});

/// Same split, but keeping both delimiters inside the block capture
static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A(---\n.*?\n---\n)(.*)\z").expect("invalid block regex")
});

/// Leading frontmatter on caller-supplied content (editors send whole documents)
static EMBEDDED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---\n.*?\n---\n\s*(.*)\z").expect("invalid embedded frontmatter regex")
});

static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([A-Za-z_][A-Za-z0-9_]*):(.*)$").expect("invalid field regex")
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^  - (.+)$").expect("invalid tag regex"));

static DELETED_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^deleted:.*$").expect("invalid deleted regex"));

static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[.*?\]\((.*?)\)").expect("invalid image regex"));

/// Frontmatter decode errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrontmatterError {
    #[error("no frontmatter found - document must start with ---")]
    NoFrontmatter,

    #[error("unclosed frontmatter - missing closing ---")]
    Unclosed,
}

/// Encode/decode contract for post documents
///
/// The post store only talks to documents through this trait, so a
/// different on-disk format can be swapped in without touching it.
pub trait PostCodec: Send + Sync {
    /// Render a post as a full document
    fn encode(&self, post: &Post) -> String;

    /// Parse a document; `id` comes from the file name
    fn decode(&self, id: &str, text: &str) -> Result<Post, FrontmatterError>;

    /// Rewrite only the deletion flag, leaving every other byte untouched
    fn set_deleted(&self, text: &str, deleted: bool) -> Result<String, FrontmatterError>;

    /// Image targets referenced from the document
    fn image_references(&self, text: &str) -> Vec<String>;
}

/// The line-oriented frontmatter format
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontmatterCodec;

impl PostCodec for FrontmatterCodec {
    fn encode(&self, post: &Post) -> String {
        encode(post)
    }

    fn decode(&self, id: &str, text: &str) -> Result<Post, FrontmatterError> {
        decode(id, text)
    }

    fn set_deleted(&self, text: &str, deleted: bool) -> Result<String, FrontmatterError> {
        set_deleted(text, deleted)
    }

    fn image_references(&self, text: &str) -> Vec<String> {
        image_references(text)
    }
}

/// Encode a post in fixed field order
pub fn encode(post: &Post) -> String {
    let mut lines = vec![
        DELIMITER.to_string(),
        format!("title:    {}", post.title),
        format!("created:  {}", post.created),
        format!("updated:  {}", post.updated),
        format!("category: {}", post.category),
        format!("summary:  {}", post.summary),
        "tags:".to_string(),
    ];
    lines.extend(post.tags.iter().map(|tag| format!("  - {}", tag)));
    if post.deleted {
        lines.push("deleted: true".to_string());
    }
    lines.push(DELIMITER.to_string());

    format!("{}\n\n{}", lines.join("\n"), strip_frontmatter(&post.content))
}

/// Decode a document into a post
pub fn decode(id: &str, text: &str) -> Result<Post, FrontmatterError> {
    let caps = DOCUMENT_RE.captures(text).ok_or_else(|| classify(text))?;
    let block = caps.get(1).map_or("", |m| m.as_str());
    let body = caps.get(2).map_or("", |m| m.as_str());

    Ok(Post {
        id: id.to_string(),
        title: extract_field(block, "title"),
        category: extract_field(block, "category"),
        summary: extract_field(block, "summary"),
        content: body.trim().to_string(),
        tags: extract_tags(block),
        created: extract_field(block, "created"),
        updated: extract_field(block, "updated"),
        deleted: extract_field(block, "deleted") == "true",
    })
}

/// Set the `deleted:` line to `deleted`, inserting it before the closing
/// delimiter when absent.
pub fn set_deleted(text: &str, deleted: bool) -> Result<String, FrontmatterError> {
    let caps = BLOCK_RE.captures(text).ok_or_else(|| classify(text))?;
    let block = caps.get(1).map_or("", |m| m.as_str());
    let body = caps.get(2).map_or("", |m| m.as_str());
    let line = format!("deleted: {}", deleted);

    let block = match DELETED_LINE_RE.find(block) {
        Some(m) => format!("{}{}{}", &block[..m.start()], line, &block[m.end()..]),
        None => {
            // block always ends with "---\n"
            let close = block.len() - DELIMITER.len() - 1;
            format!("{}{}\n{}", &block[..close], line, &block[close..])
        }
    };

    Ok(block + body)
}

/// Body of caller content, dropping a leading frontmatter block if present
pub fn strip_frontmatter(content: &str) -> &str {
    match EMBEDDED_RE.captures(content).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim(),
        None => content.trim(),
    }
}

/// Value of the first `key:` line in the block, trimmed; empty when absent
pub fn extract_field(block: &str, key: &str) -> String {
    FIELD_RE
        .captures_iter(block)
        .find(|c| &c[1] == key)
        .map(|c| c[2].trim().to_string())
        .unwrap_or_default()
}

/// All `  - tag` lines in order
pub fn extract_tags(block: &str) -> Vec<String> {
    TAG_RE
        .captures_iter(block)
        .map(|c| c[1].trim_end_matches('\r').to_string())
        .collect()
}

/// Targets of every `![alt](url)` in document order
pub fn image_references(text: &str) -> Vec<String> {
    IMAGE_RE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

fn classify(text: &str) -> FrontmatterError {
    if text.starts_with("---\n") {
        FrontmatterError::Unclosed
    } else {
        FrontmatterError::NoFrontmatter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post {
            id: "2024-03-05T09-07-Hello-World".into(),
            title: "Hello World".into(),
            category: "notes".into(),
            summary: "A first post".into(),
            content: "\n\n# Heading\n\nSome body.\n\n".into(),
            tags: vec!["rust".into(), "blog".into(), "rust".into()],
            created: "2024-03-05 09:07".into(),
            updated: "2024-03-06 10:00".into(),
            deleted: false,
        }
    }

    #[test]
    fn test_encode_layout() {
        let text = encode(&sample_post());
        let expected = "---\n\
title:    Hello World\n\
created:  2024-03-05 09:07\n\
updated:  2024-03-06 10:00\n\
category: notes\n\
summary:  A first post\n\
tags:\n\
\x20 - rust\n\
\x20 - blog\n\
\x20 - rust\n\
---\n\
\n\
# Heading\n\nSome body.";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_encode_deleted_line() {
        let mut post = sample_post();
        post.deleted = true;
        let text = encode(&post);
        assert!(text.contains("  - rust\ndeleted: true\n---\n"));
    }

    #[test]
    fn test_round_trip() {
        for deleted in [false, true] {
            let mut post = sample_post();
            post.deleted = deleted;
            let decoded = decode(&post.id, &encode(&post)).unwrap();

            assert_eq!(decoded.id, post.id);
            assert_eq!(decoded.title, post.title);
            assert_eq!(decoded.category, post.category);
            assert_eq!(decoded.summary, post.summary);
            assert_eq!(decoded.tags, post.tags);
            assert_eq!(decoded.created, post.created);
            assert_eq!(decoded.updated, post.updated);
            assert_eq!(decoded.deleted, deleted);
            assert_eq!(decoded.content, "# Heading\n\nSome body.");
        }
    }

    #[test]
    fn test_round_trip_empty_optional_fields() {
        let post = Post {
            id: "x".into(),
            title: "Only a title".into(),
            content: "body".into(),
            ..Default::default()
        };
        let decoded = decode("x", &encode(&post)).unwrap();
        assert_eq!(decoded.category, "");
        assert_eq!(decoded.summary, "");
        assert!(decoded.tags.is_empty());
        assert_eq!(decoded.content, "body");
    }

    #[test]
    fn test_decode_missing_fields_are_empty() {
        let text = "---\ntitle: Just a title\n---\n\nBody";
        let post = decode("id", text).unwrap();
        assert_eq!(post.title, "Just a title");
        assert_eq!(post.category, "");
        assert_eq!(post.created, "");
        assert!(post.tags.is_empty());
        assert!(!post.deleted);
        assert_eq!(post.content, "Body");
    }

    #[test]
    fn test_decode_no_frontmatter() {
        assert_eq!(
            decode("id", "Just plain text"),
            Err(FrontmatterError::NoFrontmatter)
        );
    }

    #[test]
    fn test_decode_unclosed_frontmatter() {
        assert_eq!(
            decode("id", "---\ntitle: Test\n"),
            Err(FrontmatterError::Unclosed)
        );
    }

    #[test]
    fn test_decode_body_rule_is_not_a_delimiter() {
        let text = "---\ntitle: T\n---\n\nabove\n\n---\n\nbelow";
        let post = decode("id", text).unwrap();
        assert_eq!(post.content, "above\n\n---\n\nbelow");
    }

    #[test]
    fn test_deleted_requires_exact_true() {
        let text = "---\ntitle: T\ndeleted: false\n---\n\nb";
        assert!(!decode("id", text).unwrap().deleted);
        let text = "---\ntitle: T\ndeleted:   true  \n---\n\nb";
        assert!(decode("id", text).unwrap().deleted);
    }

    #[test]
    fn test_body_mentioning_deleted_is_not_deleted() {
        let text = "---\ntitle: T\n---\n\ndeleted: true";
        assert!(!decode("id", text).unwrap().deleted);
    }

    #[test]
    fn test_set_deleted_inserts_before_closing_delimiter() {
        let original = encode(&sample_post());
        let trashed = set_deleted(&original, true).unwrap();
        assert!(trashed.contains("  - rust\ndeleted: true\n---\n\n# Heading"));
        assert!(decode("id", &trashed).unwrap().deleted);
    }

    #[test]
    fn test_set_deleted_is_idempotent() {
        let original = encode(&sample_post());
        let once = set_deleted(&original, true).unwrap();
        let twice = set_deleted(&once, true).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_set_deleted_round_trip_only_changes_deleted_line() {
        let original = encode(&sample_post());
        let trashed = set_deleted(&original, true).unwrap();
        let restored = set_deleted(&trashed, false).unwrap();

        assert_eq!(
            restored,
            original.replace("  - rust\n---\n", "  - rust\ndeleted: false\n---\n")
        );
        assert!(!decode("id", &restored).unwrap().deleted);
    }

    #[test]
    fn test_set_deleted_preserves_foreign_bytes() {
        let text = "---\ntitle:   spaced   \ncustom: kept\n---\nbody   \n\n";
        let out = set_deleted(text, true).unwrap();
        assert_eq!(
            out,
            "---\ntitle:   spaced   \ncustom: kept\ndeleted: true\n---\nbody   \n\n"
        );
    }

    #[test]
    fn test_set_deleted_malformed() {
        assert_eq!(
            set_deleted("no block here", true),
            Err(FrontmatterError::NoFrontmatter)
        );
        assert_eq!(
            set_deleted("---\ntitle: x", true),
            Err(FrontmatterError::Unclosed)
        );
    }

    #[test]
    fn test_strip_frontmatter() {
        assert_eq!(strip_frontmatter("  plain body \n"), "plain body");
        assert_eq!(
            strip_frontmatter("---\ntitle: x\ndate: y\n---\n\n  body text\n"),
            "body text"
        );
    }

    #[test]
    fn test_encode_strips_embedded_frontmatter() {
        let mut post = sample_post();
        post.content = "---\ntitle: editor copy\n---\n\nreal body".into();
        let decoded = decode("id", &encode(&post)).unwrap();
        assert_eq!(decoded.content, "real body");
        assert_eq!(decoded.title, "Hello World");
    }

    #[test]
    fn test_image_references() {
        let text = "intro ![one](foo.png) and ![](http://host/content/images/12-bar.jpg)\n![x]()";
        assert_eq!(
            image_references(text),
            vec![
                "foo.png".to_string(),
                "http://host/content/images/12-bar.jpg".to_string()
            ]
        );
    }

    #[test]
    fn test_codec_trait_delegates() {
        let codec = FrontmatterCodec;
        let post = sample_post();
        let text = codec.encode(&post);
        assert_eq!(codec.decode(&post.id, &text).unwrap().title, post.title);
        assert!(codec.set_deleted(&text, true).unwrap().contains("deleted: true"));
    }
}
