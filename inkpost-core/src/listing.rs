//! Directory scan, filtering and ordering of posts
//!
//! Every listing re-reads the posts directory: there is no index. Files
//! that cannot be read or decoded are skipped so one corrupt document never
//! takes the whole listing down.

use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use tokio::fs;

use crate::config::is_post_file;
use crate::error::{Result, StoreError};
use crate::frontmatter::PostCodec;
use crate::post::Post;

/// Optional narrowing applied after the deletion-state filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilter {
    /// Exact category match
    pub category: Option<String>,
    /// Post must carry this tag
    pub tag: Option<String>,
}

impl ListFilter {
    /// Category filter only
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            tag: None,
        }
    }

    /// Tag filter only
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            category: None,
            tag: Some(tag.into()),
        }
    }

    fn matches(&self, post: &Post) -> bool {
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if post.category != category {
                return false;
            }
        }
        if let Some(tag) = self.tag.as_deref().filter(|t| !t.is_empty()) {
            if !post.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        true
    }
}

/// List posts whose `deleted` flag equals `want_deleted`, newest first.
///
/// Ordering is a plain string comparison on `created`, which is correct
/// because the stamp is fixed-width and zero-padded. Ties fall back to the
/// id so output does not depend on directory order.
pub async fn list_posts<C: PostCodec + ?Sized>(
    codec: &C,
    posts_dir: &Path,
    want_deleted: bool,
    filter: &ListFilter,
) -> Result<Vec<Post>> {
    let mut entries = match fs::read_dir(posts_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("Posts directory {} missing, listing empty", posts_dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(StoreError::storage(posts_dir, e)),
    };

    let mut posts = Vec::new();

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| StoreError::storage(posts_dir, e))?
    {
        let path = entry.path();

        // Skip directories and non-.md files
        if !is_post_file(&path) {
            continue;
        }
        match entry.file_type().await {
            Ok(ft) if ft.is_dir() => continue,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Failed to stat {}: {}", path.display(), e);
                continue;
            }
        }

        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read post {}: {}", path.display(), e);
                continue;
            }
        };

        let post = match codec.decode(id, &text) {
            Ok(post) => post,
            Err(e) => {
                tracing::warn!("Skipping undecodable post {}: {}", path.display(), e);
                continue;
            }
        };

        if post.deleted != want_deleted || !filter.matches(&post) {
            continue;
        }

        posts.push(post);
    }

    sort_newest_first(&mut posts);
    tracing::debug!(count = posts.len(), want_deleted, "Listed posts");

    Ok(posts)
}

/// Sort by `created` descending, then id descending
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.id.cmp(&a.id)));
}
