//! File-backed post collection
//!
//! One `<id>.md` document per post. Every operation is a whole-file
//! read/decode/mutate/encode/write; there is no locking, so concurrent
//! writers to the same id race and the last write wins.

use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tokio::fs;

use crate::clock::CivilClock;
use crate::config::BlogConfig;
use crate::error::{Result, StoreError};
use crate::frontmatter::{FrontmatterCodec, PostCodec};
use crate::images::ImageStore;
use crate::listing::{self, ListFilter};
use crate::post::{build_post_id, Post, PostInput};
use crate::validation::validate_post_id;

const RESOURCE: &str = "post";

/// Post store over a posts directory
#[derive(Debug, Clone)]
pub struct PostStore<C = FrontmatterCodec> {
    config: BlogConfig,
    clock: CivilClock,
    images: ImageStore,
    codec: C,
}

impl PostStore<FrontmatterCodec> {
    /// Open the store, creating the posts and images directories if needed
    pub async fn open(config: BlogConfig) -> Result<Self> {
        Self::with_codec(config, FrontmatterCodec).await
    }
}

impl<C: PostCodec> PostStore<C> {
    /// Open the store with an alternate document codec
    pub async fn with_codec(config: BlogConfig, codec: C) -> Result<Self> {
        for dir in [config.posts_dir(), config.images_dir()] {
            fs::create_dir_all(&dir)
                .await
                .map_err(|e| StoreError::storage(&dir, e))?;
            tracing::debug!("Ensured directory {}", dir.display());
        }

        Ok(Self {
            clock: CivilClock::default(),
            images: ImageStore::new(&config),
            config,
            codec,
        })
    }

    pub fn config(&self) -> &BlogConfig {
        &self.config
    }

    pub fn clock(&self) -> &CivilClock {
        &self.clock
    }

    /// Create a post stamped with the current time
    pub async fn create(&self, input: PostInput) -> Result<Post> {
        self.create_at(input, Utc::now()).await
    }

    /// Create a post stamped with `now`.
    ///
    /// A same-minute post with the same sanitized title is overwritten.
    pub async fn create_at(&self, input: PostInput, now: DateTime<Utc>) -> Result<Post> {
        input.validate()?;

        let stamp = self.clock.timestamp(now);
        let id = build_post_id(&self.clock.id_prefix(now), &input.title);
        let post = Post {
            id,
            title: input.title,
            category: input.category,
            summary: input.summary,
            content: input.content,
            tags: input.tags,
            created: stamp.clone(),
            updated: stamp,
            deleted: false,
        };

        let path = self.config.post_path(&post.id);
        let document = self.codec.encode(&post);
        write_document(&path, &document).await?;
        tracing::info!(id = %post.id, "Created post");

        // return what was stored, not what was supplied
        Ok(self.codec.decode(&post.id, &document)?)
    }

    /// Read a single post
    pub async fn read(&self, id: &str) -> Result<Post> {
        let (_, text) = self.load(id).await?;
        Ok(self.codec.decode(id, &text)?)
    }

    /// Update a post stamped with the current time
    pub async fn update(&self, id: &str, input: PostInput) -> Result<Post> {
        self.update_at(id, input, Utc::now()).await
    }

    /// Overwrite a post with caller fields.
    ///
    /// `updated` is recomputed, `created` is kept as the caller sent it and
    /// the trash flag of the existing document carries over.
    pub async fn update_at(&self, id: &str, input: PostInput, now: DateTime<Utc>) -> Result<Post> {
        let (path, existing) = self.load(id).await?;
        input.validate()?;

        let deleted = match self.codec.decode(id, &existing) {
            Ok(post) => post.deleted,
            Err(e) => {
                tracing::warn!(id, "Existing document undecodable ({}), overwriting", e);
                false
            }
        };

        let post = Post {
            id: id.to_string(),
            title: input.title,
            category: input.category,
            summary: input.summary,
            content: input.content,
            tags: input.tags,
            created: input.created,
            updated: self.clock.timestamp(now),
            deleted,
        };

        let document = self.codec.encode(&post);
        write_document(&path, &document).await?;
        tracing::info!(id, "Updated post");

        Ok(self.codec.decode(id, &document)?)
    }

    /// Move a post to the trash
    pub async fn soft_delete(&self, id: &str) -> Result<()> {
        self.set_deleted(id, true).await?;
        tracing::info!(id, "Moved post to trash");
        Ok(())
    }

    /// Bring a post back from the trash
    pub async fn restore(&self, id: &str) -> Result<()> {
        self.set_deleted(id, false).await?;
        tracing::info!(id, "Restored post");
        Ok(())
    }

    /// Delete the post file and the images its document references.
    ///
    /// Image removal is best effort and never blocks the post removal.
    pub async fn permanent_delete(&self, id: &str) -> Result<()> {
        let (path, text) = self.load(id).await?;

        let references = self.codec.image_references(&text);
        let removed = self.images.remove_referenced(&references).await;

        fs::remove_file(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::not_found(RESOURCE, id),
            _ => StoreError::storage(&path, e),
        })?;

        tracing::info!(id, images = removed, "Permanently deleted post");
        Ok(())
    }

    /// Posts in (`deleted == true`) or out of the trash, newest first
    pub async fn list(&self, deleted: bool) -> Result<Vec<Post>> {
        self.list_filtered(deleted, &ListFilter::default()).await
    }

    /// Like [`list`](Self::list) with category/tag narrowing
    pub async fn list_filtered(&self, deleted: bool, filter: &ListFilter) -> Result<Vec<Post>> {
        listing::list_posts(&self.codec, &self.config.posts_dir(), deleted, filter).await
    }

    async fn set_deleted(&self, id: &str, deleted: bool) -> Result<()> {
        let (path, text) = self.load(id).await?;
        let document = self.codec.set_deleted(&text, deleted)?;
        write_document(&path, &document).await
    }

    /// Validate the id and read its document
    async fn load(&self, id: &str) -> Result<(PathBuf, String)> {
        validate_post_id(id)?;
        let path = self.config.post_path(id);

        match fs::read_to_string(&path).await {
            Ok(text) => Ok((path, text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::not_found(RESOURCE, id)),
            Err(e) => Err(StoreError::storage(&path, e)),
        }
    }
}

async fn write_document(path: &std::path::Path, document: &str) -> Result<()> {
    fs::write(path, document)
        .await
        .map_err(|e| StoreError::storage(path, e))
}
