//! Image files under `<content>/images`
//!
//! Uploads are stored verbatim; permanent post deletion sweeps the images a
//! post referenced, matching them by basename.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;

use crate::config::BlogConfig;
use crate::error::{Result, StoreError};
use crate::validation::ValidationError;

/// Image directory handle
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    allowed_types: Vec<String>,
}

impl ImageStore {
    pub fn new(config: &BlogConfig) -> Self {
        Self {
            dir: config.images_dir(),
            allowed_types: config.allowed_image_types.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store an upload, returning the generated file name.
    ///
    /// Format: `{unix_nanos}-{basename of original}`
    pub async fn save(&self, original_name: &str, content_type: &str, bytes: &[u8]) -> Result<String> {
        if !self.accepts(content_type) {
            return Err(ValidationError::UnsupportedType {
                value: content_type.to_string(),
            }
            .into());
        }

        let base = basename(original_name).ok_or(ValidationError::InvalidFormat {
            field: "filename",
            reason: "must name a file",
        })?;
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let file_name = format!("{}-{}", nanos, base);

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::storage(&self.dir, e))?;
        let path = self.dir.join(&file_name);
        fs::write(&path, bytes)
            .await
            .map_err(|e| StoreError::storage(&path, e))?;

        tracing::info!(file = %file_name, size = bytes.len(), "Saved uploaded image");
        Ok(file_name)
    }

    /// Whether an upload content type is on the allow-list
    pub fn accepts(&self, content_type: &str) -> bool {
        self.allowed_types.iter().any(|t| t == content_type.trim())
    }

    /// Remove every referenced image by basename, best effort.
    ///
    /// Returns how many files were removed; failures are logged and skipped.
    pub async fn remove_referenced<I, S>(&self, references: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = 0;
        for reference in references {
            let Some(name) = basename(reference.as_ref()) else {
                continue;
            };
            let path = self.dir.join(name);
            match fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!("Removed image {}", path.display());
                    removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!("Referenced image {} already gone", path.display());
                }
                Err(e) => {
                    tracing::warn!("Failed to remove image {}: {}", path.display(), e);
                }
            }
        }
        removed
    }
}

/// Last path segment of a file name or URL, ignoring any query or fragment
fn basename(reference: &str) -> Option<&str> {
    let reference = reference.split(['?', '#']).next().unwrap_or_default();
    let name = reference
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()?
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(temp: &TempDir) -> ImageStore {
        ImageStore::new(&BlogConfig::with_root(temp.path().to_path_buf()))
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("foo.png"), Some("foo.png"));
        assert_eq!(
            basename("http://host/content/images/123-foo.png"),
            Some("123-foo.png")
        );
        assert_eq!(basename("/content/images/a.jpg?w=200#top"), Some("a.jpg"));
        assert_eq!(basename("..\\..\\evil.png"), Some("evil.png"));
        assert_eq!(basename("../"), None);
        assert_eq!(basename(""), None);
    }

    #[test]
    fn test_default_allow_list() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        assert!(store.accepts("image/png"));
        assert!(store.accepts(" image/webp "));
        assert!(!store.accepts("text/html"));
    }

    #[tokio::test]
    async fn test_save_rejects_unlisted_type() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let err = store.save("x.html", "text/html", b"<p>").await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::UnsupportedType { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_writes_prefixed_file() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let name = store
            .save("../holiday.png", "image/png", b"png-bytes")
            .await
            .unwrap();

        assert!(name.ends_with("-holiday.png"));
        let saved = fs::read(store.dir().join(&name)).await.unwrap();
        assert_eq!(saved, b"png-bytes");
    }

    #[tokio::test]
    async fn test_remove_referenced_is_best_effort() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        fs::create_dir_all(store.dir()).await.unwrap();
        fs::write(store.dir().join("foo.png"), b"x").await.unwrap();
        fs::write(store.dir().join("keep.png"), b"x").await.unwrap();

        let removed = store
            .remove_referenced(["foo.png", "missing.png", "http://h/content/images/"])
            .await;

        assert_eq!(removed, 1);
        assert!(!store.dir().join("foo.png").exists());
        assert!(store.dir().join("keep.png").exists());
    }
}
