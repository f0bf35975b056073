//! Photo records in a single JSON document
//!
//! ```json
//! {
//!     "photos": [
//!         { "id": "...", "urls": ["..."], "title": "...", ... }
//!     ]
//! }
//! ```
//!
//! Plain list/append/replace/remove over the whole document; no soft delete.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use uuid::Uuid;

use crate::error::{Result, StoreError};

const RESOURCE: &str = "photo";
const INDENT: &[u8] = b"    ";

/// A photo group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub urls: Vec<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Caller-supplied, stored verbatim
    pub created: String,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied photo fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PhotoInput {
    pub urls: Vec<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub created: String,
}

/// On-disk document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoCollection {
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// Photo store over one JSON file
#[derive(Debug, Clone)]
pub struct PhotoStore {
    path: PathBuf,
}

impl PhotoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Photos newest first by `created`; `None`, empty or `all` skips the
    /// category filter.
    pub async fn list(&self, category: Option<&str>) -> Result<PhotoCollection> {
        let mut collection = self.load().await?;

        if let Some(category) = category.filter(|c| !c.is_empty() && *c != "all") {
            collection.photos.retain(|p| p.category == category);
        }
        collection.photos.sort_by(|a, b| b.created.cmp(&a.created));

        Ok(collection)
    }

    pub async fn get(&self, id: &str) -> Result<Photo> {
        self.load()
            .await?
            .photos
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found(RESOURCE, id))
    }

    pub async fn create(&self, input: PhotoInput) -> Result<Photo> {
        let mut collection = self.load().await?;

        let photo = Photo {
            id: Uuid::new_v4().to_string(),
            urls: input.urls,
            title: input.title,
            description: input.description,
            category: input.category,
            created: input.created,
            updated_at: Utc::now(),
        };
        collection.photos.push(photo.clone());

        self.save(&collection).await?;
        tracing::info!(id = %photo.id, "Created photo");
        Ok(photo)
    }

    /// Replace every caller field, keeping the id
    pub async fn update(&self, id: &str, input: PhotoInput) -> Result<Photo> {
        let mut collection = self.load().await?;

        let slot = collection
            .photos
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found(RESOURCE, id))?;

        *slot = Photo {
            id: id.to_string(),
            urls: input.urls,
            title: input.title,
            description: input.description,
            category: input.category,
            created: input.created,
            updated_at: Utc::now(),
        };
        let photo = slot.clone();

        self.save(&collection).await?;
        tracing::info!(id, "Updated photo");
        Ok(photo)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut collection = self.load().await?;

        let before = collection.photos.len();
        collection.photos.retain(|p| p.id != id);
        if collection.photos.len() == before {
            return Err(StoreError::not_found(RESOURCE, id));
        }

        self.save(&collection).await?;
        tracing::info!(id, "Deleted photo");
        Ok(())
    }

    /// Missing file reads as an empty collection; unparsable JSON is an error
    async fn load(&self) -> Result<PhotoCollection> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PhotoCollection::default()),
            Err(e) => return Err(StoreError::storage(&self.path, e)),
        };

        serde_json::from_slice(&data).map_err(|e| {
            StoreError::malformed(format!("{}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, collection: &PhotoCollection) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::storage(parent, e))?;
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        collection
            .serialize(&mut serializer)
            .map_err(|e| StoreError::malformed(e.to_string()))?;

        fs::write(&self.path, buf)
            .await
            .map_err(|e| StoreError::storage(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(temp: &TempDir) -> PhotoStore {
        PhotoStore::new(temp.path().join("data").join("photos.json"))
    }

    fn input(title: &str, category: &str, created: &str) -> PhotoInput {
        PhotoInput {
            urls: vec![format!("/content/images/{}.jpg", title)],
            title: title.into(),
            description: "desc".into(),
            category: category.into(),
            created: created.into(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        assert!(store.list(None).await.unwrap().photos.is_empty());
        assert!(matches!(
            store.get("x").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_get_and_document_layout() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let photo = store
            .create(input("sunset", "travel", "2024-01-01"))
            .await
            .unwrap();
        assert_eq!(Uuid::parse_str(&photo.id).unwrap().get_version_num(), 4);

        let fetched = store.get(&photo.id).await.unwrap();
        assert_eq!(fetched, photo);

        let raw = fs::read_to_string(store.path()).await.unwrap();
        assert!(raw.starts_with("{\n    \"photos\": [\n"));
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        store.create(input("a", "travel", "2024-01-01")).await.unwrap();
        store.create(input("b", "food", "2024-03-01")).await.unwrap();
        store.create(input("c", "travel", "2024-02-01")).await.unwrap();

        let all = store.list(Some("all")).await.unwrap();
        let titles: Vec<_> = all.photos.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c", "a"]);

        let travel = store.list(Some("travel")).await.unwrap();
        let titles: Vec<_> = travel.photos.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let photo = store.create(input("a", "travel", "2024-01-01")).await.unwrap();

        let updated = store
            .update(&photo.id, input("renamed", "food", "2024-05-05"))
            .await
            .unwrap();
        assert_eq!(updated.id, photo.id);
        assert_eq!(updated.title, "renamed");
        assert!(updated.updated_at >= photo.updated_at);
        assert_eq!(store.get(&photo.id).await.unwrap().category, "food");

        assert!(matches!(
            store.update("ghost", PhotoInput::default()).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        let keep = store.create(input("keep", "x", "1")).await.unwrap();
        let gone = store.create(input("gone", "x", "2")).await.unwrap();

        store.delete(&gone.id).await.unwrap();
        let left = store.list(None).await.unwrap();
        assert_eq!(left.photos.len(), 1);
        assert_eq!(left.photos[0].id, keep.id);

        assert!(matches!(
            store.delete(&gone.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_corrupt_document_is_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        fs::create_dir_all(store.path().parent().unwrap()).await.unwrap();
        fs::write(store.path(), "{not json").await.unwrap();

        assert!(matches!(
            store.create(input("a", "x", "1")).await,
            Err(StoreError::MalformedDocument { .. })
        ));
        assert_eq!(fs::read_to_string(store.path()).await.unwrap(), "{not json");
    }
}
