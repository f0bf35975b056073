//! Application state shared across handlers

use inkpost_core::{BlogConfig, ImageStore, PhotoStore, PostStore, Result};

/// Shared application state, handed to handlers as `State<Arc<AppState>>`
pub struct AppState {
    pub posts: PostStore,
    pub photos: PhotoStore,
    pub images: ImageStore,
    pub passphrase: String,
}

impl AppState {
    /// Open every store under `config`
    pub async fn open(config: BlogConfig, passphrase: impl Into<String>) -> Result<Self> {
        let photos = PhotoStore::new(config.photos_file.clone());
        let images = ImageStore::new(&config);
        let posts = PostStore::open(config).await?;

        Ok(Self {
            posts,
            photos,
            images,
            passphrase: passphrase.into(),
        })
    }

    pub fn config(&self) -> &BlogConfig {
        self.posts.config()
    }
}
