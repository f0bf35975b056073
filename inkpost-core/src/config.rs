//! Blog configuration - content paths and upload rules
//!
//! Configuration is loaded from environment variables:
//! - `CONTENT_DIR`: root holding `posts/` and `images/` (default: /var/www/innov.ink)
//! - `PHOTOS_FILE`: JSON photo document (default: data/photos.json)
//! - `ALLOWED_IMAGE_TYPES`: comma-separated upload allow-list

use std::path::{Path, PathBuf};

const DEFAULT_CONTENT_DIR: &str = "/var/www/innov.ink";
const DEFAULT_PHOTOS_FILE: &str = "data/photos.json";
const DEFAULT_IMAGE_TYPES: &str = "image/jpeg,image/png,image/gif,image/webp";

/// File extension of post documents
pub const POST_EXTENSION: &str = "md";

/// Blog configuration
#[derive(Debug, Clone)]
pub struct BlogConfig {
    /// Root content directory (served statically under `/content`)
    pub content_dir: PathBuf,
    /// Photo list document
    pub photos_file: PathBuf,
    /// Content types accepted by the image upload
    pub allowed_image_types: Vec<String>,
}

impl BlogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let content_dir = env_or("CONTENT_DIR", DEFAULT_CONTENT_DIR);
        let photos_file = env_or("PHOTOS_FILE", DEFAULT_PHOTOS_FILE);
        let allowed = env_or("ALLOWED_IMAGE_TYPES", DEFAULT_IMAGE_TYPES);

        Self {
            content_dir: PathBuf::from(content_dir),
            photos_file: PathBuf::from(photos_file),
            allowed_image_types: split_list(&allowed),
        }
    }

    /// Create config with explicit content root (for testing)
    ///
    /// The photo document lives inside the root so tests stay isolated.
    pub fn with_root(content_dir: PathBuf) -> Self {
        Self {
            photos_file: content_dir.join("data").join("photos.json"),
            content_dir,
            allowed_image_types: split_list(DEFAULT_IMAGE_TYPES),
        }
    }

    /// Posts directory
    pub fn posts_dir(&self) -> PathBuf {
        self.content_dir.join("posts")
    }

    /// Images directory
    pub fn images_dir(&self) -> PathBuf {
        self.content_dir.join("images")
    }

    /// Path of the document backing a post id
    pub fn post_path(&self, id: &str) -> PathBuf {
        self.posts_dir().join(format!("{}.{}", id, POST_EXTENSION))
    }
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Whether a directory entry name is a post document
pub fn is_post_file(path: &Path) -> bool {
    path.extension().map(|e| e == POST_EXTENSION).unwrap_or(false)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Split a comma-separated setting, dropping blanks
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_correct() {
        let config = BlogConfig::with_root(PathBuf::from("/test/content"));

        assert_eq!(config.posts_dir(), PathBuf::from("/test/content/posts"));
        assert_eq!(config.images_dir(), PathBuf::from("/test/content/images"));
        assert_eq!(
            config.post_path("2024-01-01T10-00-Hi"),
            PathBuf::from("/test/content/posts/2024-01-01T10-00-Hi.md")
        );
        assert_eq!(
            config.photos_file,
            PathBuf::from("/test/content/data/photos.json")
        );
    }

    #[test]
    fn split_list_trims() {
        assert_eq!(
            split_list(" image/png , ,image/gif"),
            vec!["image/png".to_string(), "image/gif".to_string()]
        );
    }

    #[test]
    fn post_file_extension() {
        assert!(is_post_file(Path::new("a.md")));
        assert!(!is_post_file(Path::new("a.md.bak")));
        assert!(!is_post_file(Path::new("notes.txt")));
    }
}
