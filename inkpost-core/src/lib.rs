//! inkpost-core: the post document model
//!
//! Posts are markdown files with a line-oriented frontmatter block, one file
//! per post; the posts directory is the database. This crate provides:
//! - `frontmatter`: encode/decode of the post document format
//! - `store`: create/read/update and the trash lifecycle over the directory
//! - `listing`: directory scan, deletion-state filtering and ordering
//! - `photos`: the single-document JSON photo store
//! - `images`: uploaded image files and orphan cleanup

pub mod clock;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod images;
pub mod listing;
pub mod photos;
pub mod post;
pub mod store;
pub mod validation;

pub use clock::CivilClock;
pub use config::BlogConfig;
pub use error::{Result, StoreError};
pub use frontmatter::{FrontmatterCodec, PostCodec};
pub use images::ImageStore;
pub use listing::ListFilter;
pub use photos::{Photo, PhotoInput, PhotoStore};
pub use post::{Post, PostInput};
pub use store::PostStore;
pub use validation::ValidationError;
