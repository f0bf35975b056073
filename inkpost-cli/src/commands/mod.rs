//! Command implementations for the inkpost CLI

pub mod posts;
pub mod serve;

pub use posts::run_posts;
pub use serve::run_serve;
