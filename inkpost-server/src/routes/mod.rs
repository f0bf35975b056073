//! Route handlers organized by resource

pub mod auth;
pub mod health;
pub mod photos;
pub mod posts;
pub mod uploads;
