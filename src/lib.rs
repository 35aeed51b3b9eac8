pub mod api;
pub mod config;

pub use blog_core::{db, models, validate};
