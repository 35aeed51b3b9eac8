//! Core library for the blog.
//!
//! This crate provides the domain models, input validation and database
//! operations for the blog, independent of any transport layer.
//!
//! # Usage
//!
//! ```no_run
//! use blog_core::db::Database;
//! use blog_core::models::*;
//!
//! let db = Database::open_default()?;
//! db.ensure_schema()?;
//!
//! let article = CreateArticleInput {
//!     title: "Hello".into(),
//!     content: "First post".into(),
//!     author: "Ada".into(),
//! }
//! .validate()?;
//! let id = db.create_article(&article)?;
//! let articles = db.list_articles()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod validate;

// Re-export commonly used types at crate root
pub use db::{Database, SchemaRecovery, SchemaStatus};
pub use error::{StoreError, StoreResult};
pub use validate::{Field, ValidationError};
