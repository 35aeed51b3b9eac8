use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Comment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// An article as shown in the listing, with its live comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    #[serde(flatten)]
    pub article: Article,
    pub comment_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleWithComments {
    #[serde(flatten)]
    pub article: Article,
    pub comments: Vec<Comment>,
}

/// Raw article fields as submitted. Call `validate` to get a [`NewArticle`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateArticleInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
}

/// Trimmed, bounds-checked article fields. Only the validator builds these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author: String,
}

impl NewArticle {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &str {
        &self.author
    }
}
