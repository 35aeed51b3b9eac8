use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub article_id: i64,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Raw comment fields as submitted. The target article comes from the route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCommentInput {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub(crate) author: String,
    pub(crate) content: String,
}

impl NewComment {
    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
