//! One-shot messages carried to the next page in the redirect URL.
//!
//! A notice is a closed set of codes rather than free text, so a crafted link
//! can only ever show one of the messages defined here.

use blog_core::validate::{Field, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ArticleCreated,
    CommentAdded,
    ArticleNotFound,
    InvalidComment(ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Success,
    Error,
}

/// What templates receive.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeView {
    pub level: Level,
    pub message: String,
}

/// `?notice=<code>` on any page.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

impl NoticeQuery {
    pub fn view(&self) -> Option<NoticeView> {
        self.notice
            .as_deref()
            .and_then(Notice::from_str)
            .map(|n| n.view())
    }
}

impl Notice {
    pub fn code(&self) -> String {
        match self {
            Self::ArticleCreated => "article_created".into(),
            Self::CommentAdded => "comment_added".into(),
            Self::ArticleNotFound => "article_not_found".into(),
            Self::InvalidComment(ValidationError::Required(field)) => {
                format!("invalid_{}_required", field.as_str())
            }
            Self::InvalidComment(ValidationError::TooLong { field, max }) => {
                format!("invalid_{}_too_long_{}", field.as_str(), max)
            }
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "article_created" => return Some(Self::ArticleCreated),
            "comment_added" => return Some(Self::CommentAdded),
            "article_not_found" => return Some(Self::ArticleNotFound),
            _ => {}
        }

        let rest = s.strip_prefix("invalid_")?;
        let (field, rule) = rest.split_once('_')?;
        let field = match field {
            "author" => Field::Author,
            "content" => Field::Content,
            _ => return None,
        };

        let err = if rule == "required" {
            ValidationError::Required(field)
        } else {
            let max = rule.strip_prefix("too_long_")?.parse().ok()?;
            ValidationError::TooLong { field, max }
        };
        Some(Self::InvalidComment(err))
    }

    pub fn level(&self) -> Level {
        match self {
            Self::ArticleCreated | Self::CommentAdded => Level::Success,
            Self::ArticleNotFound | Self::InvalidComment(_) => Level::Error,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::ArticleCreated => "Article created successfully!".into(),
            Self::CommentAdded => "Comment added successfully!".into(),
            Self::ArticleNotFound => "Article not found!".into(),
            Self::InvalidComment(err) => comment_error_message(err),
        }
    }

    pub fn view(&self) -> NoticeView {
        NoticeView {
            level: self.level(),
            message: self.message(),
        }
    }
}

fn field_label(field: Field) -> &'static str {
    match field {
        Field::Title => "Title",
        Field::Author => "Name",
        Field::Content => "Comment",
    }
}

fn comment_error_message(err: &ValidationError) -> String {
    match err {
        ValidationError::Required(field) => format!("{} is required!", field_label(*field)),
        ValidationError::TooLong { field, max } => {
            format!("{} must be at most {} characters!", field_label(*field), max)
        }
    }
}
