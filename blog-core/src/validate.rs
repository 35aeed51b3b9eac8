//! Field-level validation for article and comment submissions.
//!
//! Every field is trimmed before it is checked or stored, and lengths are
//! counted in characters rather than bytes. Validation never touches storage:
//! a submission that fails here is rejected before the article existence
//! check that `create_comment` performs.

use std::fmt;

use thiserror::Error;

use crate::models::{CreateArticleInput, CreateCommentInput, NewArticle, NewComment};

pub const TITLE_MAX_CHARS: usize = 200;
pub const ARTICLE_CONTENT_MAX_CHARS: usize = 10_000;
pub const AUTHOR_MAX_CHARS: usize = 100;
pub const COMMENT_CONTENT_MAX_CHARS: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Content,
    Author,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::Author => "author",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(Field),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: Field, max: usize },
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            Self::Required(field) | Self::TooLong { field, .. } => *field,
        }
    }
}

impl CreateArticleInput {
    pub fn validate(&self) -> Result<NewArticle, ValidationError> {
        let title = self.title.trim();
        let content = self.content.trim();
        let author = self.author.trim();

        required(Field::Title, title)?;
        required(Field::Content, content)?;
        required(Field::Author, author)?;

        at_most(Field::Title, title, TITLE_MAX_CHARS)?;
        at_most(Field::Author, author, AUTHOR_MAX_CHARS)?;
        at_most(Field::Content, content, ARTICLE_CONTENT_MAX_CHARS)?;

        Ok(NewArticle {
            title: title.to_string(),
            content: content.to_string(),
            author: author.to_string(),
        })
    }
}

impl CreateCommentInput {
    pub fn validate(&self) -> Result<NewComment, ValidationError> {
        let author = self.author.trim();
        let content = self.content.trim();

        required(Field::Author, author)?;
        required(Field::Content, content)?;

        at_most(Field::Author, author, AUTHOR_MAX_CHARS)?;
        at_most(Field::Content, content, COMMENT_CONTENT_MAX_CHARS)?;

        Ok(NewComment {
            author: author.to_string(),
            content: content.to_string(),
        })
    }
}

fn required(field: Field, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

fn at_most(field: Field, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}
