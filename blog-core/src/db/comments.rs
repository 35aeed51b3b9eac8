use rusqlite::{ffi, params, Row};

use super::{timestamp, Database};
use crate::error::{StoreError, StoreResult};
use crate::models::{ArticleWithComments, Comment, NewComment};

impl Database {
    /// Comments on an article in posting order.
    ///
    /// An unknown article id yields an empty list; callers that care check
    /// existence themselves.
    pub fn list_comments(&self, article_id: i64) -> StoreResult<Vec<Comment>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, article_id, author, content, created_at
             FROM comments
             WHERE article_id = ?1
             ORDER BY julianday(created_at) ASC, id ASC",
        )?;

        let comments = stmt
            .query_map([article_id], comment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    pub fn get_article_with_comments(&self, id: i64) -> StoreResult<ArticleWithComments> {
        let article = self.get_article(id)?;
        let comments = self.list_comments(id)?;
        Ok(ArticleWithComments { article, comments })
    }

    /// Inserts a comment on an existing article and returns the comment's id.
    ///
    /// Fails with [`StoreError::ArticleNotFound`] without writing anything if
    /// the article does not exist.
    pub fn create_comment(&self, article_id: i64, input: &NewComment) -> StoreResult<i64> {
        if !self.article_exists(article_id)? {
            return Err(StoreError::ArticleNotFound(article_id));
        }

        let conn = self.connect()?;
        let inserted = conn.execute(
            "INSERT INTO comments (article_id, author, content) VALUES (?1, ?2, ?3)",
            params![article_id, input.author, input.content],
        );

        match inserted {
            Ok(_) => {}
            // The article vanished between the check and the insert.
            Err(err) if is_foreign_key_violation(&err) => {
                return Err(StoreError::ArticleNotFound(article_id));
            }
            Err(err) => return Err(err.into()),
        }
        let id = conn.last_insert_rowid();

        tracing::debug!(article_id, comment_id = id, "Created comment");
        Ok(id)
    }
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        article_id: row.get("article_id")?,
        author: row.get("author")?,
        content: row.get("content")?,
        created_at: timestamp(row, "created_at")?,
    })
}
