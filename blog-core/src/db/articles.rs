use rusqlite::{params, OptionalExtension, Row};

use super::{timestamp, Database};
use crate::error::{StoreError, StoreResult};
use crate::models::{Article, ArticleSummary, NewArticle};

impl Database {
    /// All articles, newest first, each with its comment count.
    pub fn list_articles(&self) -> StoreResult<Vec<ArticleSummary>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT a.id, a.title, a.content, a.author, a.created_at,
                    COUNT(c.id) AS comment_count
             FROM articles a
             LEFT JOIN comments c ON c.article_id = a.id
             GROUP BY a.id
             ORDER BY julianday(a.created_at) DESC, a.id DESC",
        )?;

        let articles = stmt
            .query_map([], |row| {
                Ok(ArticleSummary {
                    article: article_from_row(row)?,
                    comment_count: row.get("comment_count")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(articles)
    }

    pub fn get_article(&self, id: i64) -> StoreResult<Article> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT id, title, content, author, created_at FROM articles WHERE id = ?1",
            [id],
            article_from_row,
        )
        .optional()?
        .ok_or(StoreError::ArticleNotFound(id))
    }

    pub fn article_exists(&self, id: i64) -> StoreResult<bool> {
        let conn = self.connect()?;
        let exists = conn
            .prepare("SELECT 1 FROM articles WHERE id = ?1")?
            .exists([id])?;
        Ok(exists)
    }

    /// Inserts an article and returns its new id.
    pub fn create_article(&self, input: &NewArticle) -> StoreResult<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO articles (title, content, author) VALUES (?1, ?2, ?3)",
            params![input.title, input.content, input.author],
        )?;
        let id = conn.last_insert_rowid();

        tracing::debug!(article_id = id, "Created article");
        Ok(id)
    }
}

fn article_from_row(row: &Row<'_>) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        author: row.get("author")?,
        created_at: timestamp(row, "created_at")?,
    })
}
