use axum::extract::{Path, State};
use axum::Json;
use blog_core::models::{ArticleSummary, ArticleWithComments};

use super::{AppState, JsonError};

pub async fn list_articles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArticleSummary>>, JsonError> {
    let articles = state
        .with_store(|db| Ok::<_, JsonError>(db.list_articles()?))
        .await?;
    Ok(Json(articles))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticleWithComments>, JsonError> {
    let id: i64 = id.parse().map_err(|_| JsonError::InvalidId(id.clone()))?;
    let post = state
        .with_store(move |db| Ok::<_, JsonError>(db.get_article_with_comments(id)?))
        .await?;
    Ok(Json(post))
}
