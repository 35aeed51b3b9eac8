use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use blog_core::models::{CreateArticleInput, CreateCommentInput};
use minijinja::context;

use super::notice::{Notice, NoticeQuery};
use super::views::NOT_FOUND_PAGE;
use super::{ApiError, AppState};

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> Result<Response, ApiError> {
    let articles = state
        .with_store(|db| Ok::<_, ApiError>(db.list_articles()?))
        .await?;

    let page = state.views.render(
        "index.html",
        context! { articles => articles, notice => query.view() },
    )?;
    Ok(page.into_response())
}

/// A missing article surfaces as `StoreError::ArticleNotFound`, which
/// [`ApiError`] turns into a redirect to the listing.
pub async fn show_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<NoticeQuery>,
) -> Result<Response, ApiError> {
    let Some(id) = parse_id(&id) else {
        return Ok(not_found().await.into_response());
    };

    let (article, comments) = state
        .with_store(move |db| {
            let article = db.get_article(id)?;
            let comments = db.list_comments(id)?;
            Ok::<_, ApiError>((article, comments))
        })
        .await?;

    let page = state.views.render(
        "post.html",
        context! { article => article, comments => comments, notice => query.view() },
    )?;
    Ok(page.into_response())
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<CreateCommentInput>,
) -> Result<Response, ApiError> {
    let Some(id) = parse_id(&id) else {
        return Ok(not_found().await.into_response());
    };

    let comment = match input.validate() {
        Ok(comment) => comment,
        Err(err) => {
            tracing::debug!(article_id = id, error = %err, "Rejected comment");
            return Ok(redirect_to_post(id, Notice::InvalidComment(err)));
        }
    };

    state
        .with_store(move |db| Ok::<_, ApiError>(db.create_comment(id, &comment)?))
        .await?;
    Ok(redirect_to_post(id, Notice::CommentAdded))
}

pub async fn new_article(State(state): State<AppState>) -> Result<Response, ApiError> {
    state.with_store(|_| Ok::<_, ApiError>(())).await?;

    let page = state.views.render(
        "create.html",
        context! { form => CreateArticleInput::default() },
    )?;
    Ok(page.into_response())
}

pub async fn create_article(
    State(state): State<AppState>,
    Form(input): Form<CreateArticleInput>,
) -> Result<Response, ApiError> {
    let article = match input.validate() {
        Ok(article) => article,
        Err(err) => {
            tracing::debug!(error = %err, "Rejected article");
            state.with_store(|_| Ok::<_, ApiError>(())).await?;
            let page = state.views.render(
                "create.html",
                context! { form => input, error => article_error_message(&err) },
            )?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let id = state
        .with_store(move |db| Ok::<_, ApiError>(db.create_article(&article)?))
        .await?;
    tracing::info!(article_id = id, "Published article");
    Ok(redirect_to_post(id, Notice::ArticleCreated))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE))
}

/// Any integer is a post id; ids with no article redirect home like any
/// other missing article. Non-integers are an unknown page.
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

fn redirect_to_post(id: i64, notice: Notice) -> Response {
    Redirect::to(&format!("/post/{}?notice={}", id, notice.code())).into_response()
}

fn article_error_message(err: &blog_core::ValidationError) -> String {
    use blog_core::validate::Field;
    use blog_core::ValidationError;

    let label = |field: Field| match field {
        Field::Title => "Title",
        Field::Content => "Content",
        Field::Author => "Author name",
    };
    match err {
        ValidationError::Required(field) => format!("{} is required!", label(*field)),
        ValidationError::TooLong { field, max } => {
            format!("{} must be at most {} characters!", label(*field), max)
        }
    }
}
