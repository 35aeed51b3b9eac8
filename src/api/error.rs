use std::any::Any;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use blog_core::StoreError;
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;

use super::notice::Notice;
use super::views::SERVER_ERROR_PAGE;

/// Failures of the HTML pages. A missing article sends the reader back to
/// the listing; anything else is a server error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),

    #[error("store task failed: {0}")]
    Task(#[from] JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Store(err) if err.is_not_found() => {
                Redirect::to(&format!("/?notice={}", Notice::ArticleNotFound.code()))
                    .into_response()
            }
            err => {
                tracing::error!(error = %err, "Request failed");
                server_error_page()
            }
        }
    }
}

/// Failures of the JSON endpoints.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no article with id {0:?}")]
    InvalidId(String),

    #[error("store task failed: {0}")]
    Task(#[from] JoinError),
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidId(_) => StatusCode::NOT_FOUND,
            Self::Store(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Task(_) => {
                tracing::error!(error = %self, "Request failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response();
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Response for a handler that panicked.
pub(crate) fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = detail, "Handler panicked");
    server_error_page()
}

fn server_error_page() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_PAGE)).into_response()
}
