//! HTTP surface: HTML pages for reading and writing, plus a read-only JSON view.

mod error;
mod handlers;
mod json;
pub mod notice;
pub mod views;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use blog_core::{Database, StoreError};
use tokio::task::JoinError;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::config::SchemaCheck;
pub use error::{ApiError, JsonError};
pub use notice::Notice;
pub use views::Views;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub views: Arc<Views>,
    pub schema_check: SchemaCheck,
}

impl AppState {
    pub fn new(db: Database, schema_check: SchemaCheck) -> Result<Self, minijinja::Error> {
        Ok(Self {
            db,
            views: Arc::new(Views::new()?),
            schema_check,
        })
    }

    /// Runs `f` against the store on the blocking pool, re-verifying the
    /// schema first when configured to check on every request.
    async fn with_store<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Database) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + From<JoinError> + Send + 'static,
    {
        let db = self.db.clone();
        let schema_check = self.schema_check;
        tokio::task::spawn_blocking(move || {
            if schema_check == SchemaCheck::PerRequest {
                db.ensure_schema()?;
            }
            f(&db)
        })
        .await?
    }
}

pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(handlers::index))
        .route("/post/{id}", get(handlers::show_post))
        .route("/post/{id}/comment", post(handlers::add_comment))
        .route(
            "/create",
            get(handlers::new_article).post(handlers::create_article),
        )
        .route("/api/articles", get(json::list_articles))
        .route("/api/articles/{id}", get(json::get_article))
        .fallback(handlers::not_found)
        .with_state(state);

    with_middleware(router)
}

fn with_middleware(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(error::panic_response)),
    )
}
