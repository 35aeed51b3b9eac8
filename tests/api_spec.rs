use std::fs;

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use blog::api::{create_router, AppState};
use blog::config::SchemaCheck;
use blog::db::{Database, SchemaRecovery};
use blog::models::{ArticleSummary, ArticleWithComments};
use tempfile::TempDir;

fn setup_with(schema_check: SchemaCheck) -> (TempDir, Database, TestServer) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = Database::open(dir.path().join("blog.db")).expect("Failed to open database");
    db.ensure_schema().expect("Failed to initialize schema");

    let state = AppState::new(db.clone(), schema_check).expect("Failed to build views");
    let server = TestServer::new(create_router(state)).expect("Failed to start test server");
    (dir, db, server)
}

fn setup() -> (TempDir, Database, TestServer) {
    setup_with(SchemaCheck::Startup)
}

fn location(response: &TestResponse) -> String {
    response
        .header("location")
        .to_str()
        .expect("Location is not ASCII")
        .to_string()
}

#[tokio::test]
async fn index_lists_articles_with_comment_counts() {
    let (_dir, _db, server) = setup();

    let response = server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Welcome to the Blog"));
    assert!(html.contains("Security Basics"));
    assert!(html.contains("2 comments"));
    assert!(html.contains("1 comment"));
}

#[tokio::test]
async fn index_shows_a_notice_from_the_query_string() {
    let (_dir, _db, server) = setup();

    let response = server.get("/?notice=article_not_found").await;
    response.assert_status_ok();
    assert!(response.text().contains("Article not found!"));

    let response = server.get("/?notice=%3Cscript%3E").await;
    response.assert_status_ok();
    assert!(!response.text().contains("<script>"));
}

#[tokio::test]
async fn post_page_shows_comments_in_order() {
    let (_dir, _db, server) = setup();

    let response = server.get("/post/1").await;

    response.assert_status_ok();
    let html = response.text();
    let alice = html.find("Alice").expect("missing first comment");
    let bob = html.find("Bob").expect("missing second comment");
    assert!(alice < bob);
}

#[tokio::test]
async fn missing_post_redirects_home_with_notice() {
    let (_dir, _db, server) = setup();

    let response = server.get("/post/999").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/?notice=article_not_found");
}

#[tokio::test]
async fn zero_and_negative_ids_are_missing_articles() {
    let (_dir, _db, server) = setup();

    for path in ["/post/0", "/post/-1"] {
        let response = server.get(path).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/?notice=article_not_found");
    }
}

#[tokio::test]
async fn non_numeric_post_id_is_not_found() {
    let (_dir, _db, server) = setup();

    let response = server.get("/post/abc").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.text().contains("Page not found"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (_dir, _db, server) = setup();

    server
        .get("/nowhere")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn adding_a_comment_redirects_with_success() {
    let (_dir, db, server) = setup();

    let response = server
        .post("/post/2/comment")
        .form(&[("author", "  Eve "), ("content", "Nice post")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/post/2?notice=comment_added");

    let comments = db.list_comments(2).unwrap();
    let last = comments.last().unwrap();
    assert_eq!(last.author, "Eve");
    assert_eq!(last.content, "Nice post");

    let page = server.get(&location(&response)).await;
    assert!(page.text().contains("Comment added successfully!"));
}

#[tokio::test]
async fn invalid_comment_is_rejected_before_storage() {
    let (_dir, db, server) = setup();
    let before = db.list_comments(1).unwrap().len();

    let response = server
        .post("/post/1/comment")
        .form(&[("author", "Eve"), ("content", "   ")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/post/1?notice=invalid_content_required");
    assert_eq!(db.list_comments(1).unwrap().len(), before);

    let page = server.get(&location(&response)).await;
    assert!(page.text().contains("Comment is required!"));
}

#[tokio::test]
async fn overlong_comment_author_is_rejected() {
    let (_dir, _db, server) = setup();
    let author = "a".repeat(101);

    let response = server
        .post("/post/1/comment")
        .form(&[("author", author.as_str()), ("content", "Hi")])
        .await;

    assert_eq!(
        location(&response),
        "/post/1?notice=invalid_author_too_long_100"
    );
}

#[tokio::test]
async fn validation_runs_before_the_existence_check() {
    let (_dir, _db, server) = setup();

    let response = server
        .post("/post/999/comment")
        .form(&[("author", ""), ("content", "Hi")])
        .await;

    assert_eq!(location(&response), "/post/999?notice=invalid_author_required");
}

#[tokio::test]
async fn comment_on_missing_post_redirects_home() {
    let (_dir, db, server) = setup();

    let response = server
        .post("/post/999/comment")
        .form(&[("author", "Eve"), ("content", "Hello?")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/?notice=article_not_found");
    assert!(db.list_comments(999).unwrap().is_empty());
}

#[tokio::test]
async fn comment_on_post_zero_is_handled_like_any_missing_article() {
    let (_dir, db, server) = setup();

    let response = server
        .post("/post/0/comment")
        .form(&[("author", "Eve"), ("content", "Hello?")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/?notice=article_not_found");
    assert!(db.list_comments(0).unwrap().is_empty());

    let response = server
        .post("/post/0/comment")
        .form(&[("author", ""), ("content", "Hello?")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/post/0?notice=invalid_author_required");
}

#[tokio::test]
async fn create_form_renders() {
    let (_dir, _db, server) = setup();

    let response = server.get("/create").await;

    response.assert_status_ok();
    assert!(response.text().contains("Write an article"));
}

#[tokio::test]
async fn creating_an_article_redirects_to_it() {
    let (_dir, db, server) = setup();

    let response = server
        .post("/create")
        .form(&[("title", " T "), ("content", "C"), ("author", "A")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/post/4?notice=article_created");

    let article = db.get_article(4).unwrap();
    assert_eq!(article.title, "T");
    assert_eq!(db.list_articles().unwrap()[0].article.id, 4);

    let page = server.get(&location(&response)).await;
    page.assert_status_ok();
    assert!(page.text().contains("Article created successfully!"));
}

#[tokio::test]
async fn invalid_article_rerenders_the_form() {
    let (_dir, db, server) = setup();
    let title = "t".repeat(201);

    let response = server
        .post("/create")
        .form(&[("title", title.as_str()), ("content", "Body"), ("author", "Ada")])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text();
    assert!(html.contains("Title must be at most 200 characters!"));
    assert!(html.contains("Ada"));
    assert_eq!(db.list_articles().unwrap().len(), 3);
}

#[tokio::test]
async fn missing_article_fields_are_reported() {
    let (_dir, _db, server) = setup();

    let response = server.post("/create").form(&[("title", "Only")]).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().contains("Content is required!"));
}

#[tokio::test]
async fn json_listing_matches_the_store() {
    let (_dir, _db, server) = setup();

    let response = server.get("/api/articles").await;

    response.assert_status_ok();
    let articles: Vec<ArticleSummary> = response.json();
    assert_eq!(articles.len(), 3);
    assert_eq!(articles[0].article.id, 3);
    assert_eq!(articles[2].comment_count, 2);
}

#[tokio::test]
async fn json_article_includes_comments() {
    let (_dir, _db, server) = setup();

    let response = server.get("/api/articles/1").await;

    response.assert_status_ok();
    let post: ArticleWithComments = response.json();
    assert_eq!(post.article.title, "Welcome to the Blog");
    assert_eq!(post.comments.len(), 2);
}

#[tokio::test]
async fn json_missing_article_is_404() {
    let (_dir, _db, server) = setup();

    server
        .get("/api/articles/999")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/api/articles/abc")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn per_request_check_recreates_a_deleted_database() {
    let (_dir, db, server) = setup_with(SchemaCheck::PerRequest);
    db.create_comment(
        1,
        &blog::models::CreateCommentInput {
            author: "Eve".into(),
            content: "Gone soon".into(),
        }
        .validate()
        .unwrap(),
    )
    .unwrap();

    fs::remove_file(db.path()).unwrap();

    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("Welcome to the Blog"));
    assert_eq!(db.list_comments(1).unwrap().len(), 2);
}

#[tokio::test]
async fn startup_check_does_not_touch_a_running_database() {
    let (_dir, db, server) = setup();
    fs::remove_file(db.path()).unwrap();

    server
        .get("/")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn per_request_check_without_recovery_keeps_a_malformed_database() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = Database::open(dir.path().join("blog.db"))
        .expect("Failed to open database")
        .with_recovery(SchemaRecovery::Fail);
    db.ensure_schema().expect("Failed to initialize schema");

    let conn = rusqlite::Connection::open(db.path()).unwrap();
    conn.execute_batch("DROP TABLE comments;").unwrap();
    drop(conn);

    let state = AppState::new(db.clone(), SchemaCheck::PerRequest).unwrap();
    let server = TestServer::new(create_router(state)).unwrap();

    let response = server.get("/").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().contains("Something went wrong"));

    server
        .get("/api/articles")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(db.get_article(1).unwrap().title, "Welcome to the Blog");
    assert!(db.ensure_schema().is_err());
}
