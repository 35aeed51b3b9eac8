pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    author TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    article_id INTEGER NOT NULL REFERENCES articles(id),
    author TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_comments_article ON comments(article_id);
"#;

pub const DROP: &str = r#"
DROP TABLE IF EXISTS comments;
DROP TABLE IF EXISTS articles;
"#;

/// Queries that must succeed against a well-formed schema.
pub const PROBES: [&str; 2] = [
    "SELECT id, title, content, author, created_at FROM articles LIMIT 1",
    "SELECT id, article_id, author, content, created_at FROM comments LIMIT 1",
];
