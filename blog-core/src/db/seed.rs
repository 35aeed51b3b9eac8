//! Example content written whenever the schema is (re)initialized.

use rusqlite::{params, Connection};

/// (title, content, author)
pub const ARTICLES: [(&str, &str, &str); 3] = [
    (
        "Welcome to the Blog",
        "This is the very first post. Make yourself at home, read around and leave a comment to say hello.",
        "Admin",
    ),
    (
        "Building Small Web Services",
        "A small web service needs little more than a router, a handful of handlers and a place to keep its data. Start simple and let the shape emerge.",
        "John Doe",
    ),
    (
        "Security Basics",
        "Treat every piece of user input as untrusted. Validate it, bound it, escape it on output, and never build queries by pasting strings together.",
        "Security Expert",
    ),
];

/// (index into `ARTICLES`, author, content)
pub const COMMENTS: [(usize, &str, &str); 4] = [
    (0, "Alice", "Great introduction! Looking forward to more posts."),
    (0, "Bob", "Thanks for starting this blog. Very informative!"),
    (1, "Charlie", "Starting simple is the best advice. It has served me well for years."),
    (2, "Dave", "Input validation is so often forgotten. Thanks for the reminder!"),
];

pub fn insert_examples(conn: &Connection) -> rusqlite::Result<()> {
    let mut article_ids = Vec::with_capacity(ARTICLES.len());
    {
        let mut stmt =
            conn.prepare("INSERT INTO articles (title, content, author) VALUES (?1, ?2, ?3)")?;
        for (title, content, author) in ARTICLES {
            stmt.execute(params![title, content, author])?;
            article_ids.push(conn.last_insert_rowid());
        }
    }

    let mut stmt =
        conn.prepare("INSERT INTO comments (article_id, author, content) VALUES (?1, ?2, ?3)")?;
    for (article, author, content) in COMMENTS {
        stmt.execute(params![article_ids[article], author, content])?;
    }

    Ok(())
}
