use axum::response::Html;
use chrono::DateTime;
use minijinja::Environment;
use serde::Serialize;

pub const NOT_FOUND_PAGE: &str = include_str!("templates/404.html");
pub const SERVER_ERROR_PAGE: &str = include_str!("templates/500.html");

/// Page templates, compiled once at startup.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_filter("datetime", datetime);
        env.add_filter("excerpt", excerpt);
        env.add_template("base.html", include_str!("templates/base.html"))?;
        env.add_template("index.html", include_str!("templates/index.html"))?;
        env.add_template("post.html", include_str!("templates/post.html"))?;
        env.add_template("create.html", include_str!("templates/create.html"))?;
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, minijinja::Error> {
        let html = self.env.get_template(name)?.render(ctx)?;
        Ok(Html(html))
    }
}

fn datetime(value: String) -> String {
    match DateTime::parse_from_rfc3339(&value) {
        Ok(dt) => dt.format("%B %-d, %Y at %H:%M").to_string(),
        Err(_) => value,
    }
}

/// Shortens text to at most `len` characters, ending in an ellipsis if cut.
fn excerpt(value: String, len: Option<usize>) -> String {
    let len = len.unwrap_or(200);
    if value.chars().count() <= len {
        return value;
    }
    let cut: String = value.chars().take(len).collect();
    format!("{}...", cut.trim_end())
}
