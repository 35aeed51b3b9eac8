use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("article {0} not found")]
    ArticleNotFound(i64),

    #[error("storage unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),

    #[error("storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    /// A structural probe failed and the recovery policy forbids reinitializing.
    #[error("database schema is malformed: {0}")]
    SchemaMalformed(#[source] rusqlite::Error),

    #[error("could not determine a data directory for the database")]
    NoDataDir,
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ArticleNotFound(_))
    }
}
