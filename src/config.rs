//! Runtime configuration shared by the CLI subcommands.

use std::path::PathBuf;

use blog_core::{Database, SchemaRecovery, StoreResult};
use clap::{Args, ValueEnum};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DATABASE_ENV: &str = "BLOG_DATABASE";

/// When the server verifies the database schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SchemaCheck {
    /// Once, before the listener starts.
    #[default]
    Startup,
    /// Before every request as well, repairing the schema if it was damaged
    /// while the server was running.
    PerRequest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Recovery {
    /// Drop everything and reseed the example content.
    #[default]
    Reinitialize,
    /// Refuse to start (or fail the request) and keep the file as it is.
    Fail,
}

impl From<Recovery> for SchemaRecovery {
    fn from(value: Recovery) -> Self {
        match value {
            Recovery::Reinitialize => SchemaRecovery::Reinitialize,
            Recovery::Fail => SchemaRecovery::Fail,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct DatabaseArgs {
    /// Path to the SQLite database file [default: platform data directory]
    #[arg(long, env = DATABASE_ENV)]
    pub database: Option<PathBuf>,

    /// What to do when the database exists but its schema is malformed
    #[arg(long, value_enum, default_value_t = Recovery::Reinitialize)]
    pub schema_recovery: Recovery,
}

impl Default for DatabaseArgs {
    fn default() -> Self {
        Self {
            database: std::env::var_os(DATABASE_ENV).map(PathBuf::from),
            schema_recovery: Recovery::default(),
        }
    }
}

impl DatabaseArgs {
    pub fn open(&self) -> StoreResult<Database> {
        let db = match &self.database {
            Some(path) => Database::open(path)?,
            None => Database::open_default()?,
        };
        Ok(db.with_recovery(self.schema_recovery.into()))
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port for the HTTP server
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// When to verify the database schema
    #[arg(long, value_enum, default_value_t = SchemaCheck::Startup)]
    pub schema_check: SchemaCheck,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            schema_check: SchemaCheck::default(),
            database: DatabaseArgs::default(),
        }
    }
}

impl ServeArgs {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
