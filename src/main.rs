use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog::api::{self, AppState};
use blog::config::{DatabaseArgs, ServeArgs};
use blog::db::SchemaStatus;

#[derive(Parser)]
#[command(name = "blog")]
#[command(about = "A minimal blog: articles, comments and a SQLite store")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog server
    Serve(ServeArgs),
    /// Create and seed the database if it is missing or malformed, then exit
    Init(DatabaseArgs),
    /// Drop all articles and comments and reseed the example content
    Reset(DatabaseArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "blog=debug,blog_core=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve(args)) => serve(args).await?,
        Some(Commands::Init(args)) => {
            let db = args.open()?;
            let status = db.ensure_schema()?;
            println!("Database at {} is ready ({:?})", db.path().display(), status);
        }
        Some(Commands::Reset(args)) => {
            let db = args.open()?;
            db.reinitialize()?;
            println!("Database at {} has been reset", db.path().display());
        }
        None => serve(ServeArgs::default()).await?,
    }

    Ok(())
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let db = args.database.open()?;
    tracing::info!("Using database at {}", db.path().display());

    match db.ensure_schema()? {
        SchemaStatus::Healthy => tracing::info!("Database ready"),
        status => tracing::info!("Database ready ({:?})", status),
    }

    let app = api::create_router(AppState::new(db, args.schema_check)?);

    let listener = tokio::net::TcpListener::bind(args.addr()).await?;
    tracing::info!("Blog server listening on http://{}", args.addr());

    axum::serve(listener, app).await?;

    Ok(())
}
