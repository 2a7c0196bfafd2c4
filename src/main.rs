//! # `character-search`
//!
//! ```bash
//! character-search serve                      # connect, sync, serve on :8080
//! character-search sync                       # one sync, print the report
//! character-search search rick                # query the local store
//! character-search --config ./config/character-search.toml serve
//! ```
//!
//! Logging goes through `tracing`; set `RUST_LOG` to adjust
//! (default `character_search=info,tower_http=info`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use character_search::{config, db, ingest, search, server};

/// Sync the Rick and Morty character list into a local store and search it.
#[derive(Parser)]
#[command(name = "character-search", version, about)]
struct Cli {
    /// Path to a TOML configuration file.
    ///
    /// Without it, built-in defaults are used (store at
    /// `./data/characters.sqlite`, listening on `0.0.0.0:8080`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the store and its collection. Safe to run repeatedly.
    Init,

    /// Fetch the first upstream page and upsert it into the store.
    Sync,

    /// Search the local store by name.
    Search {
        /// Name fragment (case-insensitive).
        name: String,
    },

    /// Connect, sync once, then serve `GET /search` until terminated.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "character_search=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::Config::default(),
    };

    match cli.command {
        Commands::Init => {
            let store = db::open_store(&cfg).await?;
            store.close().await;
            println!("Store initialized at {}.", cfg.db.path.display());
        }
        Commands::Sync => {
            ingest::run_sync(&cfg).await?;
        }
        Commands::Search { name } => {
            search::run_search(&cfg, &name).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
