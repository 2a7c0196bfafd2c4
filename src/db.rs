//! Store connector.
//!
//! Opens the SQLite file named in `[db]`, bounded by
//! `db.connect_timeout_secs`, pings it, and ensures the collection table
//! exists. The returned [`SqliteStore`] is the one long-lived handle the rest
//! of the process shares.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::migrate;
use crate::store::sqlite::SqliteStore;
use crate::store::CharacterStore;

/// Open the connection pool and verify it answers.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = &config.db.path;
    let timeout = Duration::from_secs(config.db.connect_timeout_secs);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::Connection(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let connecting = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(timeout)
        .connect_with(options);

    let pool = tokio::time::timeout(timeout, connecting)
        .await
        .map_err(|_| {
            Error::Connection(format!(
                "timed out after {}s opening {}",
                timeout.as_secs(),
                db_path.display()
            ))
        })?
        .map_err(|e| Error::Connection(e.to_string()))?;

    ping(&pool).await?;
    Ok(pool)
}

/// Liveness check: a trivial round-trip.
pub async fn ping(pool: &SqlitePool) -> Result<()> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
        .map_err(|e| Error::Connection(format!("ping failed: {}", e)))
}

/// Connect, ping, and ensure the collection exists.
pub async fn open_store(config: &Config) -> Result<SqliteStore> {
    let pool = connect(config).await?;
    migrate::ensure_collection(&pool, &config.db.collection).await?;

    let store = SqliteStore::new(pool, &config.db.collection)?;
    store.ping().await?;

    tracing::info!(
        path = %config.db.path.display(),
        collection = %config.db.collection,
        "connected to store"
    );
    Ok(store)
}
