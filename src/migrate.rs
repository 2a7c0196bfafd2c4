use sqlx::SqlitePool;

use crate::error::{Error, Result};

/// Create the collection table if it does not exist.
///
/// `collection` must already be validated as a plain identifier.
/// `name_folded` holds the lowercased name so matching folds case the same
/// way for ASCII and non-ASCII names.
pub async fn ensure_collection(pool: &SqlitePool, collection: &str) -> Result<()> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {collection} (
            _id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            name_folded TEXT NOT NULL,
            doc TEXT NOT NULL,
            synced_at INTEGER NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| Error::Connection(format!("cannot create collection {}: {}", collection, e)))?;

    Ok(())
}
