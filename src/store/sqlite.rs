//! SQLite-backed [`CharacterStore`].
//!
//! Each character is one row: the `_id` primary key, the raw and folded
//! name, and the full document as JSON text. Upserts rewrite every column,
//! so a re-synced record never keeps a stale field.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::config::is_plain_identifier;
use crate::error::{Error, Result};
use crate::models::Character;

use super::{fold_case, CharacterStore, NameQuery};

/// SQLite implementation of the [`CharacterStore`] trait.
///
/// Wraps a [`SqlitePool`], which is safe to share across request tasks.
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
    collection: String,
}

impl SqliteStore {
    /// Wrap a pool. The collection table is spliced into SQL, so it must be
    /// a plain identifier.
    pub fn new(pool: SqlitePool, collection: &str) -> Result<Self> {
        if !is_plain_identifier(collection) {
            return Err(Error::Config(format!(
                "collection must be a plain identifier, got '{}'",
                collection
            )));
        }
        Ok(Self {
            pool,
            collection: collection.to_string(),
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn parse_doc(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| Error::Store(format!("corrupt document: {}", e)))
}

#[async_trait]
impl CharacterStore for SqliteStore {
    async fn ping(&self) -> Result<()> {
        crate::db::ping(&self.pool).await
    }

    async fn upsert_many(&self, characters: &[Character]) -> Result<usize> {
        let write_err = |e: sqlx::Error| Error::Write(e.to_string());
        let now = chrono::Utc::now().timestamp();
        let sql = format!(
            r#"
            INSERT INTO {} (_id, name, name_folded, doc, synced_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(_id) DO UPDATE SET
                name = excluded.name,
                name_folded = excluded.name_folded,
                doc = excluded.doc,
                synced_at = excluded.synced_at
            "#,
            self.collection
        );

        let mut tx = self.pool.begin().await.map_err(write_err)?;

        for c in characters {
            let doc = serde_json::to_string(&c.to_document())
                .map_err(|e| Error::Write(e.to_string()))?;
            sqlx::query(&sql)
                .bind(c.id)
                .bind(&c.name)
                .bind(fold_case(&c.name))
                .bind(&doc)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(write_err)?;
        }

        tx.commit().await.map_err(write_err)?;
        Ok(characters.len())
    }

    async fn find_by_name(&self, query: &NameQuery) -> Result<Vec<Value>> {
        let store_err = |e: sqlx::Error| Error::Store(e.to_string());

        match query {
            NameQuery::Substring(folded) => {
                let rows = sqlx::query(&format!(
                    "SELECT doc FROM {} WHERE instr(name_folded, ?) > 0",
                    self.collection
                ))
                .bind(folded)
                .fetch_all(&self.pool)
                .await
                .map_err(store_err)?;

                rows.iter()
                    .map(|row| parse_doc(&row.get::<String, _>("doc")))
                    .collect()
            }
            NameQuery::Pattern(_) => {
                // SQLite has no built-in regex; filter the (small) collection here.
                let rows = sqlx::query(&format!("SELECT name, doc FROM {}", self.collection))
                    .fetch_all(&self.pool)
                    .await
                    .map_err(store_err)?;

                rows.iter()
                    .filter(|row| query.matches(&row.get::<String, _>("name")))
                    .map(|row| parse_doc(&row.get::<String, _>("doc")))
                    .collect()
            }
        }
    }

    async fn count(&self) -> Result<usize> {
        let n: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", self.collection))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Store(e.to_string()))?;
        Ok(n as usize)
    }
}
