//! Storage abstraction for character documents.
//!
//! The [`CharacterStore`] trait is the narrow contract the sync job and the
//! search handler depend on. Two backends implement it:
//!
//! - [`sqlite::SqliteStore`] — the production store, a `sqlx` SQLite pool.
//! - [`memory::InMemoryStore`] — a `RwLock`-guarded map for tests.
//!
//! Implementations must be `Send + Sync`: one handle is shared by every
//! request task once the server is up.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

use crate::error::Result;
use crate::models::Character;

/// A compiled name filter.
///
/// Built by [`crate::search::build_query`]; the store only evaluates it.
#[derive(Debug, Clone)]
pub enum NameQuery {
    /// Literal, case-insensitive substring. Holds the lowercased fragment.
    Substring(String),
    /// Case-insensitive regular expression.
    Pattern(Regex),
}

impl NameQuery {
    /// Literal substring query; the fragment is folded here.
    pub fn substring(fragment: &str) -> Self {
        NameQuery::Substring(fold_case(fragment))
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameQuery::Substring(folded) => fold_case(name).contains(folded.as_str()),
            NameQuery::Pattern(re) => re.is_match(name),
        }
    }
}

/// Case folding applied to both stored names and query fragments.
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

/// Abstract document store holding one collection of characters.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`ping`](CharacterStore::ping) | Liveness check |
/// | [`upsert_many`](CharacterStore::upsert_many) | Batched replace-or-insert keyed by id |
/// | [`find_by_name`](CharacterStore::find_by_name) | Name filter, returns raw documents |
/// | [`count`](CharacterStore::count) | Number of stored documents |
#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// Verify the store answers. Fails with [`crate::Error::Connection`].
    async fn ping(&self) -> Result<()>;

    /// Replace or insert every character, matched on `id`.
    ///
    /// A matched document is overwritten in full. Returns the number of
    /// records submitted. Fails with [`crate::Error::Write`].
    async fn upsert_many(&self, characters: &[Character]) -> Result<usize>;

    /// Documents whose `name` satisfies `query`, in store order.
    ///
    /// Fails with [`crate::Error::Store`].
    async fn find_by_name(&self, query: &NameQuery) -> Result<Vec<Value>>;

    async fn count(&self) -> Result<usize>;
}
