//! In-memory [`CharacterStore`] for tests.
//!
//! Documents live in a `BTreeMap` keyed by id behind `std::sync::RwLock`, so
//! iteration order is ascending id.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::Character;

use super::{CharacterStore, NameQuery};

struct StoredDoc {
    name: String,
    doc: Value,
}

/// In-memory store. `fail_writes` / `fail_reads` let tests exercise the
/// error paths of sync and search.
pub struct InMemoryStore {
    docs: RwLock<BTreeMap<i64, StoredDoc>>,
    fail_writes: bool,
    fail_reads: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(BTreeMap::new()),
            fail_writes: false,
            fail_reads: false,
        }
    }

    /// A store whose upserts always fail.
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }

    /// A store whose reads always fail.
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::new()
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Store("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl CharacterStore for InMemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert_many(&self, characters: &[Character]) -> Result<usize> {
        if self.fail_writes {
            return Err(Error::Write("in-memory store rejects writes".to_string()));
        }
        let mut docs = self
            .docs
            .write()
            .map_err(|_| Error::Write("in-memory store lock poisoned".to_string()))?;
        for c in characters {
            docs.insert(
                c.id,
                StoredDoc {
                    name: c.name.clone(),
                    doc: c.to_document(),
                },
            );
        }
        Ok(characters.len())
    }

    async fn find_by_name(&self, query: &NameQuery) -> Result<Vec<Value>> {
        if self.fail_reads {
            return Err(Error::Store("in-memory store rejects reads".to_string()));
        }
        let docs = self.docs.read().map_err(poisoned)?;
        Ok(docs
            .values()
            .filter(|stored| query.matches(&stored.name))
            .map(|stored| stored.doc.clone())
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        if self.fail_reads {
            return Err(Error::Store("in-memory store rejects reads".to_string()));
        }
        Ok(self.docs.read().map_err(poisoned)?.len())
    }
}
