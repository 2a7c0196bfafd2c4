//! Data types that flow from the upstream API into the store and back out
//! through search.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A character as decoded from the upstream API.
///
/// Fields the service does not keep (`episode`, `url`, `created`, ...) are
/// dropped on decode.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub species: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub origin: NamedRef,
    #[serde(default)]
    pub location: NamedRef,
    #[serde(default)]
    pub image: String,
}

/// A nested `{ "name": ... }` reference (origin, location).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: String,
}

impl Character {
    /// Render the record as a stored document, keyed by `_id`.
    ///
    /// This is the exact shape returned by search.
    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("_id".into(), Value::from(self.id));
        doc.insert("name".into(), Value::from(self.name.clone()));
        doc.insert("status".into(), Value::from(self.status.clone()));
        doc.insert("species".into(), Value::from(self.species.clone()));
        doc.insert("type".into(), Value::from(self.kind.clone()));
        doc.insert("gender".into(), Value::from(self.gender.clone()));
        doc.insert(
            "origin".into(),
            serde_json::json!({ "name": self.origin.name }),
        );
        doc.insert(
            "location".into(),
            serde_json::json!({ "name": self.location.name }),
        );
        doc.insert("image".into(), Value::from(self.image.clone()));
        Value::Object(doc)
    }
}

/// Pagination block of an upstream page.
///
/// Only `pages` is consulted, and only for logging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub pages: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// One page of the upstream character listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterPage {
    #[serde(default)]
    pub info: PageInfo,
    pub results: Vec<Character>,
}

/// Outcome of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Records decoded from the upstream page.
    pub fetched: usize,
    /// Records submitted in the bulk upsert.
    pub written: usize,
    /// Page count advertised by the upstream API.
    pub upstream_pages: u64,
}
