//! Name search.
//!
//! Validates the caller's fragment, compiles it into a [`NameQuery`], and
//! runs it against the store. Used by `GET /search` and the `search` CLI
//! command.
//!
//! # Modes
//!
//! | Mode | `name=r.ck` matches |
//! |------|---------------------|
//! | `substring` (default) | names containing the literal text `r.ck` |
//! | `pattern` | names matching the regex `r.ck`, e.g. "Rick", "rock" |
//!
//! Both modes ignore letter case. Results are returned in store order with
//! no ranking or limit.

use regex::RegexBuilder;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::db;
use crate::error::{Error, Result};
use crate::store::{CharacterStore, NameQuery};

/// How the `name` fragment is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Substring,
    Pattern,
}

/// Validate `name` and compile it for `mode`.
///
/// Missing or empty input, and (in pattern mode) an invalid regex, are
/// [`Error::Validation`].
pub fn build_query(name: Option<&str>, mode: SearchMode) -> Result<NameQuery> {
    let name = match name {
        Some(n) if !n.is_empty() => n,
        _ => return Err(Error::Validation("Missing 'name' query parameter".into())),
    };

    match mode {
        SearchMode::Substring => Ok(NameQuery::substring(name)),
        SearchMode::Pattern => RegexBuilder::new(name)
            .case_insensitive(true)
            .size_limit(1 << 20)
            .build()
            .map(NameQuery::Pattern)
            .map_err(|e| Error::Validation(format!("Invalid 'name' pattern: {}", e))),
    }
}

/// Run a name search against `store`.
pub async fn search(
    store: &dyn CharacterStore,
    name: Option<&str>,
    mode: SearchMode,
) -> Result<Vec<Value>> {
    let query = build_query(name, mode)?;
    store.find_by_name(&query).await
}

/// `character-search search <name>`: print matching documents as JSON.
pub async fn run_search(config: &Config, name: &str) -> Result<()> {
    let store = db::open_store(config).await?;
    let results = search(&store, Some(name), config.search.mode).await;
    store.close().await;

    let results = results?;
    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let rendered = serde_json::to_string_pretty(&results)
        .map_err(|e| Error::Store(format!("cannot render results: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
