//! Sync job.
//!
//! Fetches one page from a [`Connector`] and bulk-upserts its records into a
//! [`CharacterStore`], keyed by id. Runs once per process, before the server
//! accepts traffic.

use crate::config::Config;
use crate::connector_api::ApiConnector;
use crate::db;
use crate::error::Result;
use crate::models::SyncReport;
use crate::store::CharacterStore;
use crate::traits::Connector;

/// Fetch one page and upsert every record.
///
/// The report counts records submitted, not per-document outcomes. Any
/// write failure aborts the whole sync.
pub async fn sync(connector: &dyn Connector, store: &dyn CharacterStore) -> Result<SyncReport> {
    let page = connector.fetch_page().await?;
    let fetched = page.results.len();

    if page.info.pages > 1 {
        tracing::info!(
            connector = connector.name(),
            pages = page.info.pages,
            "upstream has more pages; only the first is synced"
        );
    }

    let written = store.upsert_many(&page.results).await?;

    tracing::info!(
        connector = connector.name(),
        fetched,
        written,
        "synced characters"
    );

    Ok(SyncReport {
        fetched,
        written,
        upstream_pages: page.info.pages,
    })
}

/// `character-search sync`: connect, sync once, print the report.
pub async fn run_sync(config: &Config) -> Result<()> {
    let store = db::open_store(config).await?;
    let connector = ApiConnector::new(&config.upstream)?;

    let report = sync(&connector, &store).await?;
    let total = store.count().await?;

    println!("sync {}", connector.url());
    println!("  fetched: {} characters", report.fetched);
    println!("  upserted: {}", report.written);
    println!("  upstream pages: {} (first page only)", report.upstream_pages);
    println!("  documents in store: {}", total);
    println!("ok");

    store.close().await;
    Ok(())
}
