//! Extension seam for upstream data sources.
//!
//! The sync job talks to the upstream API only through [`Connector`], so
//! tests (and alternative sources) can feed it a page without a network.
//!
//! ```rust
//! use async_trait::async_trait;
//! use character_search::models::CharacterPage;
//! use character_search::traits::Connector;
//! use character_search::Result;
//!
//! struct Fixture(String);
//!
//! #[async_trait]
//! impl Connector for Fixture {
//!     fn name(&self) -> &str { "fixture" }
//!
//!     async fn fetch_page(&self) -> Result<CharacterPage> {
//!         serde_json::from_str(&self.0)
//!             .map_err(|e| character_search::Error::Fetch(e.to_string()))
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CharacterPage;

/// A source of one page of characters.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Short label used in log lines (e.g. `"rickandmortyapi"`).
    fn name(&self) -> &str;

    /// Fetch and decode one page.
    ///
    /// Fails with [`crate::Error::Fetch`] on network errors, non-2xx
    /// responses, or undecodable bodies.
    async fn fetch_page(&self) -> Result<CharacterPage>;
}
