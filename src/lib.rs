//! # Character Search
//!
//! Pulls the Rick and Morty character list from its public REST API,
//! upserts it into a local document store, and serves a case-insensitive
//! name search over HTTP.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────┐   ┌───────────┐
//! │ Upstream API │──▶│   Sync   │──▶│  SQLite   │
//! │  (1 page)    │   │ (upsert) │   │ documents │
//! └──────────────┘   └──────────┘   └─────┬─────┘
//!                                         │
//!                                   ┌─────▼─────┐
//!                                   │  /search  │
//!                                   └───────────┘
//! ```
//!
//! Startup is connect → sync → serve; the store handle is built once and
//! passed explicitly to the sync job and to every request.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Character records and upstream page shape |
//! | [`error`] | Error taxonomy |
//! | [`db`] | Store connection and liveness check |
//! | [`migrate`] | Collection table creation |
//! | [`store`] | Store trait, SQLite and in-memory backends |
//! | [`traits`] | Upstream connector trait |
//! | [`connector_api`] | HTTP connector for the character API |
//! | [`ingest`] | Sync job |
//! | [`search`] | Name search |
//! | [`server`] | HTTP server |

pub mod config;
pub mod connector_api;
pub mod db;
pub mod error;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod search;
pub mod server;
pub mod store;
pub mod traits;

pub use error::{Error, Result};
