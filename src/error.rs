//! Error taxonomy shared by the store, sync, and search layers.
//!
//! Startup-phase variants (`Connection`, `Fetch`, `Write`, `Config`) are
//! returned to the caller, which decides whether to exit. Request-phase
//! variants (`Validation`, `Store`) are converted into HTTP responses by the
//! server and never stop it.

use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The store could not be opened, or did not answer the liveness ping.
    #[error("failed to connect to store: {0}")]
    Connection(String),

    /// The upstream API was unreachable, returned a non-2xx status, or sent
    /// a body that did not decode as a character page.
    #[error("failed to fetch characters: {0}")]
    Fetch(String),

    /// The bulk upsert was rejected.
    #[error("failed to write characters: {0}")]
    Write(String),

    /// Caller-supplied input was rejected before reaching the store.
    #[error("{0}")]
    Validation(String),

    /// A read against the store failed while serving a request.
    #[error("store query failed: {0}")]
    Store(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// True for errors caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
