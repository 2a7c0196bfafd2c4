//! HTTP server.
//!
//! Startup is strictly ordered: connect to the store, run the sync job once,
//! then bind the listener. Any startup failure is returned to the caller
//! before a socket is opened.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/search?name=<fragment>` | Case-insensitive name search, JSON array |
//! | `GET`  | `/health` | Status, version, and stored document count |
//!
//! # Error Contract
//!
//! Errors are plain text with the HTTP status carrying the meaning:
//! `400` for a missing/empty `name` or an invalid pattern, `500` for store
//! failures.
//!
//! # CORS
//!
//! Only `[server].allowed_origin` may call cross-origin. Allowed methods are
//! `GET`, `POST`, `PUT`, `DELETE`.

use axum::{
    extract::{Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::connector_api::ApiConnector;
use crate::db;
use crate::error::{Error, Result};
use crate::ingest;
use crate::search::{self, SearchMode};
use crate::store::sqlite::SqliteStore;
use crate::store::CharacterStore;
use crate::traits::Connector;

/// Shared state for every handler. Cloned per request; the store is shared.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CharacterStore>,
    pub mode: SearchMode,
}

/// Connect and sync. Returns the store handle the server will share.
pub async fn initialize(config: &Config, connector: &dyn Connector) -> Result<Arc<SqliteStore>> {
    let store = db::open_store(config).await?;
    ingest::sync(connector, &store).await?;
    Ok(Arc::new(store))
}

/// Build the router over an already-populated store.
pub fn router(store: Arc<dyn CharacterStore>, config: &Config) -> Result<Router> {
    let origin = HeaderValue::from_str(&config.server.allowed_origin).map_err(|_| {
        Error::Config(format!(
            "invalid allowed origin: '{}'",
            config.server.allowed_origin
        ))
    })?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let state = AppState {
        store,
        mode: config.search.mode,
    };

    Ok(Router::new()
        .route("/search", get(handle_search))
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// `character-search serve`: connect, sync, then serve until terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let connector = ApiConnector::new(&config.upstream)?;
    let store = initialize(config, &connector).await?;
    let app = router(store, config)?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, self.to_string()).into_response()
    }
}

// ============ GET /search ============

/// First `name` value in the query string; repeats are ignored.
fn first_name(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, _)| key == "name")
        .map(|(_, value)| value.as_str())
}

/// Handler for `GET /search`.
async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>, Error> {
    match search::search(state.store.as_ref(), first_name(&params), state.mode).await {
        Ok(docs) => Ok(Json(docs)),
        Err(e) => {
            if e.is_client_error() {
                tracing::warn!(error = %e, "rejected search request");
            } else {
                tracing::error!(error = %e, "search failed");
            }
            Err(e)
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    documents: usize,
}

async fn handle_health(State(state): State<AppState>) -> Result<Json<HealthResponse>, Error> {
    let documents = state.store.count().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        documents,
    }))
}
