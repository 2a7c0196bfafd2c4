//! End-to-end tests: stand-in upstream → `run_server` → HTTP client.

mod common;

use character_search::config::Config;
use character_search::server::{router, run_server};
use character_search::store::memory::InMemoryStore;
use common::*;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

struct Running {
    _tmp: TempDir,
    base: String,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for Running {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn start() -> Running {
    let tmp = TempDir::new().unwrap();
    let upstream = spawn_default_upstream().await;
    let port = find_free_port();
    let cfg = test_config(tmp.path(), &upstream, port);

    let handle = tokio::spawn(async move {
        run_server(&cfg).await.ok();
    });
    wait_for_server(port).await;

    Running {
        _tmp: tmp,
        base: format!("http://127.0.0.1:{}", port),
        handle,
    }
}

async fn search(base: &str, name: &str) -> Vec<Value> {
    let resp = reqwest::Client::new()
        .get(format!("{}/search", base))
        .query(&[("name", name)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn test_health_reports_synced_documents() {
    let server = start().await;
    let body: Value = reqwest::get(format!("{}/health", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["documents"], CHARACTERS.len());
}

#[tokio::test]
async fn test_missing_name_is_bad_request() {
    let server = start().await;
    let resp = reqwest::get(format!("{}/search", server.base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.text().await.unwrap(), "Missing 'name' query parameter");
}

#[tokio::test]
async fn test_empty_name_is_bad_request() {
    let server = start().await;
    let resp = reqwest::get(format!("{}/search?name=", server.base))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let server = start().await;

    let docs = search(&server.base, "rick").await;
    assert_eq!(ids(&docs), vec![1, 8, 15, 265]);

    let docs = search(&server.base, "SMITH").await;
    assert_eq!(ids(&docs), vec![2, 3, 4, 5]);
}

#[tokio::test]
async fn test_repeated_name_uses_first_value() {
    let server = start().await;
    let resp = reqwest::get(format!("{}/search?name=rick&name=morty", server.base))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let docs: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(ids(&docs), vec![1, 8, 15, 265]);
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let app = router(Arc::new(InMemoryStore::failing_reads()), &Config::default()).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let resp = reqwest::get(format!("http://{}/search?name=rick", addr))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        resp.text().await.unwrap(),
        "store query failed: in-memory store rejects reads"
    );
    handle.abort();
}

#[tokio::test]
async fn test_search_returns_full_documents() {
    let server = start().await;
    let docs = search(&server.base, "Pickle").await;
    assert_eq!(docs.len(), 1);

    let pickle = &docs[0];
    assert_eq!(pickle["_id"], 265);
    assert_eq!(pickle["name"], "Pickle Rick");
    assert_eq!(pickle["status"], "Alive");
    assert_eq!(pickle["species"], "Human");
    assert_eq!(pickle["type"], "");
    assert_eq!(pickle["gender"], "Male");
    assert_eq!(pickle["origin"]["name"], "Earth (C-137)");
    assert_eq!(pickle["location"]["name"], "Citadel of Ricks");
    assert_eq!(
        pickle["image"],
        "https://rickandmortyapi.com/api/character/avatar/265.jpeg"
    );
    assert!(pickle.get("episode").is_none());
}

#[tokio::test]
async fn test_unknown_name_is_empty_array() {
    let server = start().await;
    let resp = reqwest::get(format!("{}/search?name=zzzznonexistent", server.base))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "[]");
}

#[tokio::test]
async fn test_metacharacters_are_literal() {
    let server = start().await;
    assert_eq!(ids(&search(&server.base, ".").await), vec![244]);
    assert!(search(&server.base, ".*").await.is_empty());
    assert!(search(&server.base, "%").await.is_empty());
    assert!(search(&server.base, "(").await.is_empty());
}

#[tokio::test]
async fn test_concurrent_searches_are_independent() {
    let server = start().await;

    let mut tasks = Vec::new();
    for i in 0..16 {
        let base = server.base.clone();
        let (name, expected) = if i % 2 == 0 {
            ("rick", vec![1, 8, 15, 265])
        } else {
            ("morty", vec![2, 19])
        };
        tasks.push(tokio::spawn(async move {
            let docs = search(&base, name).await;
            assert_eq!(ids(&docs), expected, "query {}", name);
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let server = start().await;
    let client = reqwest::Client::new();

    let resp = client
        .request(reqwest::Method::OPTIONS, format!("{}/search", server.base))
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
    let methods = resp.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .to_string();
    for m in ["GET", "POST", "PUT", "DELETE"] {
        assert!(methods.contains(m), "missing {} in {}", m, methods);
    }

    let resp = client
        .get(format!("{}/search?name=rick", server.base))
        .header("Origin", "http://evil.example")
        .send()
        .await
        .unwrap();
    let allowed = resp
        .headers()
        .get("access-control-allow-origin")
        .map(|v| v.to_str().unwrap().to_string());
    assert_ne!(allowed.as_deref(), Some("http://evil.example"));
}

#[tokio::test]
async fn test_server_does_not_start_when_sync_fails() {
    let tmp = TempDir::new().unwrap();
    let port = find_free_port();
    let cfg = test_config(tmp.path(), &dead_upstream(), port);

    let err = run_server(&cfg).await.unwrap_err();
    assert!(err.to_string().contains("failed to fetch characters"));
    assert!(std::net::TcpStream::connect(("127.0.0.1", port)).is_err());
}
