#![allow(dead_code)]

use axum::{http::StatusCode, routing::get, Router};
use character_search::config::Config;
use serde_json::{json, Value};
use std::path::Path;

/// (id, name, status) triples making up the stand-in upstream page.
pub const CHARACTERS: &[(i64, &str, &str)] = &[
    (1, "Rick Sanchez", "Alive"),
    (2, "Morty Smith", "Alive"),
    (3, "Summer Smith", "Alive"),
    (4, "Beth Smith", "Alive"),
    (5, "Jerry Smith", "Alive"),
    (8, "Adjudicator Rick", "Dead"),
    (15, "Alien Rick", "unknown"),
    (19, "Antenna Morty", "Alive"),
    (244, "Mr. Poopybutthole", "Alive"),
    (265, "Pickle Rick", "Alive"),
];

pub fn character_json(id: i64, name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": status,
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": { "name": "Earth (C-137)", "url": "https://rickandmortyapi.com/api/location/1" },
        "location": { "name": "Citadel of Ricks", "url": "https://rickandmortyapi.com/api/location/3" },
        "image": format!("https://rickandmortyapi.com/api/character/avatar/{id}.jpeg"),
        "episode": ["https://rickandmortyapi.com/api/episode/1"],
        "url": format!("https://rickandmortyapi.com/api/character/{id}"),
        "created": "2017-11-04T18:48:46.250Z"
    })
}

pub fn page(characters: &[(i64, &str, &str)]) -> Value {
    let results: Vec<Value> = characters
        .iter()
        .map(|(id, name, status)| character_json(*id, name, status))
        .collect();
    json!({
        "info": {
            "count": 826,
            "pages": 42,
            "next": "https://rickandmortyapi.com/api/character?page=2",
            "prev": null
        },
        "results": results
    })
}

/// Serve `body` with `status` at `/api/character` on a free port. Returns
/// the full endpoint URL.
pub async fn spawn_upstream(status: StatusCode, body: String) -> String {
    let app = Router::new().route(
        "/api/character",
        get(move || {
            let body = body.clone();
            async move {
                (
                    status,
                    [(axum::http::header::CONTENT_TYPE, "application/json")],
                    body,
                )
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}/api/character", addr)
}

pub async fn spawn_default_upstream() -> String {
    spawn_upstream(StatusCode::OK, page(CHARACTERS).to_string()).await
}

/// A URL nothing is listening on.
pub fn dead_upstream() -> String {
    let port = find_free_port();
    format!("http://127.0.0.1:{}/api/character", port)
}

pub fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

pub fn test_config(root: &Path, upstream_url: &str, port: u16) -> Config {
    let content = format!(
        r#"
[db]
path = "{}"
connect_timeout_secs = 5

[upstream]
url = "{}"
timeout_secs = 5

[server]
bind = "127.0.0.1:{}"
allowed_origin = "http://localhost:3000"
"#,
        root.join("characters.sqlite").display(),
        upstream_url,
        port
    );
    toml::from_str(&content).unwrap()
}

pub async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

pub fn ids(docs: &[Value]) -> Vec<i64> {
    let mut ids: Vec<i64> = docs.iter().map(|d| d["_id"].as_i64().unwrap()).collect();
    ids.sort();
    ids
}
