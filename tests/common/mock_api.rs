//! Mock PokeAPI server for testing the HTTP source.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Behaviour knobs for the mock API.
#[derive(Debug, Clone, Default)]
pub struct MockApiConfig {
    /// Number of creatures in the collection, ids `1..=total`.
    pub total: u32,
    /// Detail ids answering with HTTP 500.
    pub failing_ids: HashSet<u32>,
    /// Per-id detail delay in milliseconds.
    pub delays_ms: HashMap<u32, u64>,
    /// Status returned by the listing endpoint instead of 200.
    pub list_status: Option<u16>,
    /// Detail ids answering with a body that is not a creature.
    pub malformed_ids: HashSet<u32>,
}

#[derive(Deserialize)]
struct ListQuery {
    offset: usize,
    limit: usize,
}

#[derive(Clone)]
struct MockState {
    config: Arc<MockApiConfig>,
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

/// Mock PokeAPI server.
pub struct MockApi {
    pub addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockApi {
    /// Start a new mock API server.
    pub async fn start(config: MockApiConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        let state = MockState {
            config: Arc::new(config),
            base_url: format!("http://{}", addr),
            requests: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        };

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/pokemon", get(list))
            .route("/pokemon/{id}", get(detail))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    /// Get the base URL for this mock server.
    pub fn base_url(&self) -> String {
        self.state.base_url.clone()
    }

    /// Paths (with query) of every request received so far.
    pub async fn captured_requests(&self) -> Vec<String> {
        self.state.requests.lock().await.clone()
    }

    /// Highest number of detail requests observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn list(State(state): State<MockState>, Query(query): Query<ListQuery>) -> Response {
    state.requests.lock().await.push(format!(
        "/pokemon?offset={}&limit={}",
        query.offset, query.limit
    ));

    if let Some(status) = state.config.list_status {
        return StatusCode::from_u16(status).unwrap().into_response();
    }

    let start = query.offset as u32 + 1;
    let end = (query.offset + query.limit) as u32;
    let results: Vec<_> = (start..=end.min(state.config.total))
        .map(|id| {
            json!({
                "name": format!("creature-{id}"),
                "url": format!("{}/pokemon/{}", state.base_url, id),
            })
        })
        .collect();

    Json(json!({ "count": state.config.total, "results": results })).into_response()
}

async fn detail(State(state): State<MockState>, Path(id): Path<u32>) -> Response {
    state.requests.lock().await.push(format!("/pokemon/{id}"));

    let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.max_in_flight.fetch_max(now, Ordering::SeqCst);

    if let Some(delay) = state.config.delays_ms.get(&id) {
        tokio::time::sleep(tokio::time::Duration::from_millis(*delay)).await;
    }
    state.in_flight.fetch_sub(1, Ordering::SeqCst);

    if state.config.failing_ids.contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    if state.config.malformed_ids.contains(&id) {
        return Json(json!({ "unexpected": true })).into_response();
    }

    Json(json!({
        "id": id,
        "name": format!("creature-{id}"),
        "height": id * 2,
        "weight": id * 10,
        "sprites": {
            "front_default": format!("https://img.test/{id}.png"),
            "other": {}
        }
    }))
    .into_response()
}
