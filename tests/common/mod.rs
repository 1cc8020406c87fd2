#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

/// In-process stand-in for the key-value store's REST protocol, backed by a
/// plain map. Implements the same path-per-command surface the production
/// client speaks: /get, /set, /incr, /setnx.
#[derive(Clone, Default)]
pub struct MockKv {
    data: Arc<Mutex<HashMap<String, String>>>,
}

impl MockKv {
    pub fn value(&self, key: &str) -> Option<String> {
        self.data.lock().unwrap().get(key).cloned()
    }
}

async fn kv_get(State(kv): State<MockKv>, Path(key): Path<String>) -> Json<Value> {
    let data = kv.data.lock().unwrap();
    Json(json!({ "result": data.get(&key) }))
}

async fn kv_set(State(kv): State<MockKv>, Path((key, value)): Path<(String, String)>) -> Json<Value> {
    kv.data.lock().unwrap().insert(key, value);
    Json(json!({ "result": "OK" }))
}

async fn kv_incr(State(kv): State<MockKv>, Path(key): Path<String>) -> Json<Value> {
    let mut data = kv.data.lock().unwrap();
    let next = data
        .get(&key)
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or(0)
        + 1;
    data.insert(key, next.to_string());
    Json(json!({ "result": next }))
}

async fn kv_setnx(
    State(kv): State<MockKv>,
    Path((key, value)): Path<(String, String)>,
) -> Json<Value> {
    let mut data = kv.data.lock().unwrap();
    let created = if data.contains_key(&key) {
        0
    } else {
        data.insert(key, value);
        1
    };
    Json(json!({ "result": created }))
}

/// Serve a MockKv on an ephemeral port; returns its base URL and a handle to
/// inspect stored values.
pub async fn spawn_mock_kv() -> (String, MockKv) {
    let kv = MockKv::default();

    let router = Router::new()
        .route("/get/{key}", get(kv_get))
        .route("/set/{key}/{value}", post(kv_set))
        .route("/incr/{key}", post(kv_incr))
        .route("/setnx/{key}/{value}", post(kv_setnx))
        .with_state(kv.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), kv)
}

/// Capture webhook: counts every POST it receives and answers with the given
/// status and JSON body.
pub async fn spawn_mock_webhook(status: StatusCode, body: Value) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    let router = Router::new().route(
        "/",
        post(move || {
            let counter = counter.clone();
            let body = body.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (status, Json(body))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), hits)
}

/// Poll until the counter reaches `expected` hits or two seconds pass.
/// Needed because the notification forward runs as a detached task.
pub async fn wait_for_hits(hits: &Arc<AtomicUsize>, expected: usize) -> bool {
    for _ in 0..40 {
        if hits.load(Ordering::SeqCst) >= expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    hits.load(Ordering::SeqCst) >= expected
}
