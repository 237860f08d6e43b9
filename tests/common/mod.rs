//! In-process stand-in for the remote file service.

#![allow(dead_code)]

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::net::TcpListener;

pub const FOUND: &str = "123e4567-e89b-12d3-a456-426614174000";
pub const MISSING: &str = "00000000-0000-0000-0000-000000000404";
pub const BROKEN: &str = "00000000-0000-0000-0000-000000000500";
pub const GARBAGE: &str = "00000000-0000-0000-0000-0000000000aa";
pub const EMPTY: &str = "00000000-0000-0000-0000-0000000000ee";
pub const BINARY: &str = "00000000-0000-0000-0000-0000000000b1";
pub const SLOW: &str = "00000000-0000-0000-0000-00000000510e";
pub const EXPORT: &str = "00000000-0000-0000-0000-0000000000e0";

pub const BINARY_BODY: &[u8] = &[0x00, 0x01, 0xff, 0xfe, 0x0d, 0x0a, 0x80, 0x42];
pub const EXPORT_BODY: &str = "example.com\n# comment\ntest.org\n";

pub struct MockFileService {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl MockFileService {
    /// Requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start the mock on an ephemeral port. Lives as long as the runtime.
pub async fn spawn() -> MockFileService {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/file/{uuid}/stat/", get(stat))
        .route("/file/{uuid}/read/", get(read))
        .with_state(hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockFileService {
        url: format!("http://{}", addr),
        hits,
    }
}

async fn stat(State(hits): State<Arc<AtomicUsize>>, Path(uuid): Path<String>) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    match uuid.as_str() {
        FOUND => Json(json!({
            "name": "test.txt",
            "size": 1234,
            "mimetype": "text/plain",
            "create_datetime": "2025-08-25T09:16:09Z"
        }))
        .into_response(),
        EMPTY => Json(json!({})).into_response(),
        EXPORT => Json(json!({
            "name": "domains.txt",
            "size": EXPORT_BODY.len(),
            "mimetype": "text/plain"
        }))
        .into_response(),
        GARBAGE => (StatusCode::OK, "<html>not json</html>").into_response(),
        BROKEN => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        SLOW => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({})).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn read(State(hits): State<Arc<AtomicUsize>>, Path(uuid): Path<String>) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    match uuid.as_str() {
        FOUND => (
            [
                (header::CONTENT_TYPE, "text/plain"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"hello.txt\""),
            ],
            "Hello, world!",
        )
            .into_response(),
        BINARY => Response::new(Body::from(BINARY_BODY)),
        EXPORT => ([(header::CONTENT_TYPE, "text/plain")], EXPORT_BODY).into_response(),
        BROKEN => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
