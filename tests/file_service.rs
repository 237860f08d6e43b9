mod common;

use common::{BINARY, BINARY_BODY, BROKEN, EMPTY, FOUND, GARBAGE, MISSING, SLOW};
use domain_registry::services::{
    file_service::{FetchError, RestBackend},
    validation::FileId,
};
use std::time::Duration;

fn id(s: &str) -> FileId {
    FileId::parse(s).expect("test uuid")
}

#[tokio::test]
async fn stat_returns_metadata() {
    let server = common::spawn().await;
    let backend = RestBackend::new(format!("{}/", server.url)).unwrap();

    let meta = backend.stat(id(FOUND)).await.unwrap();
    assert_eq!(meta.name, "test.txt");
    assert_eq!(meta.size, 1234);
    assert_eq!(meta.mimetype, "text/plain");
    assert_eq!(meta.created, "2025-08-25T09:16:09Z");
}

#[tokio::test]
async fn stat_is_idempotent() {
    let server = common::spawn().await;
    let backend = RestBackend::new(server.url.clone()).unwrap();

    let first = backend.stat(id(FOUND)).await.unwrap().to_string();
    let second = backend.stat(id(FOUND)).await.unwrap().to_string();
    assert_eq!(first, second);
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn stat_fills_defaults() {
    let server = common::spawn().await;
    let backend = RestBackend::new(server.url.clone()).unwrap();

    let rendered = backend.stat(id(EMPTY)).await.unwrap().to_string();
    assert_eq!(
        rendered,
        "Name: Unknown\nSize: 0 bytes\nMIME Type: Unknown\nCreated: Unknown"
    );
}

#[tokio::test]
async fn uppercase_uuid_hits_canonical_path() {
    let server = common::spawn().await;
    let backend = RestBackend::new(server.url.clone()).unwrap();

    let meta = backend.stat(id(&FOUND.to_uppercase())).await.unwrap();
    assert_eq!(meta.name, "test.txt");
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let server = common::spawn().await;
    let backend = RestBackend::new(server.url.clone()).unwrap();

    assert!(matches!(
        backend.stat(id(MISSING)).await,
        Err(FetchError::NotFound)
    ));
    assert!(matches!(
        backend.read(id(MISSING)).await,
        Err(FetchError::NotFound)
    ));
}

#[tokio::test]
async fn server_errors_are_http_errors() {
    let server = common::spawn().await;
    let backend = RestBackend::new(server.url.clone()).unwrap();

    match backend.stat(id(BROKEN)).await {
        Err(FetchError::Http { status, detail }) => {
            assert_eq!(status, 500);
            assert_eq!(detail, "Internal Server Error");
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
    assert!(matches!(
        backend.read(id(BROKEN)).await,
        Err(FetchError::Http { status: 503, .. })
    ));
}

#[tokio::test]
async fn unparseable_metadata_is_http_error() {
    let server = common::spawn().await;
    let backend = RestBackend::new(server.url.clone()).unwrap();

    match backend.stat(id(GARBAGE)).await {
        Err(FetchError::Http { status, detail }) => {
            assert_eq!(status, 200);
            assert!(detail.starts_with("invalid metadata body"));
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn read_returns_body_and_headers() {
    let server = common::spawn().await;
    let backend = RestBackend::new(server.url.clone()).unwrap();

    let content = backend.read(id(FOUND)).await.unwrap();
    assert_eq!(&content.data[..], b"Hello, world!");
    assert_eq!(content.content_type, "text/plain");
    assert_eq!(content.filename, "hello.txt");
}

#[tokio::test]
async fn read_without_headers_uses_defaults() {
    let server = common::spawn().await;
    let backend = RestBackend::new(server.url.clone()).unwrap();

    let content = backend.read(id(BINARY)).await.unwrap();
    assert_eq!(&content.data[..], BINARY_BODY);
    assert_eq!(content.content_type, "application/octet-stream");
    assert_eq!(content.filename, "unknown_file");
}

#[tokio::test]
async fn slow_service_times_out_as_transport_error() {
    let server = common::spawn().await;
    let backend =
        RestBackend::with_timeout(server.url.clone(), Duration::from_millis(200)).unwrap();

    match backend.stat(id(SLOW)).await {
        Err(FetchError::Transport(detail)) => assert!(!detail.is_empty()),
        other => panic!("expected transport error, got {:?}", other),
    }
}
