//! src/services/file_service.rs
//!
//! Client side of the remote file service. Two operations are exposed,
//! `stat` (metadata as JSON) and `read` (raw bytes), each addressed by a
//! validated [`FileId`]. Every response is classified into exactly one of
//! success, not-found, HTTP error or transport error; nothing here panics or
//! retries.

use crate::models::file::{
    DEFAULT_CONTENT_TYPE, FileContent, FileMetadata, Operation, RequestTarget, UNKNOWN_FILENAME,
};
use crate::services::validation::FileId;
use reqwest::{Client, Response, StatusCode, header};
use std::{error::Error as _, time::Duration};
use thiserror::Error;
use tracing::debug;

/// Upper bound on a single request, connect through body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("File not found")]
    NotFound,
    #[error("HTTP {status}: {detail}")]
    Http { status: u16, detail: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{0} backend not implemented")]
    Unimplemented(&'static str),
    #[error("could not build HTTP client: {0}")]
    Client(String),
}

pub type FetchResult<T> = Result<T, FetchError>;

impl FetchError {
    fn transport(err: &reqwest::Error) -> Self {
        FetchError::Transport(error_chain(err))
    }
}

/// Render an error and all of its sources on one line.
///
/// reqwest keeps the interesting part (refused, timed out, DNS) in the
/// source chain rather than in its own message.
fn error_chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Suggested filename from a `Content-Disposition` style header.
///
/// Segments are split on `;` and trimmed; the first one starting with
/// `filename=` wins and a single pair of surrounding double quotes is
/// stripped. Anything else yields `unknown_file`.
pub fn filename_from_disposition(header: Option<&str>) -> String {
    let Some(value) = header.filter(|v| !v.is_empty()) else {
        return UNKNOWN_FILENAME.to_string();
    };

    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| {
            let name = name.trim();
            name.strip_prefix('"')
                .and_then(|n| n.strip_suffix('"'))
                .unwrap_or(name)
                .to_string()
        })
        .unwrap_or_else(|| UNKNOWN_FILENAME.to_string())
}

/// REST implementation talking to `{base_url}/file/{uuid}/{stat,read}/`.
#[derive(Clone, Debug)]
pub struct RestBackend {
    client: Client,
    base_url: String,
}

impl RestBackend {
    /// Build a backend with its own client using [`REQUEST_TIMEOUT`].
    pub fn new(base_url: impl Into<String>) -> FetchResult<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Client(error_chain(&e)))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn target(&self, id: FileId, operation: Operation) -> RequestTarget {
        RequestTarget::new(self.base_url.clone(), id, operation)
    }

    /// Issue the GET and sort the response into success or one of the
    /// failure classes. Only 2xx responses are returned as `Ok`.
    async fn send(&self, target: &RequestTarget) -> FetchResult<Response> {
        let url = target.url();
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if target.operation == Operation::Stat {
            request = request.header(header::ACCEPT, "application/json");
        }

        let response = request.send().await.map_err(|e| {
            debug!("request to {} failed: {}", url, e);
            FetchError::transport(&e)
        })?;

        let status = response.status();
        debug!("{} -> {}", url, status);

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                detail: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }
        Ok(response)
    }

    /// Fetch metadata for `id`.
    pub async fn stat(&self, id: FileId) -> FetchResult<FileMetadata> {
        let response = self.send(&self.target(id, Operation::Stat)).await?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(&e))?;

        serde_json::from_slice::<FileMetadata>(&body).map_err(|e| FetchError::Http {
            status,
            detail: format!("invalid metadata body: {}", e),
        })
    }

    /// Fetch the raw content for `id`.
    pub async fn read(&self, id: FileId) -> FetchResult<FileContent> {
        let response = self.send(&self.target(id, Operation::Read)).await?;
        let headers = response.headers();

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let filename = filename_from_disposition(
            headers
                .get(header::CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok()),
        );

        let data = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(&e))?;
        debug!(
            "read {} bytes ({}, filename {})",
            data.len(),
            content_type,
            filename
        );

        Ok(FileContent {
            data,
            content_type,
            filename,
        })
    }
}

/// Placeholder for the gRPC transport. Every call fails.
#[derive(Clone, Debug)]
pub struct UnimplementedBackend {
    name: &'static str,
    server: String,
}

impl UnimplementedBackend {
    pub fn grpc(server: impl Into<String>) -> Self {
        Self {
            name: "gRPC",
            server: server.into(),
        }
    }

    /// The error every call on this backend ends in.
    pub fn unavailable(&self) -> FetchError {
        debug!(
            "{} backend at {} requested but not implemented",
            self.name, self.server
        );
        FetchError::Unimplemented(self.name)
    }

    pub async fn stat(&self, _id: FileId) -> FetchResult<FileMetadata> {
        Err(self.unavailable())
    }

    pub async fn read(&self, _id: FileId) -> FetchResult<FileContent> {
        Err(self.unavailable())
    }
}

/// The file transports the CLI can be pointed at.
#[derive(Clone, Debug)]
pub enum Backend {
    Rest(RestBackend),
    Unimplemented(UnimplementedBackend),
}

impl Backend {
    /// Fail early for backends that cannot serve any request, before the
    /// file id is even looked at.
    pub fn ensure_available(&self) -> FetchResult<()> {
        match self {
            Backend::Rest(_) => Ok(()),
            Backend::Unimplemented(stub) => Err(stub.unavailable()),
        }
    }

    pub async fn stat(&self, id: FileId) -> FetchResult<FileMetadata> {
        match self {
            Backend::Rest(rest) => rest.stat(id).await,
            Backend::Unimplemented(stub) => stub.stat(id).await,
        }
    }

    pub async fn read(&self, id: FileId) -> FetchResult<FileContent> {
        match self {
            Backend::Rest(rest) => rest.read(id).await,
            Backend::Unimplemented(stub) => stub.read(id).await,
        }
    }
}
