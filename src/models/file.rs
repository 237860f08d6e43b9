//! Represents files served by the remote file service.

use crate::services::validation::FileId;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

pub const UNKNOWN: &str = "Unknown";
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
pub const UNKNOWN_FILENAME: &str = "unknown_file";

/// Metadata returned by `GET /file/{uuid}/stat/`.
///
/// Every field is optional on the wire. Absent (or `null`) fields fall back to
/// `"Unknown"`, or `0` for the size.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFileMetadata")]
pub struct FileMetadata {
    /// Original filename.
    pub name: String,

    /// Size in bytes.
    pub size: u64,

    /// Content type (MIME type).
    pub mimetype: String,

    /// Creation timestamp exactly as the service reported it.
    pub created: String,
}

#[derive(Deserialize)]
struct RawFileMetadata {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    mimetype: Option<Value>,
    #[serde(default)]
    create_datetime: Option<Value>,
}

/// Strings are taken as-is, other JSON values keep their JSON text.
fn text_or_unknown(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => UNKNOWN.to_string(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

impl From<RawFileMetadata> for FileMetadata {
    fn from(raw: RawFileMetadata) -> Self {
        Self {
            name: text_or_unknown(raw.name),
            size: raw.size.unwrap_or(0),
            mimetype: text_or_unknown(raw.mimetype),
            created: text_or_unknown(raw.create_datetime),
        }
    }
}

/// Human-readable rendering used by `stat`.
///
/// Labels and field order are relied upon by scripts reading the output.
impl fmt::Display for FileMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Size: {} bytes", self.size)?;
        writeln!(f, "MIME Type: {}", self.mimetype)?;
        write!(f, "Created: {}", self.created)
    }
}

/// Body of `GET /file/{uuid}/read/` along with what the headers said about it.
#[derive(Debug, Clone)]
pub struct FileContent {
    /// Raw response bytes.
    pub data: Bytes,

    /// Declared `Content-Type`, or `application/octet-stream`.
    pub content_type: String,

    /// Filename suggested by `Content-Disposition`, or `unknown_file`.
    pub filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Stat,
    Read,
}

impl Operation {
    pub fn path_segment(self) -> &'static str {
        match self {
            Operation::Stat => "stat",
            Operation::Read => "read",
        }
    }
}

/// Everything needed to address one file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pub base_url: String,
    pub id: FileId,
    pub operation: Operation,
}

impl RequestTarget {
    pub fn new(base_url: impl Into<String>, id: FileId, operation: Operation) -> Self {
        Self {
            base_url: base_url.into(),
            id,
            operation,
        }
    }

    /// Full request URL.
    ///
    /// Exactly one trailing `/` is dropped from the base so that
    /// `http://host` and `http://host/` address the same resource.
    pub fn url(&self) -> String {
        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        format!(
            "{}/file/{}/{}/",
            base,
            self.id,
            self.operation.path_segment()
        )
    }
}
