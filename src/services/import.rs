//! Turns a fetched registry export into rows for `DomainService::store_domains`.
//!
//! Three layouts are understood, picked by MIME type and then by file
//! extension:
//! - JSON: `{"domains": [...], "flags": [...]}`
//! - CSV: a `fqdn,registered_at,unregistered_at` header followed by rows
//! - plain text: one fqdn per line, `#` comments and blank lines ignored

use crate::models::{
    domain::{ImportBatch, NewDomain, NewFlag},
    file::FileMetadata,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid timestamp `{0}`")]
    Timestamp(String),
    #[error("CSV export is missing the `{0}` column")]
    MissingColumn(&'static str),
    #[error("CSV line {line}: {reason}")]
    Csv { line: usize, reason: String },
}

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Text,
}

impl ExportFormat {
    pub fn detect(metadata: &FileMetadata) -> Self {
        let mime = metadata.mimetype.to_ascii_lowercase();
        let name = metadata.name.to_ascii_lowercase();
        if mime.contains("json") || name.ends_with(".json") {
            ExportFormat::Json
        } else if mime.contains("csv") || name.ends_with(".csv") {
            ExportFormat::Csv
        } else {
            ExportFormat::Text
        }
    }
}

/// Parse a registry timestamp.
///
/// Accepts RFC 3339, Postgres-style `2025-08-24 13:29:27+00` and a bare
/// `2025-08-24 13:29:27`, which is read as UTC.
pub fn parse_timestamp(raw: &str) -> ImportResult<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(ts) = DateTime::parse_from_str(s, fmt) {
            return Ok(ts.with_timezone(&Utc));
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts.and_utc());
        }
    }
    Err(ImportError::Timestamp(raw.to_string()))
}

fn parse_optional_timestamp(raw: Option<&str>) -> ImportResult<Option<DateTime<Utc>>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_timestamp(s).map(Some),
    }
}

#[derive(Deserialize)]
struct JsonExport {
    #[serde(default)]
    domains: Vec<JsonDomain>,
    #[serde(default)]
    flags: Vec<JsonFlag>,
}

#[derive(Deserialize)]
struct JsonDomain {
    fqdn: String,
    registered_at: String,
    #[serde(default)]
    unregistered_at: Option<String>,
}

#[derive(Deserialize)]
struct JsonFlag {
    domain_fqdn: String,
    flag: String,
    valid_from: String,
    #[serde(default)]
    valid_to: Option<String>,
}

/// Parse `content` using the layout implied by `metadata`.
pub fn parse_file_content(content: &str, metadata: &FileMetadata) -> ImportResult<ImportBatch> {
    match ExportFormat::detect(metadata) {
        ExportFormat::Json => parse_json(content),
        ExportFormat::Csv => parse_csv(content),
        ExportFormat::Text => Ok(parse_text(content, Utc::now())),
    }
}

pub fn parse_json(content: &str) -> ImportResult<ImportBatch> {
    let export: JsonExport = serde_json::from_str(content)?;

    let domains = export
        .domains
        .into_iter()
        .map(|d| {
            Ok(NewDomain {
                fqdn: d.fqdn,
                registered_at: parse_timestamp(&d.registered_at)?,
                unregistered_at: parse_optional_timestamp(d.unregistered_at.as_deref())?,
            })
        })
        .collect::<ImportResult<Vec<_>>>()?;

    let flags = export
        .flags
        .into_iter()
        .map(|f| {
            Ok(NewFlag {
                domain_fqdn: f.domain_fqdn,
                flag: f.flag,
                valid_from: parse_timestamp(&f.valid_from)?,
                valid_to: parse_optional_timestamp(f.valid_to.as_deref())?,
            })
        })
        .collect::<ImportResult<Vec<_>>>()?;

    Ok(ImportBatch { domains, flags })
}

/// Simple comma-separated rows; quoting is not supported.
pub fn parse_csv(content: &str) -> ImportResult<ImportBatch> {
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Ok(ImportBatch::default());
    };
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let position = |name: &'static str| {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or(ImportError::MissingColumn(name))
    };
    let fqdn_at = position("fqdn")?;
    let registered_at = position("registered_at")?;
    let unregistered_at = columns.iter().position(|c| *c == "unregistered_at");

    let mut domains = Vec::new();
    for (idx, line) in lines {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        let cell = |at: usize| cells.get(at).copied().filter(|c| !c.is_empty());

        let fqdn = cell(fqdn_at).ok_or_else(|| ImportError::Csv {
            line: idx + 1,
            reason: "empty fqdn".into(),
        })?;
        let registered = cell(registered_at).ok_or_else(|| ImportError::Csv {
            line: idx + 1,
            reason: "empty registered_at".into(),
        })?;

        domains.push(NewDomain {
            fqdn: fqdn.to_string(),
            registered_at: parse_timestamp(registered)?,
            unregistered_at: parse_optional_timestamp(unregistered_at.and_then(cell))?,
        });
    }

    Ok(ImportBatch {
        domains,
        flags: Vec::new(),
    })
}

/// One fqdn per line, all registered at `now`.
pub fn parse_text(content: &str, now: DateTime<Utc>) -> ImportBatch {
    let domains = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|fqdn| NewDomain {
            fqdn: fqdn.to_string(),
            registered_at: now,
            unregistered_at: None,
        })
        .collect();

    ImportBatch {
        domains,
        flags: Vec::new(),
    }
}
