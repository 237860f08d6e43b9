//! Handlers for the database-backed commands.

use crate::{
    config::AppConfig,
    errors::AppError,
    models::domain::DomainStats,
    services::{
        domain_service::DomainService,
        file_service::RestBackend,
        import::parse_file_content,
        output::{Destination, Payload, write_output},
        validation::FileId,
    },
};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::info;

async fn print(text: String) -> Result<(), AppError> {
    write_output(&Payload::Text(text), &Destination::Stdout).await?;
    Ok(())
}

async fn connect(config: &AppConfig) -> Result<DomainService, AppError> {
    Ok(DomainService::connect(config.require_database_url()?).await?)
}

/// `Active domains (2):` followed by one indented fqdn per line, or a
/// `No ... found` line.
pub fn render_domain_list(label: &str, domains: &[String]) -> String {
    if domains.is_empty() {
        return format!("No {} domains found", label.to_lowercase());
    }

    let mut out = format!("{} domains ({}):", label, domains.len());
    for domain in domains {
        out.push_str("\n  ");
        out.push_str(domain);
    }
    out
}

pub fn render_status(now: DateTime<Utc>, config: &AppConfig, stats: &DomainStats) -> String {
    format!(
        "[{} UTC] Database Status\n\
         Version: {}\n\
         API base URL: {}\n\
         Database connected\n  \
         Domains: {} total, {} active\n  \
         Flags: {} total, {} active",
        now.format("%Y-%m-%d %H:%M:%S"),
        env!("CARGO_PKG_VERSION"),
        config.api_base_url.as_deref().unwrap_or("not set"),
        stats.total_domains,
        stats.active_domains,
        stats.total_flags,
        stats.active_flags,
    )
}

/// `status`
pub async fn status(config: &AppConfig) -> Result<(), AppError> {
    let service = connect(config).await?;
    let stats = service.stats().await?;
    print(render_status(Utc::now(), config, &stats)).await
}

/// `active-domains`
pub async fn active_domains(config: &AppConfig) -> Result<(), AppError> {
    let domains = connect(config).await?.active_domains().await?;
    print(render_domain_list("Active", &domains)).await
}

/// `flagged-domains`
pub async fn flagged_domains(config: &AppConfig) -> Result<(), AppError> {
    let domains = connect(config).await?.flagged_domains().await?;
    print(render_domain_list("Flagged", &domains)).await
}

/// `fetch-domains --uuid <id>`
///
/// Pulls metadata and content over REST, parses the export and stores it.
/// Nothing is written to the database unless the whole file parses.
pub async fn fetch_domains(uuid: &str, config: &AppConfig) -> Result<(), AppError> {
    let id = FileId::parse(uuid)?;
    let backend = RestBackend::new(config.require_api_base_url()?)?;

    let metadata = backend.stat(id).await?;
    info!("fetching {} ({}, {} bytes)", metadata.name, metadata.mimetype, metadata.size);
    let content = backend.read(id).await?;

    let text = String::from_utf8_lossy(&content.data);
    let batch = parse_file_content(&text, &metadata)?;
    info!(
        "parsed {} domains and {} flags from {}",
        batch.domains.len(),
        batch.flags.len(),
        metadata.name
    );

    let service = connect(config).await?;
    let stored = service.store_domains(&batch).await?;

    print(format!(
        "Fetched {} domains from {}, stored {} new domains",
        batch.domains.len(),
        metadata.name,
        stored
    ))
    .await
}

/// `migrate`
pub async fn migrate(file: &Path, config: &AppConfig) -> Result<(), AppError> {
    let service = connect(config).await?;
    let count = service.run_migrations(file).await?;
    print(format!("Applied {} migration statements from {}", count, file.display())).await
}
