//! src/services/domain_service.rs
//!
//! DomainService: read queries and bulk import over the `domain` and
//! `domain_flag` tables in Postgres.

use crate::models::domain::{DomainStats, FLAG_EXPIRED, FLAG_OUTZONE, ImportBatch};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{io, path::Path};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("migration file `{path}` could not be read: {source}")]
    MigrationFile {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Query layer for registry records.
///
/// Every CLI invocation runs one command, so the pool is kept to a single
/// connection.
#[derive(Clone)]
pub struct DomainService {
    pub db: PgPool,
}

impl DomainService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str) -> DomainResult<Self> {
        let db = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        debug!("connected to database");
        Ok(Self::new(db))
    }

    /// Domains that are still registered and carry no open `EXPIRED` flag.
    pub async fn active_domains(&self) -> DomainResult<Vec<String>> {
        debug!("fetching active domains");
        let domains = sqlx::query_scalar::<_, String>(
            r#"
            SELECT d.fqdn
            FROM domain d
            WHERE d.unregistered_at IS NULL
              AND d.id NOT IN (
                SELECT df.domain_id
                FROM domain_flag df
                WHERE df.flag = $1
                  AND df.valid_to IS NULL
              )
            ORDER BY d.fqdn
            "#,
        )
        .bind(FLAG_EXPIRED)
        .fetch_all(&self.db)
        .await?;

        info!("found {} active domains", domains.len());
        Ok(domains)
    }

    /// Domains that have ever had both an `EXPIRED` and an `OUTZONE` flag.
    pub async fn flagged_domains(&self) -> DomainResult<Vec<String>> {
        debug!("fetching flagged domains");
        let domains = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT d.fqdn
            FROM domain d
            JOIN domain_flag df1 ON d.id = df1.domain_id
            JOIN domain_flag df2 ON d.id = df2.domain_id
            WHERE df1.flag = $1
              AND df2.flag = $2
            ORDER BY d.fqdn
            "#,
        )
        .bind(FLAG_EXPIRED)
        .bind(FLAG_OUTZONE)
        .fetch_all(&self.db)
        .await?;

        info!("found {} flagged domains", domains.len());
        Ok(domains)
    }

    pub async fn stats(&self) -> DomainResult<DomainStats> {
        let stats = sqlx::query_as::<_, DomainStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM domain) AS total_domains,
                (SELECT COUNT(*) FROM domain WHERE unregistered_at IS NULL) AS active_domains,
                (SELECT COUNT(*) FROM domain_flag) AS total_flags,
                (SELECT COUNT(*) FROM domain_flag WHERE valid_to IS NULL) AS active_flags
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        debug!("database stats: {:?}", stats);
        Ok(stats)
    }

    /// Insert an imported batch in one transaction.
    ///
    /// Domains already present for the same `(fqdn, registered_at)` are left
    /// alone. Flags attach to the latest registration of their fqdn; flags for
    /// unknown domains are skipped. Returns the number of new domains.
    pub async fn store_domains(&self, batch: &ImportBatch) -> DomainResult<u64> {
        let mut tx = self.db.begin().await?;
        let mut stored = 0u64;

        for domain in &batch.domains {
            let inserted = sqlx::query(
                r#"
                INSERT INTO domain (fqdn, registered_at, unregistered_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (fqdn, registered_at) DO NOTHING
                "#,
            )
            .bind(&domain.fqdn)
            .bind(domain.registered_at)
            .bind(domain.unregistered_at)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if inserted > 0 {
                debug!("stored domain {}", domain.fqdn);
                stored += inserted;
            } else {
                debug!("domain {} already exists", domain.fqdn);
            }
        }

        for flag in &batch.flags {
            let domain_id = sqlx::query_scalar::<_, i64>(
                "SELECT id FROM domain WHERE fqdn = $1 ORDER BY registered_at DESC LIMIT 1",
            )
            .bind(&flag.domain_fqdn)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(domain_id) = domain_id else {
                warn!(
                    "skipping {} flag for unknown domain {}",
                    flag.flag, flag.domain_fqdn
                );
                continue;
            };

            let inserted = sqlx::query(
                r#"
                INSERT INTO domain_flag (domain_id, flag, valid_from, valid_to)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(domain_id)
            .bind(&flag.flag)
            .bind(flag.valid_from)
            .bind(flag.valid_to)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if inserted > 0 {
                debug!("stored {} flag for {}", flag.flag, flag.domain_fqdn);
            }
        }

        tx.commit().await?;
        info!(
            "stored {} of {} domains",
            stored,
            batch.domains.len()
        );
        Ok(stored)
    }

    /// Run the `;`-separated statements of a migration file.
    pub async fn run_migrations(&self, path: impl AsRef<Path>) -> DomainResult<usize> {
        let path = path.as_ref();
        let sql = fs::read_to_string(path)
            .await
            .map_err(|source| DomainError::MigrationFile {
                path: path.display().to_string(),
                source,
            })?;

        let statements = split_statements(&sql);
        info!("Running {} migration statements...", statements.len());

        for stmt in &statements {
            debug!("Executing migration SQL: {}", stmt);
            sqlx::query(stmt).execute(&self.db).await?;
        }

        Ok(statements.len())
    }
}

/// Split a migration script on `;`, dropping empty statements and `--`
/// comment-only chunks.
pub fn split_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| {
            s.lines()
                .map(str::trim)
                .any(|l| !l.is_empty() && !l.starts_with("--"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_script_splits_on_semicolons() {
        let sql = "-- schema\nCREATE TABLE a (id INT);\n\nCREATE INDEX i ON a (id);\n-- trailing\n";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].ends_with("CREATE TABLE a (id INT)"));
        assert_eq!(statements[1], "CREATE INDEX i ON a (id)");
    }

    #[test]
    fn shipped_migration_creates_both_tables() {
        let sql = include_str!("../../migrations/0001_init.sql");
        let statements = split_statements(sql);
        assert!(statements.iter().any(|s| s.contains("CREATE TABLE IF NOT EXISTS domain (")));
        assert!(statements.iter().any(|s| s.contains("CREATE TABLE IF NOT EXISTS domain_flag")));
    }
}
