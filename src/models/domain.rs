//! Represents registry records stored in Postgres.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Lifecycle flag meaning the registration lapsed.
pub const FLAG_EXPIRED: &str = "EXPIRED";

/// Lifecycle flag meaning the domain was removed from the zone.
pub const FLAG_OUTZONE: &str = "OUTZONE";

/// A domain registration about to be inserted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewDomain {
    /// Fully qualified domain name.
    pub fqdn: String,

    /// When the registration started.
    pub registered_at: DateTime<Utc>,

    /// When the registration ended, if it has.
    pub unregistered_at: Option<DateTime<Utc>>,
}

/// A flag row about to be inserted, addressed by fqdn rather than id.
///
/// The id is resolved at insert time against the most recent registration of
/// that fqdn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewFlag {
    pub domain_fqdn: String,
    pub flag: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
}

/// Records parsed from one imported file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportBatch {
    pub domains: Vec<NewDomain>,
    pub flags: Vec<NewFlag>,
}

/// Aggregate counts shown by `status`.
#[derive(Clone, Copy, FromRow, Debug, Default, PartialEq, Eq)]
pub struct DomainStats {
    pub total_domains: i64,

    /// Domains with no `unregistered_at`.
    pub active_domains: i64,

    pub total_flags: i64,

    /// Flags with no `valid_to`.
    pub active_flags: i64,
}
