//! Business logic behind the CLI commands.
//!
//! - `validation`: UUID checks for file identifiers
//! - `file_service`: REST client and backend selection for the file service
//! - `output`: stdout/file writer for command output
//! - `import`: parsing of registry exports fetched from the file service
//! - `domain_service`: Postgres queries over domains and flags

pub mod domain_service;
pub mod file_service;
pub mod import;
pub mod output;
pub mod validation;
