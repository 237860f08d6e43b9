//! Core data models for the registry CLI.
//!
//! `file` holds what the remote file service hands back for a single
//! `stat`/`read` call. `domain` holds the records stored in Postgres.

pub mod domain;
pub mod file;
