//! One handler per CLI command. Handlers print their own output and return
//! `AppError` for `main` to report.

pub mod domain_handlers;
pub mod file_handlers;
