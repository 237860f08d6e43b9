//! Domain registry CLI: Postgres queries over registered domains and a client
//! for the remote file service.

pub mod cli;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod services;

pub use errors::AppError;
