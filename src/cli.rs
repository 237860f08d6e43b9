//! Command-line surface.
//!
//! ## Commands
//! - `status`: version, file service URL and database counts
//! - `active-domains`: registered domains without an open EXPIRED flag
//! - `flagged-domains`: domains that have had both EXPIRED and OUTZONE flags
//! - `fetch-domains --uuid <id>`: import a registry export from the file service
//! - `migrate`: create the database schema
//! - `file-client stat <id>` / `file-client read <id>`: file service access

use crate::{
    config::{AppConfig, DEFAULT_GRPC_SERVER},
    errors::AppError,
    handlers::{domain_handlers, file_handlers},
    services::output::Destination,
};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_MIGRATION: &str = "migrations/0001_init.sql";

#[derive(Parser, Debug)]
#[command(name = "registry-cli", author, version, about = "Domain registry CLI")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show database status
    Status,

    /// List active domains (registered, not expired)
    ActiveDomains,

    /// List domains that had both EXPIRED and OUTZONE flags
    FlaggedDomains,

    /// Fetch a registry export from the file service and store its domains
    FetchDomains {
        /// UUID of the export file
        #[arg(long)]
        uuid: String,

        /// REST API base URL (overrides API_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Create the domain tables
    Migrate {
        /// SQL file with `;`-separated statements
        #[arg(long, default_value = DEFAULT_MIGRATION)]
        file: PathBuf,
    },

    /// File client for REST/gRPC operations
    #[command(subcommand)]
    FileClient(FileCommand),
}

#[derive(Subcommand, Debug)]
pub enum FileCommand {
    /// Print the file metadata in a human-readable manner
    Stat(FileArgs),

    /// Output the file content
    Read(FileArgs),
}

#[derive(Args, Debug, Clone)]
pub struct FileArgs {
    /// File UUID (hyphenated form)
    pub uuid: String,

    /// Backend to use
    #[arg(long, value_enum, default_value_t = BackendKind::Rest)]
    pub backend: BackendKind,

    /// gRPC server address
    #[arg(long, default_value = DEFAULT_GRPC_SERVER)]
    pub grpc_server: String,

    /// REST API base URL (overrides API_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Output file, `-` for stdout
    #[arg(short, long, default_value = "-")]
    pub output: Destination,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Rest,
    Grpc,
}

/// Route a parsed command to its handler.
pub async fn dispatch(command: Command, config: AppConfig) -> Result<(), AppError> {
    match command {
        Command::Status => domain_handlers::status(&config).await,
        Command::ActiveDomains => domain_handlers::active_domains(&config).await,
        Command::FlaggedDomains => domain_handlers::flagged_domains(&config).await,
        Command::FetchDomains { uuid, base_url } => {
            domain_handlers::fetch_domains(&uuid, &config.with_api_base_url(base_url)).await
        }
        Command::Migrate { file } => domain_handlers::migrate(&file, &config).await,
        Command::FileClient(FileCommand::Stat(args)) => {
            let config = config.with_api_base_url(args.base_url.clone());
            file_handlers::stat(&args, &config).await
        }
        Command::FileClient(FileCommand::Read(args)) => {
            let config = config.with_api_base_url(args.base_url.clone());
            file_handlers::read(&args, &config).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn file_client_defaults() {
        let cli = Cli::try_parse_from([
            "registry-cli",
            "file-client",
            "stat",
            "123e4567-e89b-12d3-a456-426614174000",
        ])
        .unwrap();

        let Command::FileClient(FileCommand::Stat(args)) = cli.command else {
            panic!("expected file-client stat");
        };
        assert_eq!(args.backend, BackendKind::Rest);
        assert_eq!(args.grpc_server, "localhost:50051");
        assert_eq!(args.output, Destination::Stdout);
        assert!(args.base_url.is_none());
    }

    #[test]
    fn file_client_options() {
        let cli = Cli::try_parse_from([
            "registry-cli",
            "-vv",
            "file-client",
            "read",
            "123e4567-e89b-12d3-a456-426614174000",
            "--backend",
            "grpc",
            "--base-url",
            "http://localhost/",
            "--output",
            "out.bin",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Command::FileClient(FileCommand::Read(args)) = cli.command else {
            panic!("expected file-client read");
        };
        assert_eq!(args.backend, BackendKind::Grpc);
        assert_eq!(args.base_url.as_deref(), Some("http://localhost/"));
        assert_eq!(args.output, Destination::File(PathBuf::from("out.bin")));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let result = Cli::try_parse_from([
            "registry-cli",
            "file-client",
            "stat",
            "123e4567-e89b-12d3-a456-426614174000",
            "--backend",
            "ftp",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn fetch_domains_requires_uuid() {
        assert!(Cli::try_parse_from(["registry-cli", "fetch-domains"]).is_err());
    }
}
