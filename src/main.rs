use clap::Parser;
use domain_registry::{
    AppError,
    cli::{self, Cli},
    config::AppConfig,
    logging,
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // --- Parse args (clap exits on its own for usage errors) ---
    let cli = Cli::parse();

    // --- .env first, so RUST_LOG and the config variables can come from it ---
    let dotenv = dotenvy::dotenv();

    // --- Logging setup ---
    if let Err(err) = logging::init(cli.verbose) {
        return report(AppError::from(err));
    }
    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!("Ignoring unreadable .env file: {}", err),
    }

    // --- Config ---
    let config = AppConfig::from_env();
    tracing::debug!("Running {:?}", cli.command);

    match cli::dispatch(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

fn report(err: AppError) -> ExitCode {
    tracing::debug!("exiting with code {}: {}", err.code, err);
    eprintln!("{}", err);
    err.exit_code()
}
