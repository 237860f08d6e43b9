//! Handlers for `file-client stat` and `file-client read`.
//!
//! Checks run in a fixed order: backend availability, UUID, configuration,
//! and only then the request. A bad UUID is reported even when no base URL is
//! configured, and the gRPC backend fails the same way whatever UUID it is
//! given.

use crate::{
    cli::{BackendKind, FileArgs},
    config::AppConfig,
    errors::AppError,
    services::{
        file_service::{Backend, RestBackend, UnimplementedBackend},
        output::{Payload, write_output},
        validation::FileId,
    },
};
use tracing::info;

/// Build the backend named on the command line and check the file id.
///
/// The REST base URL is only required once the id is known to be valid.
fn prepare(args: &FileArgs, config: &AppConfig) -> Result<(Backend, FileId), AppError> {
    let backend = match args.backend {
        BackendKind::Grpc => {
            Backend::Unimplemented(UnimplementedBackend::grpc(args.grpc_server.clone()))
        }
        BackendKind::Rest => {
            let id = FileId::parse(&args.uuid)?;
            let rest = RestBackend::new(config.require_api_base_url()?)?;
            return Ok((Backend::Rest(rest), id));
        }
    };
    backend.ensure_available()?;
    Ok((backend, FileId::parse(&args.uuid)?))
}

/// `file-client stat <uuid>`
pub async fn stat(args: &FileArgs, config: &AppConfig) -> Result<(), AppError> {
    let (backend, id) = prepare(args, config)?;
    let metadata = backend.stat(id).await?;

    let text = format!("{}\n", metadata);
    write_output(&Payload::Text(text), &args.output).await?;
    Ok(())
}

/// `file-client read <uuid>`
pub async fn read(args: &FileArgs, config: &AppConfig) -> Result<(), AppError> {
    let (backend, id) = prepare(args, config)?;
    let content = backend.read(id).await?;
    info!(
        "received {} ({}, {} bytes)",
        content.filename,
        content.content_type,
        content.data.len()
    );

    let payload = Payload::for_content(content.data, &args.output);
    write_output(&payload, &args.output).await?;
    Ok(())
}
