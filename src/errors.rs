use crate::{
    config::ConfigError,
    services::{
        domain_service::DomainError, file_service::FetchError, import::ImportError,
        output::OutputError, validation::ValidationError,
    },
};
use std::{fmt, process::ExitCode};

/// Exit code for every handled failure.
pub const EXIT_FAILURE: u8 = 1;

/// The single error type handed back to `main`.
///
/// Carries the exact line printed to stderr and the process exit code.
#[derive(Debug)]
pub struct AppError {
    pub code: u8,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific exit code and message.
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
        }
    }

    /// Shortcut for a plain failure (exit code 1).
    pub fn failure(msg: impl Into<String>) -> Self {
        Self::new(EXIT_FAILURE, msg)
    }

    /// Shortcut for failures reported as `Error: <detail>`.
    pub fn detailed(detail: impl fmt::Display) -> Self {
        Self::failure(format!("Error: {}", detail))
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        if matches!(err, FetchError::NotFound | FetchError::Unimplemented(_)) {
            AppError::failure(err.to_string())
        } else {
            AppError::detailed(err)
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::failure(err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::detailed(err)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::detailed(err)
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        AppError::detailed(err)
    }
}

impl From<OutputError> for AppError {
    fn from(err: OutputError) -> Self {
        AppError::detailed(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::detailed(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_reported_bare() {
        let err = AppError::from(FetchError::NotFound);
        assert_eq!(err.message, "File not found");
        assert_eq!(err.code, EXIT_FAILURE);
    }

    #[test]
    fn unimplemented_backend_is_reported_bare() {
        let err = AppError::from(FetchError::Unimplemented("gRPC"));
        assert_eq!(err.message, "gRPC backend not implemented");
    }

    #[test]
    fn transport_errors_carry_detail() {
        let err = AppError::from(FetchError::Transport("connection refused".into()));
        assert_eq!(err.message, "Error: request failed: connection refused");
    }

    #[test]
    fn invalid_uuid_names_input() {
        let err = AppError::from(ValidationError::InvalidUuid("not-a-uuid".into()));
        assert_eq!(err.message, "Invalid UUID: not-a-uuid");
    }
}
