//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        ApplicationError::from(e).into()
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(e) => match e {
                    ApplicationError::Domain(_) => crate::exitcode::USAGE,
                    ApplicationError::MissingCredential { .. } | ApplicationError::Config { .. } => {
                        crate::exitcode::CONFIG
                    }
                    ApplicationError::Api { status: 401 | 403, .. } => crate::exitcode::NOPERM,
                    ApplicationError::Api { .. } => crate::exitcode::SOFTWARE,
                    ApplicationError::Network { .. } => crate::exitcode::UNAVAILABLE,
                    ApplicationError::Decode { .. } => crate::exitcode::DATAERR,
                },
            },
        }
    }
}
