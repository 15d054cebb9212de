//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::config::CredentialField;
use crate::domain::DomainError;

/// Application errors wrap domain errors and add credential, configuration
/// and API failures.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error(
        "missing credential: {field} (use --{flag}, set {env}, or add '{key}' to the [jira] section of the config file)",
        flag = .field.flag(),
        env = .field.env_var(),
        key = .field.config_key()
    )]
    MissingCredential { field: CredentialField },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("cannot decode server response: {message}")]
    Decode { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
