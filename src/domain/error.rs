//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid user input for a resource operation.
/// They are raised before any network traffic happens.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("missing required argument: --{0}")]
    MissingArgument(&'static str),

    #[error("invalid value for --{argument}: {message}")]
    InvalidArgument {
        argument: &'static str,
        message: String,
    },
}

impl DomainError {
    pub fn invalid(argument: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
