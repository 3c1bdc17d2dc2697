use account_settings_sdk::{OperationKey, SettingsError};

use super::ports::IdentityError;
use super::repo::RepoError;

/// Internal error type for the domain layer. Converted to the SDK's
/// [`SettingsError`] at the module boundary; the underlying causes stay in
/// the logs.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Profile not found")]
    NotFound,

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Capability unavailable: {message}")]
    CapabilityUnavailable { message: String },

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Operation '{}' already in progress", .0.as_str())]
    Busy(OperationKey),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

impl From<RepoError> for DomainError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => Self::NotFound,
            RepoError::Conflict { field } => Self::Conflict {
                message: format!("{field} is already taken"),
            },
            RepoError::Other(e) => Self::Storage(e),
        }
    }
}

impl From<IdentityError> for DomainError {
    fn from(e: IdentityError) -> Self {
        match e {
            // Generic wording: must not reveal whether the account exists.
            IdentityError::InvalidCredentials => Self::validation(
                super::fields::ProfileFields::CURRENT_PASSWORD,
                "Invalid credentials",
            ),
            IdentityError::DuplicateEmail => {
                Self::conflict("This email is already in use")
            }
            IdentityError::CapabilityUnavailable(message) => {
                Self::CapabilityUnavailable { message }
            }
            IdentityError::Unavailable(e) => Self::Storage(e),
        }
    }
}

impl From<DomainError> for SettingsError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => Self::NotFound,
            DomainError::Validation { field, message } => Self::Validation { field, message },
            DomainError::Conflict { message } => Self::Conflict { message },
            DomainError::CapabilityUnavailable { message } => {
                Self::CapabilityUnavailable { message }
            }
            DomainError::Unauthenticated => Self::Unauthenticated,
            DomainError::Busy(operation) => Self::Busy { operation },
            DomainError::Storage(_) => Self::Internal,
        }
    }
}
