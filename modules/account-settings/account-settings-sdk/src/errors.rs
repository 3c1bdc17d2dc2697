//! Error types for the account settings SDK.
//!
//! Every public operation returns one of these; nothing escapes the module
//! boundary as a panic. Security-sensitive failures keep their messages
//! generic so they cannot be used to probe for account existence.

use thiserror::Error;

use crate::models::OperationKey;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// Field-scoped, client-only failure. Rendered inline at the field,
    /// never sent to a backend and never toasted.
    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    /// Duplicate username or email.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The backend lacks a requested feature, e.g. MFA is disabled.
    #[error("Capability unavailable: {message}")]
    CapabilityUnavailable { message: String },

    /// No active session. The caller owns the redirect.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The same operation is already in flight for this container.
    #[error("Operation '{}' already in progress", operation.as_str())]
    Busy { operation: OperationKey },

    /// Profile record missing from the store.
    #[error("Profile not found")]
    NotFound,

    /// Catch-all. The underlying cause is logged, not surfaced.
    #[error("Internal error")]
    Internal,
}

impl SettingsError {
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn capability_unavailable(message: impl Into<String>) -> Self {
        Self::CapabilityUnavailable {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn busy(operation: OperationKey) -> Self {
        Self::Busy { operation }
    }

    /// Whether the UI should render this inline instead of toasting it.
    #[must_use]
    pub fn is_field_scoped(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
