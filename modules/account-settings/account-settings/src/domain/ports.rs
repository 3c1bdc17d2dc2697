//! Ports onto the external collaborators: the identity/session service and
//! the object storage bucket. The profile store port lives in `repo.rs`.

use async_trait::async_trait;
use uuid::Uuid;

/// Authenticated session as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub has_password: bool,
}

/// Raw TOTP enrollment data from the identity provider. Backup codes are
/// minted locally, not by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotpFactor {
    pub factor_id: String,
    pub provisioning_uri: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already registered")]
    DuplicateEmail,
    #[error("capability unavailable: {0}")]
    CapabilityUnavailable(String),
    #[error("identity provider unavailable")]
    Unavailable(#[source] anyhow::Error),
}

/// Identity & session service. This module only consumes it; provider error
/// codes are translated into the domain taxonomy at the call sites.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_session(&self) -> Result<Option<Session>, IdentityError>;

    /// Request an email change. The provider sends the confirmation mail;
    /// the address stays unchanged until the user confirms out-of-band.
    async fn change_email(
        &self,
        current_password: &str,
        new_email: &str,
    ) -> Result<(), IdentityError>;

    async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), IdentityError>;

    async fn enroll_totp(&self, current_password: &str) -> Result<TotpFactor, IdentityError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object '{key}' already exists")]
    AlreadyExists { key: String },
    #[error("object storage unavailable")]
    Unavailable(#[source] anyhow::Error),
}

/// Bucket-scoped binary upload plus public-URL resolution.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload with no-overwrite semantics: a key collision fails instead of
    /// replacing the existing object.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Durable public URL for an uploaded object.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}
