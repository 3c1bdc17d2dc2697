use async_trait::async_trait;
use uuid::Uuid;

use account_settings_sdk::models::{Preferences, ProfilePatch, UserProfile};

/// Typed repository errors so a unique-violation on `username` can surface
/// as a conflict instead of disappearing into a generic failure.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("profile not found")]
    NotFound,
    #[error("unique constraint violated on '{field}'")]
    Conflict { field: &'static str },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Port onto the relational profile store: one record per user, with the
/// preferences record in a single JSON column.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserProfile>, RepoError>;

    /// Apply a column patch and stamp `updated_at`. Returns the stored row.
    async fn apply_patch(
        &self,
        user_id: Uuid,
        patch: ProfilePatch,
    ) -> Result<UserProfile, RepoError>;

    /// Replace the whole preferences record and stamp `updated_at`.
    async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: Preferences,
    ) -> Result<UserProfile, RepoError>;
}
