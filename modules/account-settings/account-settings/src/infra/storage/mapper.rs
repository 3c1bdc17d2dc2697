use anyhow::Context;

use account_settings_sdk::models::{Preferences, UserProfile};

use super::entity;
use crate::domain::repo::RepoError;

/// Stored row to domain model. A corrupt preferences document is a storage
/// error, not a silent reset to defaults.
pub fn to_profile(model: entity::Model) -> Result<UserProfile, RepoError> {
    let preferences: Preferences = serde_json::from_value(model.preferences)
        .context("malformed preferences document")
        .map_err(RepoError::Other)?;

    Ok(UserProfile {
        id: model.id,
        full_name: model.full_name,
        username: model.username,
        bio: model.bio,
        avatar_url: model.avatar_url,
        preferences,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn preferences_json(preferences: &Preferences) -> Result<serde_json::Value, RepoError> {
    serde_json::to_value(preferences)
        .context("preferences serialization failed")
        .map_err(RepoError::Other)
}
