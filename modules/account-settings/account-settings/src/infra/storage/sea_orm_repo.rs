use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait};
use uuid::Uuid;

use account_settings_sdk::models::{Preferences, ProfilePatch, UserProfile};

use crate::domain::fields::ProfileFields;
use crate::domain::repo::{ProfileRepository, RepoError};

use super::entity::{self, Entity as ProfileEntity};
use super::mapper;

pub struct SeaOrmProfileRepository {
    db: DatabaseConnection,
}

impl SeaOrmProfileRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch(&self, user_id: Uuid) -> Result<entity::Model, RepoError> {
        ProfileEntity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Other(e.into()))?
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl ProfileRepository for SeaOrmProfileRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserProfile>, RepoError> {
        let model = ProfileEntity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Other(e.into()))?;
        model.map(mapper::to_profile).transpose()
    }

    async fn apply_patch(
        &self,
        user_id: Uuid,
        patch: ProfilePatch,
    ) -> Result<UserProfile, RepoError> {
        let current = self.fetch(user_id).await?;
        let mut active: entity::ActiveModel = current.into();

        if let Some(full_name) = patch.full_name {
            active.full_name = ActiveValue::Set(full_name);
        }
        if let Some(username) = patch.username {
            active.username = ActiveValue::Set(username);
        }
        if let Some(bio) = patch.bio {
            active.bio = ActiveValue::Set(bio);
        }
        if let Some(avatar_url) = patch.avatar_url {
            active.avatar_url = ActiveValue::Set(Some(avatar_url));
        }
        active.updated_at = ActiveValue::Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        mapper::to_profile(model)
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: Preferences,
    ) -> Result<UserProfile, RepoError> {
        let current = self.fetch(user_id).await?;
        let mut active: entity::ActiveModel = current.into();
        active.preferences = ActiveValue::Set(mapper::preferences_json(&preferences)?);
        active.updated_at = ActiveValue::Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        mapper::to_profile(model)
    }
}

/// `username` is the only unique column besides the key, so a unique
/// violation can be attributed without parsing driver-specific codes.
fn map_db_err(e: sea_orm::DbErr) -> RepoError {
    let text = e.to_string().to_ascii_lowercase();
    if text.contains("unique") || text.contains("duplicate") {
        return RepoError::Conflict {
            field: ProfileFields::USERNAME,
        };
    }
    RepoError::Other(e.into())
}
