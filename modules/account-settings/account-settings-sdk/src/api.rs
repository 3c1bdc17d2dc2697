//! `AccountSettingsApi` trait definition.
//!
//! This trait is the whole surface the presentation shell sees. The
//! implementation crate provides `LocalClient`, an in-process
//! implementation delegating to the settings service.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::SettingsError;
use crate::models::{
    AvatarUpload, EditableField, NotificationPreferences, NotificationPreferencesPatch,
    ProfilePatch, SecuritySettings, SettingsModal, SettingsTab, SettingsUiState, StudioTheme,
    ToastKind, ToastNotification, TwoFactorEnrollment, UserProfile,
};

/// Public API trait for the account settings module.
///
/// All mutating methods require an authenticated session; without one they
/// return [`SettingsError::Unauthenticated`]. Unrelated operations may run
/// concurrently; a second invocation of an in-flight operation returns
/// [`SettingsError::Busy`].
#[async_trait]
pub trait AccountSettingsApi: Send + Sync {
    /// Load the profile and derived snapshots; resets the UI state.
    async fn load(&self) -> Result<UserProfile, SettingsError>;

    // Snapshots the shell renders from.
    fn profile(&self) -> Option<UserProfile>;
    fn security(&self) -> Option<SecuritySettings>;
    fn notifications(&self) -> NotificationPreferences;
    fn ui_state(&self) -> SettingsUiState;
    fn toasts(&self) -> Vec<ToastNotification>;

    /// Apply a validated patch to profile columns.
    async fn update_profile(&self, patch: ProfilePatch) -> Result<UserProfile, SettingsError>;

    /// Validate, recompress, upload, and link a new avatar. Returns the
    /// public URL once the profile points at it.
    async fn upload_avatar(&self, upload: AvatarUpload) -> Result<String, SettingsError>;

    /// Persist the theme choice.
    async fn update_studio_theme(&self, theme: StudioTheme) -> Result<(), SettingsError>;

    /// Request an email change. The local email is not flipped; the change
    /// stays pending until externally confirmed.
    async fn change_email(
        &self,
        current_password: &str,
        new_email: &str,
    ) -> Result<(), SettingsError>;

    async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), SettingsError>;

    /// Enroll one TOTP factor and mint backup codes.
    async fn setup_2fa(
        &self,
        current_password: &str,
    ) -> Result<TwoFactorEnrollment, SettingsError>;

    /// Schedule account deletion after the grace period. The purge itself
    /// is an external background job.
    async fn delete_account(&self, confirmation_text: &str) -> Result<(), SettingsError>;

    /// Merge a partial preference update over the complete set and persist
    /// the whole result.
    async fn update_notifications(
        &self,
        patch: NotificationPreferencesPatch,
    ) -> Result<NotificationPreferences, SettingsError>;

    // Inline editing.
    fn begin_edit(&self, field: EditableField) -> Result<(), SettingsError>;
    fn begin_edit_discarding(&self, field: EditableField) -> Result<(), SettingsError>;
    fn set_edit_value(&self, value: &str);
    fn cancel_edit(&self);
    async fn commit_edit(&self) -> Result<(), SettingsError>;

    // UI state.
    fn set_active_tab(&self, tab: SettingsTab);
    fn set_active_modal(&self, modal: Option<SettingsModal>);

    // Toasts.
    fn show_toast(&self, kind: ToastKind, message: &str) -> Uuid;
    fn dismiss_toast(&self, id: Uuid);
}
