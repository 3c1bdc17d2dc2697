use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use account_settings_sdk::{
    AccountSettingsApi, AvatarUpload, EditableField, NotificationPreferences,
    NotificationPreferencesPatch, ProfilePatch, SecuritySettings, SettingsError, SettingsModal,
    SettingsTab, SettingsUiState, StudioTheme, ToastKind, ToastNotification,
    TwoFactorEnrollment, UserProfile,
};

use crate::domain::service::SettingsService;

/// In-process client used by the presentation shell.
pub struct LocalClient {
    service: Arc<SettingsService>,
}

impl LocalClient {
    #[must_use]
    pub fn new(service: Arc<SettingsService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AccountSettingsApi for LocalClient {
    async fn load(&self) -> Result<UserProfile, SettingsError> {
        self.service.load().await
    }

    fn profile(&self) -> Option<UserProfile> {
        self.service.profile()
    }

    fn security(&self) -> Option<SecuritySettings> {
        self.service.security()
    }

    fn notifications(&self) -> NotificationPreferences {
        self.service.notifications()
    }

    fn ui_state(&self) -> SettingsUiState {
        self.service.ui_state()
    }

    fn toasts(&self) -> Vec<ToastNotification> {
        self.service.toasts()
    }

    async fn update_profile(&self, patch: ProfilePatch) -> Result<UserProfile, SettingsError> {
        self.service.update_profile(patch).await
    }

    async fn upload_avatar(&self, upload: AvatarUpload) -> Result<String, SettingsError> {
        self.service.upload_avatar(upload).await
    }

    async fn update_studio_theme(&self, theme: StudioTheme) -> Result<(), SettingsError> {
        self.service.update_studio_theme(theme).await
    }

    async fn change_email(
        &self,
        current_password: &str,
        new_email: &str,
    ) -> Result<(), SettingsError> {
        self.service.change_email(current_password, new_email).await
    }

    async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), SettingsError> {
        self.service
            .change_password(current_password, new_password, confirm_password)
            .await
    }

    async fn setup_2fa(
        &self,
        current_password: &str,
    ) -> Result<TwoFactorEnrollment, SettingsError> {
        self.service.setup_2fa(current_password).await
    }

    async fn delete_account(&self, confirmation_text: &str) -> Result<(), SettingsError> {
        self.service.delete_account(confirmation_text).await
    }

    async fn update_notifications(
        &self,
        patch: NotificationPreferencesPatch,
    ) -> Result<NotificationPreferences, SettingsError> {
        self.service.update_notifications(patch).await
    }

    fn begin_edit(&self, field: EditableField) -> Result<(), SettingsError> {
        self.service.begin_edit(field)
    }

    fn begin_edit_discarding(&self, field: EditableField) -> Result<(), SettingsError> {
        self.service.begin_edit_discarding(field)
    }

    fn set_edit_value(&self, value: &str) {
        self.service.set_edit_value(value);
    }

    fn cancel_edit(&self) {
        self.service.cancel_edit();
    }

    async fn commit_edit(&self) -> Result<(), SettingsError> {
        self.service.commit_edit().await
    }

    fn set_active_tab(&self, tab: SettingsTab) {
        self.service.set_active_tab(tab);
    }

    fn set_active_modal(&self, modal: Option<SettingsModal>) {
        self.service.set_active_modal(modal);
    }

    fn show_toast(&self, kind: ToastKind, message: &str) -> Uuid {
        self.service.show_toast(kind, message)
    }

    fn dismiss_toast(&self, id: Uuid) {
        self.service.dismiss_toast(id);
    }
}
