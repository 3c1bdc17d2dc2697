//! Settings state container.
//!
//! Owns the entity snapshots, the UI state, the toast queue, the edit
//! controller and the per-operation in-flight registry, and orchestrates the
//! validation engine, the avatar pipeline, the preference merger and the
//! security operations over the external ports. All mutation of shared
//! state happens through this service; locks are never held across awaits.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use rand::Rng;
use uuid::Uuid;

use account_settings_sdk::errors::SettingsError;
use account_settings_sdk::models::{
    AvatarUpload, EditableField, NotificationPreferences, NotificationPreferencesPatch,
    OperationKey, Preferences, ProfilePatch, SecuritySettings, SettingsModal, SettingsTab,
    SettingsUiState, StudioTheme, ToastKind, ToastNotification, TwoFactorEnrollment, UserProfile,
};

use super::avatar::AvatarPipeline;
use super::editing::{CommitAction, EditController, EditError};
use super::error::DomainError;
use super::fields::ProfileFields;
use super::inflight::InFlightRegistry;
use super::ports::{IdentityProvider, ObjectStorage, Session};
use super::preferences;
use super::repo::ProfileRepository;
use super::toast::ToastQueue;
use super::validation;
use crate::config::SettingsConfig;

const BACKUP_CODE_COUNT: usize = 10;
const BACKUP_CODE_LEN: usize = 8;
// Alphanumeric without lookalike characters (0/O, 1/I/L).
const BACKUP_CODE_CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

#[derive(Debug, Clone, Default)]
struct ViewState {
    active_tab: SettingsTab,
    active_modal: Option<SettingsModal>,
}

pub struct SettingsService {
    identity: Arc<dyn IdentityProvider>,
    repo: Arc<dyn ProfileRepository>,
    avatar: AvatarPipeline,
    config: SettingsConfig,
    profile: RwLock<Option<UserProfile>>,
    security: RwLock<Option<SecuritySettings>>,
    view: RwLock<ViewState>,
    editor: Mutex<EditController>,
    in_flight: InFlightRegistry,
    toasts: ToastQueue,
}

impl SettingsService {
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        repo: Arc<dyn ProfileRepository>,
        storage: Arc<dyn ObjectStorage>,
        config: SettingsConfig,
    ) -> Self {
        let avatar = AvatarPipeline::new(storage, config.avatar.clone());
        Self {
            identity,
            repo,
            avatar,
            config,
            profile: RwLock::new(None),
            security: RwLock::new(None),
            view: RwLock::new(ViewState::default()),
            editor: Mutex::new(EditController::new()),
            in_flight: InFlightRegistry::new(),
            toasts: ToastQueue::new(),
        }
    }

    // ---- snapshots ----------------------------------------------------

    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.read().clone()
    }

    #[must_use]
    pub fn security(&self) -> Option<SecuritySettings> {
        self.security.read().clone()
    }

    /// Always a complete flag set: defaults when nothing is loaded.
    #[must_use]
    pub fn notifications(&self) -> NotificationPreferences {
        self.profile
            .read()
            .as_ref()
            .map(|p| p.preferences.notifications.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn ui_state(&self) -> SettingsUiState {
        let view = self.view.read().clone();
        SettingsUiState {
            active_tab: view.active_tab,
            active_modal: view.active_modal,
            in_flight: self.in_flight.snapshot(),
            editing: self.editor.lock().snapshot(),
        }
    }

    #[must_use]
    pub fn toasts(&self) -> Vec<ToastNotification> {
        self.toasts.visible()
    }

    // ---- lifecycle ----------------------------------------------------

    /// Load the profile at session start and derive the read-only
    /// snapshots. Resets the view state and any in-progress edit.
    pub async fn load(&self) -> Result<UserProfile, SettingsError> {
        let session = self.require_session().await?;
        let profile = self
            .repo
            .find_by_id(session.user_id)
            .await
            .map_err(DomainError::from)?
            .ok_or(SettingsError::NotFound)?;

        *self.view.write() = ViewState::default();
        self.editor.lock().finish_commit();
        self.adopt_profile(&session, profile.clone());

        tracing::debug!(user_id = %session.user_id, "settings loaded");
        Ok(profile)
    }

    // ---- profile operations -------------------------------------------

    pub async fn update_profile(
        &self,
        patch: ProfilePatch,
    ) -> Result<UserProfile, SettingsError> {
        let result = self.update_profile_inner(patch).await;
        self.report(OperationKey::Profile, "Profile updated", ToastKind::Success, &result);
        result.map_err(Into::into)
    }

    async fn update_profile_inner(
        &self,
        mut patch: ProfilePatch,
    ) -> Result<UserProfile, DomainError> {
        let _guard = self.try_begin(OperationKey::Profile)?;
        let session = self.require_session_domain().await?;

        if let Some(name) = &patch.full_name {
            check(validation::validate_name(name))?;
        }
        if let Some(username) = &patch.username {
            check(validation::validate_username(username))?;
            patch.username = Some(validation::normalize_username(username));
        }
        if let Some(bio) = &patch.bio {
            check(validation::validate_bio(bio))?;
        }
        if patch.is_empty() {
            return self
                .profile()
                .ok_or(DomainError::NotFound);
        }

        let updated = self.repo.apply_patch(session.user_id, patch).await?;
        self.adopt_profile(&session, updated.clone());
        tracing::info!(user_id = %session.user_id, "profile updated");
        Ok(updated)
    }

    /// Validate, recompress and upload; the profile row points at the new
    /// URL only after the upload is confirmed.
    pub async fn upload_avatar(&self, upload: AvatarUpload) -> Result<String, SettingsError> {
        let result = self.upload_avatar_inner(upload).await;
        self.report(OperationKey::Avatar, "Avatar updated", ToastKind::Success, &result);
        result.map_err(Into::into)
    }

    async fn upload_avatar_inner(&self, upload: AvatarUpload) -> Result<String, DomainError> {
        let _guard = self.try_begin(OperationKey::Avatar)?;
        let session = self.require_session_domain().await?;

        let url = self.avatar.process(upload).await?;

        let patch = ProfilePatch {
            avatar_url: Some(url.clone()),
            ..ProfilePatch::default()
        };
        let updated = self.repo.apply_patch(session.user_id, patch).await?;
        self.adopt_profile(&session, updated);
        tracing::info!(user_id = %session.user_id, url = %url, "avatar linked");
        Ok(url)
    }

    pub async fn update_studio_theme(&self, theme: StudioTheme) -> Result<(), SettingsError> {
        let result = self.update_studio_theme_inner(theme).await;
        self.report(OperationKey::Theme, "Theme saved", ToastKind::Success, &result);
        result.map(|_| ()).map_err(Into::into)
    }

    async fn update_studio_theme_inner(
        &self,
        theme: StudioTheme,
    ) -> Result<UserProfile, DomainError> {
        let _guard = self.try_begin(OperationKey::Theme)?;
        let session = self.require_session_domain().await?;

        let mut prefs = self.current_preferences()?;
        prefs.studio_theme = theme;
        let updated = self.repo.update_preferences(session.user_id, prefs).await?;
        self.adopt_profile(&session, updated.clone());
        Ok(updated)
    }

    // ---- security operations ------------------------------------------

    /// Request an email change. The local email is not flipped: the change
    /// stays pending until the user confirms it out-of-band, so the UI gets
    /// an informational toast, not a success one.
    pub async fn change_email(
        &self,
        current_password: &str,
        new_email: &str,
    ) -> Result<(), SettingsError> {
        let result = self.change_email_inner(current_password, new_email).await;
        self.report(
            OperationKey::Email,
            "Confirmation sent. Check your new inbox to finish the change",
            ToastKind::Info,
            &result,
        );
        if result.is_ok() {
            self.set_active_modal(None);
        }
        result.map(|_| ()).map_err(Into::into)
    }

    async fn change_email_inner(
        &self,
        current_password: &str,
        new_email: &str,
    ) -> Result<UserProfile, DomainError> {
        let _guard = self.try_begin(OperationKey::Email)?;
        let session = self.require_session_domain().await?;

        check(validation::validate_email(new_email))?;

        self.identity
            .change_email(current_password, new_email)
            .await?;

        let mut prefs = self.current_preferences()?;
        prefs.security.last_email_change = Some(Utc::now());
        let updated = self.repo.update_preferences(session.user_id, prefs).await?;
        self.adopt_profile(&session, updated.clone());
        tracing::info!(user_id = %session.user_id, "email change requested");
        Ok(updated)
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), SettingsError> {
        let result = self
            .change_password_inner(current_password, new_password, confirm_password)
            .await;
        self.report(
            OperationKey::Password,
            "Password updated",
            ToastKind::Success,
            &result,
        );
        if result.is_ok() {
            self.set_active_modal(None);
        }
        result.map(|_| ()).map_err(Into::into)
    }

    async fn change_password_inner(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<UserProfile, DomainError> {
        let _guard = self.try_begin(OperationKey::Password)?;
        let session = self.require_session_domain().await?;

        check(validation::validate_password(new_password))?;
        if new_password != confirm_password {
            return Err(DomainError::validation(
                ProfileFields::CONFIRM_PASSWORD,
                "Passwords do not match",
            ));
        }

        self.identity
            .change_password(current_password, new_password)
            .await?;

        let mut prefs = self.current_preferences()?;
        prefs.security.last_password_change = Some(Utc::now());
        let updated = self.repo.update_preferences(session.user_id, prefs).await?;
        self.adopt_profile(&session, updated.clone());
        tracing::info!(user_id = %session.user_id, "password changed");
        Ok(updated)
    }

    /// Enroll one TOTP factor and mint ten single-use backup codes.
    pub async fn setup_2fa(
        &self,
        current_password: &str,
    ) -> Result<TwoFactorEnrollment, SettingsError> {
        let result = self.setup_2fa_inner(current_password).await;
        self.report(
            OperationKey::TwoFactor,
            "Two-factor authentication enabled",
            ToastKind::Success,
            &result,
        );
        result.map_err(Into::into)
    }

    async fn setup_2fa_inner(
        &self,
        current_password: &str,
    ) -> Result<TwoFactorEnrollment, DomainError> {
        let _guard = self.try_begin(OperationKey::TwoFactor)?;
        let session = self.require_session_domain().await?;

        let factor = self.identity.enroll_totp(current_password).await?;
        let backup_codes = generate_backup_codes();

        let mut prefs = self.current_preferences()?;
        prefs.security.two_factor_enabled = true;
        let updated = self.repo.update_preferences(session.user_id, prefs).await?;
        self.adopt_profile(&session, updated);
        tracing::info!(user_id = %session.user_id, factor_id = %factor.factor_id, "totp enrolled");

        Ok(TwoFactorEnrollment {
            provisioning_uri: factor.provisioning_uri,
            backup_codes,
        })
    }

    /// Schedule deletion after the grace period; no data is removed here.
    /// The purge is an external background job.
    pub async fn delete_account(&self, confirmation_text: &str) -> Result<(), SettingsError> {
        let grace = self.config.deletion_grace_hours;
        let result = self.delete_account_inner(confirmation_text).await;
        self.report(
            OperationKey::DeleteAccount,
            &format!("Account deletion scheduled. You have {grace} hours to change your mind"),
            ToastKind::Warning,
            &result,
        );
        if result.is_ok() {
            self.set_active_modal(None);
        }
        result.map(|_| ()).map_err(Into::into)
    }

    async fn delete_account_inner(
        &self,
        confirmation_text: &str,
    ) -> Result<UserProfile, DomainError> {
        let _guard = self.try_begin(OperationKey::DeleteAccount)?;
        let session = self.require_session_domain().await?;

        check(validation::validate_deletion_confirmation(confirmation_text))?;

        let mut prefs = self.current_preferences()?;
        prefs.scheduled_deletion_at =
            Some(Utc::now() + chrono::Duration::hours(self.config.deletion_grace_hours));
        let updated = self.repo.update_preferences(session.user_id, prefs).await?;
        self.adopt_profile(&session, updated.clone());
        tracing::warn!(user_id = %session.user_id, "account deletion scheduled");
        Ok(updated)
    }

    // ---- notification preferences -------------------------------------

    /// Overlay the patch on the complete current set and persist the whole
    /// merged object, never a diff.
    pub async fn update_notifications(
        &self,
        patch: NotificationPreferencesPatch,
    ) -> Result<NotificationPreferences, SettingsError> {
        let result = self.update_notifications_inner(patch).await;
        self.report(
            OperationKey::Notifications,
            "Notification preferences saved",
            ToastKind::Success,
            &result,
        );
        result.map_err(Into::into)
    }

    async fn update_notifications_inner(
        &self,
        patch: NotificationPreferencesPatch,
    ) -> Result<NotificationPreferences, DomainError> {
        let _guard = self.try_begin(OperationKey::Notifications)?;
        let session = self.require_session_domain().await?;

        let mut prefs = self.current_preferences()?;
        let merged = preferences::merge(&prefs.notifications, &patch);
        prefs.notifications = merged.clone();
        let updated = self.repo.update_preferences(session.user_id, prefs).await?;
        self.adopt_profile(&session, updated);
        Ok(merged)
    }

    // ---- inline editing -----------------------------------------------

    /// Enter editing for one field, capturing the current value as the
    /// rollback target. Refuses while another field is active.
    pub fn begin_edit(&self, field: EditableField) -> Result<(), SettingsError> {
        let current = self.field_value(field)?;
        self.editor
            .lock()
            .begin(field, &current)
            .map_err(|e| edit_error(field, &e))
    }

    /// Explicitly discard any in-progress edit and start editing `field`.
    pub fn begin_edit_discarding(&self, field: EditableField) -> Result<(), SettingsError> {
        let current = self.field_value(field)?;
        self.editor
            .lock()
            .begin_discarding(field, &current)
            .map_err(|e| edit_error(field, &e))
    }

    pub fn set_edit_value(&self, value: &str) {
        self.editor.lock().set_value(value);
    }

    /// Drop the attempted value and return to viewing.
    pub fn cancel_edit(&self) {
        self.editor.lock().cancel();
    }

    /// Commit the active edit. Unchanged values are a no-op; save failures
    /// keep the field in editing with the attempted value and an inline
    /// error, and are never toasted.
    pub async fn commit_edit(&self) -> Result<(), SettingsError> {
        let (field, value) = {
            let mut editor = self.editor.lock();
            let Some(snapshot) = editor.snapshot() else {
                return Err(SettingsError::validation("edit", "No edit in progress"));
            };

            let report = validate_field(snapshot.field, &snapshot.value);
            if !report.is_valid() {
                let message = report.first_message().unwrap_or("Invalid value").to_owned();
                editor.reject(message.clone());
                return Err(edit_validation(snapshot.field, message));
            }

            match editor.start_commit().map_err(|e| edit_error(snapshot.field, &e))? {
                CommitAction::Unchanged => return Ok(()),
                CommitAction::Save { field, value } => (field, value),
            }
        };

        match self.save_field(field, value).await {
            Ok(()) => {
                self.editor.lock().finish_commit();
                self.toasts.push(
                    ToastKind::Success,
                    "Profile updated",
                    self.default_toast_duration(),
                );
                Ok(())
            }
            Err(e) => {
                let message = inline_message(&e);
                self.editor.lock().fail_commit(message.clone());
                tracing::warn!(?field, error = %e, "inline save failed");
                Err(edit_validation(field, message))
            }
        }
    }

    async fn save_field(&self, field: EditableField, value: String) -> Result<(), DomainError> {
        let _guard = self.try_begin(OperationKey::Profile)?;
        let session = self.require_session_domain().await?;

        let mut patch = ProfilePatch::default();
        match field {
            EditableField::FullName => patch.full_name = Some(value),
            EditableField::Username => {
                patch.username = Some(validation::normalize_username(&value));
            }
            EditableField::Bio => patch.bio = Some(value),
        }
        let updated = self.repo.apply_patch(session.user_id, patch).await?;
        self.adopt_profile(&session, updated);
        tracing::info!(user_id = %session.user_id, ?field, "field committed");
        Ok(())
    }

    // ---- view state and toasts ----------------------------------------

    pub fn set_active_tab(&self, tab: SettingsTab) {
        self.view.write().active_tab = tab;
    }

    pub fn set_active_modal(&self, modal: Option<SettingsModal>) {
        self.view.write().active_modal = modal;
    }

    pub fn show_toast(&self, kind: ToastKind, message: &str) -> Uuid {
        self.toasts.push(kind, message, self.default_toast_duration())
    }

    pub fn show_toast_with_duration(
        &self,
        kind: ToastKind,
        message: &str,
        duration: Duration,
    ) -> Uuid {
        self.toasts.push(kind, message, duration)
    }

    pub fn dismiss_toast(&self, id: Uuid) {
        self.toasts.dismiss(id);
    }

    /// Tear down session-lifetime state when the view goes away.
    pub fn reset(&self) {
        *self.view.write() = ViewState::default();
        self.editor.lock().finish_commit();
        self.toasts.clear();
    }

    // ---- helpers ------------------------------------------------------

    fn try_begin(&self, key: OperationKey) -> Result<super::inflight::InFlightGuard, DomainError> {
        self.in_flight.try_begin(key).map_err(DomainError::Busy)
    }

    async fn require_session(&self) -> Result<Session, SettingsError> {
        self.require_session_domain().await.map_err(Into::into)
    }

    async fn require_session_domain(&self) -> Result<Session, DomainError> {
        self.identity
            .current_session()
            .await
            .map_err(DomainError::from)?
            .ok_or(DomainError::Unauthenticated)
    }

    fn current_preferences(&self) -> Result<Preferences, DomainError> {
        self.profile
            .read()
            .as_ref()
            .map(|p| p.preferences.clone())
            .ok_or(DomainError::NotFound)
    }

    fn field_value(&self, field: EditableField) -> Result<String, SettingsError> {
        let profile = self.profile.read();
        let profile = profile.as_ref().ok_or(SettingsError::NotFound)?;
        Ok(match field {
            EditableField::FullName => profile.full_name.clone(),
            EditableField::Username => profile.username.clone(),
            EditableField::Bio => profile.bio.clone(),
        })
    }

    /// Adopt a stored row as the new snapshot and re-derive the read-only
    /// security view.
    fn adopt_profile(&self, session: &Session, profile: UserProfile) {
        *self.security.write() = Some(SecuritySettings {
            email: session.email.clone(),
            has_password: session.has_password,
            two_factor_enabled: profile.preferences.security.two_factor_enabled,
            last_password_change: profile.preferences.security.last_password_change,
            last_email_change: profile.preferences.security.last_email_change,
        });
        *self.profile.write() = Some(profile);
    }

    /// One toast per finished operation: the given kind on success, an
    /// error toast on failure. Field-scoped validation failures render
    /// inline instead and get no toast at all.
    fn report<T>(
        &self,
        operation: OperationKey,
        success_message: &str,
        success_kind: ToastKind,
        result: &Result<T, DomainError>,
    ) {
        match result {
            Ok(_) => {
                self.toasts
                    .push(success_kind, success_message, self.default_toast_duration());
            }
            Err(DomainError::Validation { .. }) => {}
            Err(e) => {
                tracing::warn!(operation = operation.as_str(), error = %e, "operation failed");
                self.toasts.push(
                    ToastKind::Error,
                    toast_message(e),
                    self.default_toast_duration(),
                );
            }
        }
    }

    fn default_toast_duration(&self) -> Duration {
        Duration::from_millis(self.config.toast.default_duration_ms)
    }
}

fn check(report: validation::ValidationReport) -> Result<(), DomainError> {
    match report.errors.into_iter().next() {
        None => Ok(()),
        Some((field, message)) => Err(DomainError::validation(field, message)),
    }
}

fn validate_field(field: EditableField, value: &str) -> validation::ValidationReport {
    match field {
        EditableField::FullName => validation::validate_name(value),
        EditableField::Username => validation::validate_username(value),
        EditableField::Bio => validation::validate_bio(value),
    }
}

fn field_name(field: EditableField) -> &'static str {
    match field {
        EditableField::FullName => ProfileFields::FULL_NAME,
        EditableField::Username => ProfileFields::USERNAME,
        EditableField::Bio => ProfileFields::BIO,
    }
}

fn edit_validation(field: EditableField, message: impl Into<String>) -> SettingsError {
    SettingsError::validation(field_name(field), message)
}

fn edit_error(field: EditableField, e: &EditError) -> SettingsError {
    edit_validation(field, e.to_string())
}

/// End-user phrasing for non-validation failures; causes stay in the logs.
fn toast_message(e: &DomainError) -> String {
    match e {
        DomainError::Conflict { message } | DomainError::CapabilityUnavailable { message } => {
            message.clone()
        }
        DomainError::Busy(_) => "Please wait for the current operation to finish".to_owned(),
        DomainError::Unauthenticated => "Your session has expired. Sign in again".to_owned(),
        DomainError::NotFound => "Profile not found".to_owned(),
        DomainError::Validation { .. } | DomainError::Storage(_) => {
            "Something went wrong. Try again".to_owned()
        }
    }
}

/// Inline wording for a failed field save.
fn inline_message(e: &DomainError) -> String {
    match e {
        DomainError::Validation { message, .. } | DomainError::Conflict { message } => {
            message.clone()
        }
        DomainError::Busy(_) => "Another save is in progress".to_owned(),
        _ => "Could not save. Try again".to_owned(),
    }
}

fn generate_backup_codes() -> Vec<String> {
    let mut rng = rand::rng();
    (0..BACKUP_CODE_COUNT)
        .map(|_| {
            (0..BACKUP_CODE_LEN)
                .map(|_| {
                    let idx = rng.random_range(0..BACKUP_CODE_CHARSET.len());
                    BACKUP_CODE_CHARSET[idx] as char
                })
                .collect()
        })
        .collect()
}
