//! Public models for the account settings module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the settings module and its consumers. Persistent types carry
//! serde derives because the profile store keeps them in a single JSON
//! `preferences` column; session-lifetime types (toasts, UI state) do not.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User profile entity, one record per user in the profile store.
///
/// Created when the identity account is created; this module never deletes
/// it, only schedules deletion through [`Preferences::scheduled_deletion_at`].
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: String,
    /// Normalized handle: `@` followed by 3-30 chars of `[A-Za-z0-9_]`.
    pub username: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub preferences: Preferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for profile columns. `None` means "leave unchanged".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfilePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.username.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
    }
}

/// Versioned, strongly typed preferences record.
///
/// Stored as one JSON object in the profile store's `preferences` column.
/// Unknown keys survive round-trips through `extra`, so adding a setting
/// never requires a storage migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub studio_theme: StudioTheme,
    #[serde(default)]
    pub notifications: NotificationPreferences,
    #[serde(default)]
    pub security: SecurityMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_deletion_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            studio_theme: StudioTheme::default(),
            notifications: NotificationPreferences::default(),
            security: SecurityMetadata::default(),
            scheduled_deletion_at: None,
            extra: BTreeMap::new(),
        }
    }
}

fn default_schema_version() -> u32 {
    1
}

/// Persisted theme choice. Display is the shell's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudioTheme {
    #[default]
    Dark,
    Light,
    System,
}

/// Security metadata kept alongside the profile rather than in the identity
/// provider, which does not expose change timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SecurityMetadata {
    #[serde(default)]
    pub two_factor_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_password_change: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_email_change: Option<DateTime<Utc>>,
}

/// Flat notification flags. The read path always yields the complete set:
/// missing keys deserialize to these defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default = "default_true")]
    pub push_notifications: bool,
    #[serde(default = "default_true")]
    pub weekly_reports: bool,
    #[serde(default)]
    pub marketing_emails: bool,
    #[serde(default = "default_true")]
    pub progress_updates: bool,
    #[serde(default = "default_true")]
    pub new_features: bool,
    /// Immutable: always true. There is no patch field for it.
    #[serde(default = "default_true")]
    pub security_alerts: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: true,
            weekly_reports: true,
            marketing_emails: false,
            progress_updates: true,
            new_features: true,
            security_alerts: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Partial update for notification flags. `security_alerts` is deliberately
/// absent: it cannot be turned off.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationPreferencesPatch {
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub weekly_reports: Option<bool>,
    pub marketing_emails: Option<bool>,
    pub progress_updates: Option<bool>,
    pub new_features: Option<bool>,
}

/// Derived, read-only security snapshot. Recomputed after every security
/// operation; never written to directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecuritySettings {
    pub email: String,
    pub has_password: bool,
    pub two_factor_enabled: bool,
    pub last_password_change: Option<DateTime<Utc>>,
    pub last_email_change: Option<DateTime<Utc>>,
}

/// Result of a successful TOTP enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoFactorEnrollment {
    /// `otpauth://` provisioning URI for the authenticator app.
    pub provisioning_uri: String,
    /// Ten single-use recovery codes, shown exactly once.
    pub backup_codes: Vec<String>,
}

/// Raw bytes handed over by the shell's file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Ephemeral user-facing message. Session-lifetime only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastNotification {
    pub id: Uuid,
    pub kind: ToastKind,
    pub message: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsTab {
    #[default]
    Profile,
    Security,
    Notifications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsModal {
    ChangeEmail,
    ChangePassword,
    TwoFactorSetup,
    DeleteAccount,
}

/// Profile fields that support inline editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    FullName,
    Username,
    Bio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Editing,
    Saving,
}

/// Snapshot of the single active inline edit, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEditSnapshot {
    pub field: EditableField,
    pub phase: EditPhase,
    /// Value captured when the edit began; restored on cancel.
    pub original: String,
    /// Current attempted value.
    pub value: String,
    /// Inline save/validation error, rendered next to the field.
    pub error: Option<String>,
}

/// Keys for the per-operation in-flight registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OperationKey {
    Profile,
    Avatar,
    Email,
    Password,
    TwoFactor,
    DeleteAccount,
    Notifications,
    Theme,
}

impl OperationKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Avatar => "avatar",
            Self::Email => "email",
            Self::Password => "password",
            Self::TwoFactor => "two_factor",
            Self::DeleteAccount => "delete_account",
            Self::Notifications => "notifications",
            Self::Theme => "theme",
        }
    }
}

/// View-facing UI state. Reset when the settings view loads; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsUiState {
    pub active_tab: SettingsTab,
    pub active_modal: Option<SettingsModal>,
    /// Operation keys currently in flight, in key order.
    pub in_flight: Vec<OperationKey>,
    pub editing: Option<ActiveEditSnapshot>,
}
