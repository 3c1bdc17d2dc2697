//! Account Settings Module Implementation
//!
//! The public API is defined in `account-settings-sdk` and re-exported here.

pub use account_settings_sdk::{
    AccountSettingsApi, AvatarUpload, NotificationPreferences, NotificationPreferencesPatch,
    Preferences, ProfilePatch, SecuritySettings, SettingsError, SettingsUiState, StudioTheme,
    ToastKind, ToastNotification, TwoFactorEnrollment, UserProfile,
};

pub mod local_client;
pub use local_client::LocalClient;

#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
