//! Account Settings SDK
//!
//! This crate provides the public contract for the account settings module:
//! - `AccountSettingsApi` trait for the presentation shell
//! - Model types (`UserProfile`, `Preferences`, patches, UI state)
//! - Error type (`SettingsError`)
//!
//! The implementation crate re-exports everything here and adds the
//! in-process `LocalClient`.

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::AccountSettingsApi;
pub use errors::SettingsError;
pub use models::{
    ActiveEditSnapshot, AvatarUpload, EditPhase, EditableField, NotificationPreferences,
    NotificationPreferencesPatch, OperationKey, Preferences, ProfilePatch, SecurityMetadata,
    SecuritySettings, SettingsModal, SettingsTab, SettingsUiState, StudioTheme, ToastKind,
    ToastNotification, TwoFactorEnrollment, UserProfile,
};
