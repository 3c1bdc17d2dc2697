//! Notification preference merging.
//!
//! The read path always yields a complete flag set (serde defaults fill the
//! gaps); the write path persists the entire merged object, never a diff.

use account_settings_sdk::models::{NotificationPreferences, NotificationPreferencesPatch};

/// Right-biased merge: patch values win on collision. `security_alerts` has
/// no patch field and stays pinned to true whatever the stored value says.
#[must_use]
pub fn merge(
    current: &NotificationPreferences,
    patch: &NotificationPreferencesPatch,
) -> NotificationPreferences {
    NotificationPreferences {
        email_notifications: patch
            .email_notifications
            .unwrap_or(current.email_notifications),
        push_notifications: patch
            .push_notifications
            .unwrap_or(current.push_notifications),
        weekly_reports: patch.weekly_reports.unwrap_or(current.weekly_reports),
        marketing_emails: patch.marketing_emails.unwrap_or(current.marketing_emails),
        progress_updates: patch.progress_updates.unwrap_or(current.progress_updates),
        new_features: patch.new_features.unwrap_or(current.new_features),
        security_alerts: true,
    }
}

/// Union of two patches, right-biased: `b` wins on overlapping keys.
#[must_use]
pub fn merge_patches(
    a: &NotificationPreferencesPatch,
    b: &NotificationPreferencesPatch,
) -> NotificationPreferencesPatch {
    NotificationPreferencesPatch {
        email_notifications: b.email_notifications.or(a.email_notifications),
        push_notifications: b.push_notifications.or(a.push_notifications),
        weekly_reports: b.weekly_reports.or(a.weekly_reports),
        marketing_emails: b.marketing_emails.or(a.marketing_emails),
        progress_updates: b.progress_updates.or(a.progress_updates),
        new_features: b.new_features.or(a.new_features),
    }
}
