#[cfg(test)]
mod tests {
    use account_settings_sdk::models::{NotificationPreferences, NotificationPreferencesPatch};

    use super::super::preferences::{merge, merge_patches};

    #[test]
    fn patch_values_win_on_collision() {
        let current = NotificationPreferences::default();
        let patch = NotificationPreferencesPatch {
            marketing_emails: Some(true),
            weekly_reports: Some(false),
            ..NotificationPreferencesPatch::default()
        };

        let merged = merge(&current, &patch);

        assert!(merged.marketing_emails);
        assert!(!merged.weekly_reports);
        // Untouched flags keep their current values.
        assert!(merged.email_notifications);
        assert!(merged.push_notifications);
    }

    #[test]
    fn sequential_merges_equal_one_merged_patch() {
        let a = NotificationPreferencesPatch {
            email_notifications: Some(false),
            weekly_reports: Some(false),
            ..NotificationPreferencesPatch::default()
        };
        let b = NotificationPreferencesPatch {
            weekly_reports: Some(true),
            progress_updates: Some(false),
            ..NotificationPreferencesPatch::default()
        };

        let current = NotificationPreferences::default();
        let sequential = merge(&merge(&current, &a), &b);
        let combined = merge(&current, &merge_patches(&a, &b));

        assert_eq!(sequential, combined);
        // b wins on the overlapping key.
        assert!(sequential.weekly_reports);
    }

    #[test]
    fn security_alerts_cannot_be_disabled() {
        let mut current = NotificationPreferences::default();
        current.security_alerts = false; // corrupt stored state

        let merged = merge(&current, &NotificationPreferencesPatch::default());

        assert!(merged.security_alerts);
    }

    #[test]
    fn empty_patch_is_identity_apart_from_the_pinned_flag() {
        let current = NotificationPreferences {
            email_notifications: false,
            marketing_emails: true,
            ..NotificationPreferences::default()
        };

        let merged = merge(&current, &NotificationPreferencesPatch::default());

        assert_eq!(merged, current);
    }
}
