#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;
    use parking_lot::Mutex;
    use uuid::Uuid;

    use account_settings_sdk::errors::SettingsError;
    use account_settings_sdk::models::{
        EditableField, NotificationPreferencesPatch, Preferences, ProfilePatch, SettingsModal,
        StudioTheme, ToastKind, UserProfile,
    };

    use super::super::ports::{
        IdentityError, IdentityProvider, ObjectStorage, Session, StorageError, TotpFactor,
    };
    use super::super::repo::{ProfileRepository, RepoError};
    use super::super::service::SettingsService;
    use crate::config::SettingsConfig;

    const USER_ID: Uuid = Uuid::from_u128(0x1234_5678_9abc_def0_1234_5678_9abc_def0);

    fn fixture_profile() -> UserProfile {
        UserProfile {
            id: USER_ID,
            full_name: "Ada Lovelace".to_owned(),
            username: "@ada".to_owned(),
            bio: "Hello world".to_owned(),
            avatar_url: None,
            preferences: Preferences::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[derive(Default)]
    struct MockIdentity {
        no_session: bool,
        wrong_password: bool,
        duplicate_email: bool,
        totp_unavailable: bool,
        /// Paused-clock delay before password changes resolve.
        password_delay: Option<Duration>,
        calls: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl IdentityProvider for MockIdentity {
        async fn current_session(&self) -> Result<Option<Session>, IdentityError> {
            if self.no_session {
                return Ok(None);
            }
            Ok(Some(Session {
                user_id: USER_ID,
                email: "ada@example.com".to_owned(),
                has_password: true,
            }))
        }

        async fn change_email(
            &self,
            _current_password: &str,
            _new_email: &str,
        ) -> Result<(), IdentityError> {
            self.calls.lock().push("change_email");
            if self.wrong_password {
                return Err(IdentityError::InvalidCredentials);
            }
            if self.duplicate_email {
                return Err(IdentityError::DuplicateEmail);
            }
            Ok(())
        }

        async fn change_password(
            &self,
            _current_password: &str,
            _new_password: &str,
        ) -> Result<(), IdentityError> {
            self.calls.lock().push("change_password");
            if let Some(delay) = self.password_delay {
                tokio::time::sleep(delay).await;
            }
            if self.wrong_password {
                return Err(IdentityError::InvalidCredentials);
            }
            Ok(())
        }

        async fn enroll_totp(&self, _current_password: &str) -> Result<TotpFactor, IdentityError> {
            self.calls.lock().push("enroll_totp");
            if self.totp_unavailable {
                return Err(IdentityError::CapabilityUnavailable(
                    "Two-factor authentication is not enabled for this project".to_owned(),
                ));
            }
            Ok(TotpFactor {
                factor_id: "factor-1".to_owned(),
                provisioning_uri: "otpauth://totp/studio:ada?secret=ABC123".to_owned(),
            })
        }
    }

    #[derive(Default)]
    struct NoopStorage;

    #[async_trait]
    impl ObjectStorage for NoopStorage {
        async fn put(
            &self,
            _bucket: &str,
            _key: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<(), StorageError> {
            Ok(())
        }

        fn public_url(&self, bucket: &str, key: &str) -> String {
            format!("https://cdn.example.com/{bucket}/{key}")
        }
    }

    struct MockRepository {
        profile: Mutex<UserProfile>,
        username_conflict: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl MockRepository {
        fn new() -> Self {
            Self {
                profile: Mutex::new(fixture_profile()),
                username_conflict: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_username_conflict() -> Self {
            Self {
                username_conflict: true,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl ProfileRepository for MockRepository {
        async fn find_by_id(&self, _user_id: Uuid) -> Result<Option<UserProfile>, RepoError> {
            Ok(Some(self.profile.lock().clone()))
        }

        async fn apply_patch(
            &self,
            _user_id: Uuid,
            patch: ProfilePatch,
        ) -> Result<UserProfile, RepoError> {
            self.calls.lock().push("apply_patch");
            if self.username_conflict && patch.username.is_some() {
                return Err(RepoError::Conflict { field: "username" });
            }
            let mut profile = self.profile.lock();
            if let Some(full_name) = patch.full_name {
                profile.full_name = full_name;
            }
            if let Some(username) = patch.username {
                profile.username = username;
            }
            if let Some(bio) = patch.bio {
                profile.bio = bio;
            }
            if let Some(avatar_url) = patch.avatar_url {
                profile.avatar_url = Some(avatar_url);
            }
            profile.updated_at = Utc::now();
            Ok(profile.clone())
        }

        async fn update_preferences(
            &self,
            _user_id: Uuid,
            preferences: Preferences,
        ) -> Result<UserProfile, RepoError> {
            self.calls.lock().push("update_preferences");
            let mut profile = self.profile.lock();
            profile.preferences = preferences;
            profile.updated_at = Utc::now();
            Ok(profile.clone())
        }
    }

    fn service_with(identity: MockIdentity, repo: MockRepository) -> SettingsService {
        SettingsService::new(
            Arc::new(identity),
            Arc::new(repo),
            Arc::new(NoopStorage),
            SettingsConfig::default(),
        )
    }

    async fn loaded_service() -> SettingsService {
        let service = service_with(MockIdentity::default(), MockRepository::new());
        service.load().await.unwrap();
        service
    }

    fn has_toast(service: &SettingsService, kind: ToastKind) -> bool {
        service.toasts().iter().any(|t| t.kind == kind)
    }

    // ---- load and snapshots -------------------------------------------

    #[tokio::test]
    async fn load_populates_all_snapshots() {
        let service = loaded_service().await;

        let profile = service.profile().unwrap();
        assert_eq!(profile.username, "@ada");

        let security = service.security().unwrap();
        assert_eq!(security.email, "ada@example.com");
        assert!(security.has_password);
        assert!(!security.two_factor_enabled);

        assert!(service.notifications().email_notifications);
        assert!(service.ui_state().in_flight.is_empty());
    }

    #[tokio::test]
    async fn load_without_a_session_is_unauthenticated() {
        let service = service_with(
            MockIdentity {
                no_session: true,
                ..MockIdentity::default()
            },
            MockRepository::new(),
        );

        assert_eq!(service.load().await.unwrap_err(), SettingsError::Unauthenticated);
        assert!(service.profile().is_none());
    }

    // ---- profile updates ----------------------------------------------

    #[tokio::test]
    async fn update_profile_normalizes_the_username() {
        let service = loaded_service().await;

        let updated = service
            .update_profile(ProfilePatch {
                username: Some("lovelace".to_owned()),
                ..ProfilePatch::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.username, "@lovelace");
        assert!(has_toast(&service, ToastKind::Success));
    }

    #[tokio::test]
    async fn update_profile_rejects_an_oversized_bio_inline() {
        let service = loaded_service().await;

        let err = service
            .update_profile(ProfilePatch {
                bio: Some("b".repeat(161)),
                ..ProfilePatch::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SettingsError::Validation { ref field, .. } if field == "bio"));
        // Validation failures render inline, never as a toast.
        assert!(service.toasts().is_empty());
    }

    #[tokio::test]
    async fn theme_choice_is_persisted_through_preferences() {
        let service = loaded_service().await;

        service.update_studio_theme(StudioTheme::Light).await.unwrap();

        let profile = service.profile().unwrap();
        assert_eq!(profile.preferences.studio_theme, StudioTheme::Light);
    }

    // ---- inline editing -----------------------------------------------

    #[tokio::test]
    async fn escape_before_saving_reverts_the_bio() {
        let service = loaded_service().await;

        service.begin_edit(EditableField::Bio).unwrap();
        service.set_edit_value("Hello");
        service.cancel_edit();

        assert_eq!(service.profile().unwrap().bio, "Hello world");
        assert!(service.ui_state().editing.is_none());
    }

    #[tokio::test]
    async fn commit_saves_a_changed_bio() {
        let service = loaded_service().await;

        service.begin_edit(EditableField::Bio).unwrap();
        service.set_edit_value("Composer of algorithms");
        service.commit_edit().await.unwrap();

        assert_eq!(service.profile().unwrap().bio, "Composer of algorithms");
        assert!(service.ui_state().editing.is_none());
        assert!(has_toast(&service, ToastKind::Success));
    }

    #[tokio::test]
    async fn unchanged_commit_makes_no_backend_call() {
        let repo = Arc::new(MockRepository::new());
        let service = SettingsService::new(
            Arc::new(MockIdentity::default()),
            Arc::clone(&repo) as Arc<dyn ProfileRepository>,
            Arc::new(NoopStorage),
            SettingsConfig::default(),
        );
        service.load().await.unwrap();

        service.begin_edit(EditableField::Bio).unwrap();
        service.commit_edit().await.unwrap();

        assert!(service.ui_state().editing.is_none());
        assert!(repo.calls.lock().is_empty());
        assert!(service.toasts().is_empty());
    }

    #[tokio::test]
    async fn username_conflict_stays_inline_with_the_attempted_value() {
        let service = service_with(MockIdentity::default(), MockRepository::with_username_conflict());
        service.load().await.unwrap();

        service.begin_edit(EditableField::Username).unwrap();
        service.set_edit_value("@taken");
        let err = service.commit_edit().await.unwrap_err();

        assert!(matches!(err, SettingsError::Validation { .. }));
        let editing = service.ui_state().editing.unwrap();
        assert_eq!(editing.value, "@taken");
        assert!(editing.error.unwrap().contains("already taken"));
        // Save failures never toast.
        assert!(service.toasts().is_empty());
        // Original value still displayed in the profile snapshot.
        assert_eq!(service.profile().unwrap().username, "@ada");
    }

    #[tokio::test]
    async fn editing_a_second_field_requires_discarding() {
        let service = loaded_service().await;

        service.begin_edit(EditableField::Bio).unwrap();
        assert!(service.begin_edit(EditableField::FullName).is_err());

        service.begin_edit_discarding(EditableField::FullName).unwrap();
        assert_eq!(
            service.ui_state().editing.unwrap().field,
            EditableField::FullName
        );
    }

    // ---- security operations ------------------------------------------

    #[tokio::test]
    async fn password_change_stamps_the_timestamp() {
        let service = loaded_service().await;
        let before = Utc::now();

        service
            .change_password("abc", "Passw0rd!", "Passw0rd!")
            .await
            .unwrap();

        let security = service.security().unwrap();
        let stamped = security.last_password_change.unwrap();
        assert!(stamped >= before && stamped <= Utc::now());
        assert!(has_toast(&service, ToastKind::Success));
    }

    #[tokio::test]
    async fn password_mismatch_never_reaches_the_identity_provider() {
        let identity = Arc::new(MockIdentity::default());
        let service = SettingsService::new(
            Arc::clone(&identity) as Arc<dyn IdentityProvider>,
            Arc::new(MockRepository::new()),
            Arc::new(NoopStorage),
            SettingsConfig::default(),
        );
        service.load().await.unwrap();

        let err = service
            .change_password("abc", "Passw0rd!", "Different1!")
            .await
            .unwrap_err();

        assert!(
            matches!(err, SettingsError::Validation { ref field, .. } if field == "confirm_password")
        );
        assert!(!identity.calls.lock().contains(&"change_password"));
        assert!(service.security().unwrap().last_password_change.is_none());
    }

    #[tokio::test]
    async fn weak_password_is_rejected_before_any_call() {
        let service = loaded_service().await;

        let err = service
            .change_password("abc", "weakpass", "weakpass")
            .await
            .unwrap_err();

        assert!(matches!(err, SettingsError::Validation { ref field, .. } if field == "new_password"));
    }

    #[tokio::test]
    async fn wrong_current_password_is_reported_generically() {
        let identity = MockIdentity {
            wrong_password: true,
            ..MockIdentity::default()
        };
        let service = service_with(identity, MockRepository::new());
        service.load().await.unwrap();

        let err = service
            .change_password("nope", "Passw0rd!", "Passw0rd!")
            .await
            .unwrap_err();

        let SettingsError::Validation { field, message } = err else {
            panic!("expected a field-scoped error");
        };
        assert_eq!(field, "current_password");
        assert_eq!(message, "Invalid credentials");
    }

    #[tokio::test]
    async fn malformed_email_fails_without_a_backend_call() {
        let identity = Arc::new(MockIdentity::default());
        let service = SettingsService::new(
            Arc::clone(&identity) as Arc<dyn IdentityProvider>,
            Arc::new(MockRepository::new()),
            Arc::new(NoopStorage),
            SettingsConfig::default(),
        );
        service.load().await.unwrap();

        let err = service.change_email("abc", "not-an-email").await.unwrap_err();

        assert!(matches!(err, SettingsError::Validation { ref field, .. } if field == "email"));
        assert!(identity.calls.lock().is_empty());
        assert!(service.toasts().is_empty());
    }

    #[tokio::test]
    async fn email_change_stays_pending_with_an_info_toast() {
        let service = loaded_service().await;
        service.set_active_modal(Some(SettingsModal::ChangeEmail));

        service.change_email("abc", "new@example.com").await.unwrap();

        // Not flipped locally: still the confirmed address.
        assert_eq!(service.security().unwrap().email, "ada@example.com");
        assert!(service.security().unwrap().last_email_change.is_some());
        assert!(has_toast(&service, ToastKind::Info));
        assert!(!has_toast(&service, ToastKind::Success));
        assert!(service.ui_state().active_modal.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_maps_to_conflict() {
        let identity = MockIdentity {
            duplicate_email: true,
            ..MockIdentity::default()
        };
        let service = service_with(identity, MockRepository::new());
        service.load().await.unwrap();

        let err = service.change_email("abc", "taken@example.com").await.unwrap_err();

        assert!(matches!(err, SettingsError::Conflict { .. }));
        assert!(has_toast(&service, ToastKind::Error));
    }

    #[tokio::test]
    async fn totp_enrollment_returns_ten_backup_codes() {
        let service = loaded_service().await;

        let enrollment = service.setup_2fa("abc").await.unwrap();

        assert!(enrollment.provisioning_uri.starts_with("otpauth://"));
        assert_eq!(enrollment.backup_codes.len(), 10);
        for code in &enrollment.backup_codes {
            assert_eq!(code.len(), 8);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
        assert!(service.security().unwrap().two_factor_enabled);
    }

    #[tokio::test]
    async fn missing_mfa_capability_is_not_a_generic_failure() {
        let identity = MockIdentity {
            totp_unavailable: true,
            ..MockIdentity::default()
        };
        let service = service_with(identity, MockRepository::new());
        service.load().await.unwrap();

        let err = service.setup_2fa("abc").await.unwrap_err();

        assert!(matches!(err, SettingsError::CapabilityUnavailable { .. }));
        assert!(!service.security().unwrap().two_factor_enabled);
    }

    #[tokio::test]
    async fn deletion_requires_the_exact_confirmation_token() {
        let repo = MockRepository::new();
        let service = service_with(MockIdentity::default(), repo);
        service.load().await.unwrap();

        let err = service.delete_account("excluir").await.unwrap_err();
        assert!(matches!(err, SettingsError::Validation { .. }));
        assert!(service.profile().unwrap().preferences.scheduled_deletion_at.is_none());

        service.delete_account("EXCLUIR").await.unwrap();

        let scheduled = service
            .profile()
            .unwrap()
            .preferences
            .scheduled_deletion_at
            .unwrap();
        let hours = (scheduled - Utc::now()).num_minutes() as f64 / 60.0;
        assert!((23.9..=24.1).contains(&hours));
        assert!(has_toast(&service, ToastKind::Warning));
    }

    // ---- notification preferences -------------------------------------

    #[tokio::test]
    async fn sequential_updates_equal_one_combined_update() {
        let a = NotificationPreferencesPatch {
            email_notifications: Some(false),
            weekly_reports: Some(false),
            ..NotificationPreferencesPatch::default()
        };
        let b = NotificationPreferencesPatch {
            weekly_reports: Some(true),
            marketing_emails: Some(true),
            ..NotificationPreferencesPatch::default()
        };
        let combined = NotificationPreferencesPatch {
            email_notifications: Some(false),
            weekly_reports: Some(true),
            marketing_emails: Some(true),
            ..NotificationPreferencesPatch::default()
        };

        let sequential = loaded_service().await;
        sequential.update_notifications(a).await.unwrap();
        sequential.update_notifications(b).await.unwrap();

        let single = loaded_service().await;
        single.update_notifications(combined).await.unwrap();

        assert_eq!(sequential.notifications(), single.notifications());
        assert!(sequential.notifications().security_alerts);
    }

    #[tokio::test]
    async fn preferences_write_persists_the_complete_object() {
        let service = loaded_service().await;

        service
            .update_notifications(NotificationPreferencesPatch {
                marketing_emails: Some(true),
                ..NotificationPreferencesPatch::default()
            })
            .await
            .unwrap();

        let stored = service.profile().unwrap().preferences.notifications;
        assert!(stored.marketing_emails);
        // The untouched flags were written out too, not just the diff.
        assert!(stored.email_notifications);
        assert!(stored.security_alerts);
    }

    // ---- concurrency ---------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn same_key_reentrancy_fails_fast_with_busy() {
        let identity = MockIdentity {
            password_delay: Some(Duration::from_secs(1)),
            ..MockIdentity::default()
        };
        let service = Arc::new(service_with(identity, MockRepository::new()));
        service.load().await.unwrap();

        let first = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service.change_password("abc", "Passw0rd!", "Passw0rd!").await
            })
        };
        // Let the first call acquire the guard and park on the provider.
        tokio::task::yield_now().await;

        let err = service
            .change_password("abc", "Passw0rd!", "Passw0rd!")
            .await
            .unwrap_err();
        assert!(matches!(err, SettingsError::Busy { .. }));

        tokio::time::sleep(Duration::from_secs(2)).await;
        first.await.unwrap().unwrap();
        assert!(service.ui_state().in_flight.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unrelated_keys_proceed_concurrently() {
        let identity = MockIdentity {
            password_delay: Some(Duration::from_secs(1)),
            ..MockIdentity::default()
        };
        let service = Arc::new(service_with(identity, MockRepository::new()));
        service.load().await.unwrap();

        let password = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service.change_password("abc", "Passw0rd!", "Passw0rd!").await
            })
        };
        tokio::task::yield_now().await;

        // A bio edit is a different operation key and must not be blocked.
        service
            .update_profile(ProfilePatch {
                bio: Some("while uploading".to_owned()),
                ..ProfilePatch::default()
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;
        password.await.unwrap().unwrap();
    }
}
