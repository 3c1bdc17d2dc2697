#[cfg(test)]
mod tests {
    use account_settings_sdk::models::{EditPhase, EditableField};

    use super::super::editing::{CommitAction, EditController, EditError};

    #[test]
    fn begin_captures_the_rollback_target() {
        let mut controller = EditController::new();
        controller.begin(EditableField::Bio, "Hello world").unwrap();

        controller.set_value("Hello");
        let snapshot = controller.snapshot().unwrap();
        assert_eq!(snapshot.original, "Hello world");
        assert_eq!(snapshot.value, "Hello");
        assert_eq!(snapshot.phase, EditPhase::Editing);
    }

    #[test]
    fn cancel_reverts_to_viewing_and_drops_the_value() {
        let mut controller = EditController::new();
        controller.begin(EditableField::Bio, "Hello world").unwrap();
        controller.set_value("Hello");

        controller.cancel();

        assert!(controller.snapshot().is_none());
    }

    #[test]
    fn second_field_requires_an_explicit_discard() {
        let mut controller = EditController::new();
        controller.begin(EditableField::Bio, "bio").unwrap();
        controller.set_value("draft");

        let err = controller
            .begin(EditableField::FullName, "Ada")
            .unwrap_err();
        assert_eq!(err, EditError::AlreadyEditing(EditableField::Bio));

        controller
            .begin_discarding(EditableField::FullName, "Ada")
            .unwrap();
        let snapshot = controller.snapshot().unwrap();
        assert_eq!(snapshot.field, EditableField::FullName);
        assert_eq!(snapshot.original, "Ada");
    }

    #[test]
    fn unchanged_commit_is_a_noop_back_to_viewing() {
        let mut controller = EditController::new();
        controller.begin(EditableField::Username, "@ada").unwrap();

        let action = controller.start_commit().unwrap();
        assert_eq!(action, CommitAction::Unchanged);
        assert!(controller.snapshot().is_none());
    }

    #[test]
    fn changed_commit_moves_to_saving() {
        let mut controller = EditController::new();
        controller.begin(EditableField::Username, "@ada").unwrap();
        controller.set_value("@lovelace");

        let action = controller.start_commit().unwrap();
        assert_eq!(
            action,
            CommitAction::Save {
                field: EditableField::Username,
                value: "@lovelace".to_owned()
            }
        );
        assert_eq!(controller.snapshot().unwrap().phase, EditPhase::Saving);
    }

    #[test]
    fn failed_save_returns_to_editing_with_the_value_intact() {
        let mut controller = EditController::new();
        controller.begin(EditableField::Username, "@ada").unwrap();
        controller.set_value("@taken");
        controller.start_commit().unwrap();

        controller.fail_commit("This username is already taken");

        let snapshot = controller.snapshot().unwrap();
        assert_eq!(snapshot.phase, EditPhase::Editing);
        assert_eq!(snapshot.value, "@taken");
        assert_eq!(
            snapshot.error.as_deref(),
            Some("This username is already taken")
        );
    }

    #[test]
    fn successful_save_adopts_the_value() {
        let mut controller = EditController::new();
        controller.begin(EditableField::Bio, "old").unwrap();
        controller.set_value("new");
        controller.start_commit().unwrap();

        controller.finish_commit();

        assert!(controller.snapshot().is_none());
    }

    #[test]
    fn saving_blocks_cancel_value_edits_and_new_begins() {
        let mut controller = EditController::new();
        controller.begin(EditableField::Bio, "old").unwrap();
        controller.set_value("new");
        controller.start_commit().unwrap();

        controller.cancel();
        controller.set_value("sneaky");
        assert_eq!(controller.snapshot().unwrap().value, "new");

        assert_eq!(
            controller.begin(EditableField::Bio, "old").unwrap_err(),
            EditError::SaveInProgress
        );
        assert_eq!(
            controller
                .begin_discarding(EditableField::FullName, "Ada")
                .unwrap_err(),
            EditError::SaveInProgress
        );
    }

    #[test]
    fn typing_clears_a_previous_inline_error() {
        let mut controller = EditController::new();
        controller.begin(EditableField::Username, "@ada").unwrap();
        controller.reject("too short");
        assert!(controller.snapshot().unwrap().error.is_some());

        controller.set_value("@ada_ok");
        assert!(controller.snapshot().unwrap().error.is_none());
    }
}
