//! Inline edit state machine.
//!
//! One edit may be active across the whole entity. Starting a second edit
//! is an explicit decision: `begin` refuses while another field is active,
//! and `begin_discarding` abandons the in-progress edit on purpose. The
//! silent-abandonment behavior of single-pointer designs is not reproduced.

use account_settings_sdk::models::{ActiveEditSnapshot, EditPhase, EditableField};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    #[error("another field is being edited")]
    AlreadyEditing(EditableField),
    #[error("no edit in progress")]
    NoActiveEdit,
    #[error("a save is in progress")]
    SaveInProgress,
}

#[derive(Debug, Clone)]
struct ActiveEdit {
    field: EditableField,
    phase: EditPhase,
    original: String,
    value: String,
    error: Option<String>,
}

/// What `commit` should do, decided before any I/O happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitAction {
    /// Value unchanged: return to viewing without a backend call.
    Unchanged,
    /// Save this value for this field.
    Save { field: EditableField, value: String },
}

#[derive(Debug, Default)]
pub struct EditController {
    active: Option<ActiveEdit>,
}

impl EditController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Editing`, capturing `current` as the rollback target.
    pub fn begin(&mut self, field: EditableField, current: &str) -> Result<(), EditError> {
        if let Some(active) = &self.active {
            if active.field != field {
                return Err(EditError::AlreadyEditing(active.field));
            }
            if active.phase == EditPhase::Saving {
                return Err(EditError::SaveInProgress);
            }
        }
        self.active = Some(ActiveEdit {
            field,
            phase: EditPhase::Editing,
            original: current.to_owned(),
            value: current.to_owned(),
            error: None,
        });
        Ok(())
    }

    /// Abandon whatever edit is active and start a new one.
    pub fn begin_discarding(
        &mut self,
        field: EditableField,
        current: &str,
    ) -> Result<(), EditError> {
        if let Some(active) = &self.active {
            if active.phase == EditPhase::Saving {
                return Err(EditError::SaveInProgress);
            }
            tracing::debug!(abandoned = ?active.field, "discarding in-progress edit");
        }
        self.active = None;
        self.begin(field, current)
    }

    pub fn set_value(&mut self, value: &str) {
        if let Some(active) = &mut self.active {
            if active.phase == EditPhase::Editing {
                active.value = value.to_owned();
                active.error = None;
            }
        }
    }

    /// `Editing -> Viewing`; the attempted value is dropped.
    pub fn cancel(&mut self) {
        if let Some(active) = &self.active {
            if active.phase == EditPhase::Editing {
                self.active = None;
            }
        }
    }

    /// `Editing -> Saving`, deciding whether a backend call is needed.
    pub fn start_commit(&mut self) -> Result<CommitAction, EditError> {
        let active = self.active.as_mut().ok_or(EditError::NoActiveEdit)?;
        if active.phase == EditPhase::Saving {
            return Err(EditError::SaveInProgress);
        }
        if active.value == active.original {
            self.active = None;
            return Ok(CommitAction::Unchanged);
        }
        active.phase = EditPhase::Saving;
        Ok(CommitAction::Save {
            field: active.field,
            value: active.value.clone(),
        })
    }

    /// `Saving -> Viewing`; the value was adopted.
    pub fn finish_commit(&mut self) {
        self.active = None;
    }

    /// `Saving -> Editing`, attempted value intact, error inline.
    pub fn fail_commit(&mut self, message: impl Into<String>) {
        if let Some(active) = &mut self.active {
            active.phase = EditPhase::Editing;
            active.error = Some(message.into());
        }
    }

    /// Inline validation error without leaving `Editing`.
    pub fn reject(&mut self, message: impl Into<String>) {
        if let Some(active) = &mut self.active {
            active.error = Some(message.into());
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<ActiveEditSnapshot> {
        self.active.as_ref().map(|a| ActiveEditSnapshot {
            field: a.field,
            phase: a.phase,
            original: a.original.clone(),
            value: a.value.clone(),
            error: a.error.clone(),
        })
    }

    #[must_use]
    pub fn editing_field(&self) -> Option<EditableField> {
        self.active.as_ref().map(|a| a.field)
    }
}
