//! Edit and delete workflows.
//!
//! Both are two-phase: `open` captures the target without touching the
//! network, `commit` sends the request and reconciles the roster once the
//! directory acknowledges. A [`Surface`] tracks the dialog so a second submit
//! or a close while a request is in flight is rejected.

use userdesk_core::{UserId, UserPatch, UserRecord};

use crate::client::DirectoryApi;
use crate::error::{DirectoryError, SurfaceError};
use crate::list::ListController;
use crate::notification::{
    DELETE_FAILED, DELETE_SUCCEEDED, Notifications, UPDATE_FAILED, UPDATE_SUCCEEDED,
};
use crate::types::UpdateAck;

// ─────────────────────────────────────────────────────────────────────────────
// Surface
// ─────────────────────────────────────────────────────────────────────────────

/// Dialog state: `Closed -> Open -> Submitting -> Closed`.
///
/// A failed submit returns to `Open` so the operator can retry or cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Surface<T> {
    Closed,
    Open(T),
    Submitting(T),
}

impl<T> Default for Surface<T> {
    fn default() -> Self {
        Surface::Closed
    }
}

impl<T> Surface<T> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Surface::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Surface::Submitting(_))
    }

    pub fn target(&self) -> Option<&T> {
        match self {
            Surface::Closed => None,
            Surface::Open(t) | Surface::Submitting(t) => Some(t),
        }
    }

    fn open(&mut self, target: T) -> Result<(), SurfaceError> {
        match self {
            Surface::Closed => {
                *self = Surface::Open(target);
                Ok(())
            }
            Surface::Open(_) => Err(SurfaceError::AlreadyOpen),
            Surface::Submitting(_) => Err(SurfaceError::InFlight),
        }
    }

    fn close(&mut self) -> Result<(), SurfaceError> {
        match self {
            Surface::Closed => Err(SurfaceError::NotOpen),
            Surface::Open(_) => {
                *self = Surface::Closed;
                Ok(())
            }
            Surface::Submitting(_) => Err(SurfaceError::InFlight),
        }
    }

    fn begin_submit(&mut self) -> Result<&T, SurfaceError> {
        match std::mem::replace(self, Surface::Closed) {
            Surface::Open(target) => {
                *self = Surface::Submitting(target);
            }
            Surface::Closed => return Err(SurfaceError::NotOpen),
            submitting @ Surface::Submitting(_) => {
                *self = submitting;
                return Err(SurfaceError::InFlight);
            }
        }
        self.target().ok_or(SurfaceError::NotOpen)
    }

    fn finish(&mut self, succeeded: bool) -> Result<(), SurfaceError> {
        match std::mem::replace(self, Surface::Closed) {
            Surface::Submitting(target) => {
                if !succeeded {
                    *self = Surface::Open(target);
                }
                Ok(())
            }
            other => {
                *self = other;
                Err(SurfaceError::NotSubmitting)
            }
        }
    }
}

/// Result of a commit that reached the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Acknowledged; the roster was reconciled and the dialog closed.
    Committed,
    /// Rejected; the roster is untouched and the dialog is open again.
    Failed(DirectoryError),
}

// ─────────────────────────────────────────────────────────────────────────────
// Edit
// ─────────────────────────────────────────────────────────────────────────────

/// Editable fields of the edit dialog, pre-filled from the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl EditForm {
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
        }
    }

    /// The three editable fields, all sent.
    pub fn to_patch(&self) -> UserPatch {
        UserPatch::default()
            .first_name(self.first_name.clone())
            .last_name(self.last_name.clone())
            .email(self.email.clone())
    }
}

/// Request captured when an edit is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub id: UserId,
    pub patch: UserPatch,
}

#[derive(Debug, Clone, Default)]
pub struct EditWorkflow {
    surface: Surface<EditForm>,
}

impl EditWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface(&self) -> &Surface<EditForm> {
        &self.surface
    }

    pub fn form(&self) -> Option<&EditForm> {
        self.surface.target()
    }

    /// Form fields, editable only while the dialog is open and idle.
    pub fn form_mut(&mut self) -> Option<&mut EditForm> {
        match &mut self.surface {
            Surface::Open(form) => Some(form),
            _ => None,
        }
    }

    pub fn open(&mut self, record: &UserRecord) -> Result<(), SurfaceError> {
        self.surface.open(EditForm::from_record(record))?;
        tracing::debug!(user_id = %record.id, "edit dialog opened");
        Ok(())
    }

    /// Close without submitting; discards the form.
    pub fn cancel(&mut self) -> Result<(), SurfaceError> {
        self.surface.close()
    }

    pub fn begin_commit(&mut self) -> Result<PendingEdit, SurfaceError> {
        let form = self.surface.begin_submit()?;
        Ok(PendingEdit {
            id: form.id,
            patch: form.to_patch(),
        })
    }

    pub fn finish_commit(
        &mut self,
        pending: &PendingEdit,
        result: Result<UpdateAck, DirectoryError>,
        list: &mut ListController,
        notes: &mut Notifications,
    ) -> Result<MutationOutcome, SurfaceError> {
        match result {
            Ok(_) => {
                self.surface.finish(true)?;
                if !list.reconcile_update(pending.id, &pending.patch) {
                    tracing::debug!(user_id = %pending.id, "updated user is no longer loaded");
                }
                tracing::info!(user_id = %pending.id, "user updated");
                notes.success(UPDATE_SUCCEEDED);
                Ok(MutationOutcome::Committed)
            }
            Err(err) => {
                self.surface.finish(false)?;
                tracing::warn!(user_id = %pending.id, "update failed: {err}");
                notes.error(UPDATE_FAILED);
                Ok(MutationOutcome::Failed(err))
            }
        }
    }

    /// Submit the open form and reconcile on acknowledgement.
    pub async fn commit<D: DirectoryApi>(
        &mut self,
        api: &D,
        list: &mut ListController,
        notes: &mut Notifications,
    ) -> Result<MutationOutcome, SurfaceError> {
        let pending = self.begin_commit()?;
        let result = api.update_user(pending.id, &pending.patch).await;
        self.finish_commit(&pending, result, list, notes)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Delete
// ─────────────────────────────────────────────────────────────────────────────

/// Request captured when a delete is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: UserId,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteWorkflow {
    surface: Surface<UserId>,
}

impl DeleteWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface(&self) -> &Surface<UserId> {
        &self.surface
    }

    pub fn target(&self) -> Option<UserId> {
        self.surface.target().copied()
    }

    pub fn open(&mut self, id: UserId) -> Result<(), SurfaceError> {
        self.surface.open(id)?;
        tracing::debug!(user_id = %id, "delete confirmation opened");
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), SurfaceError> {
        self.surface.close()
    }

    pub fn begin_commit(&mut self) -> Result<PendingDelete, SurfaceError> {
        let id = *self.surface.begin_submit()?;
        Ok(PendingDelete { id })
    }

    pub fn finish_commit(
        &mut self,
        pending: PendingDelete,
        result: Result<(), DirectoryError>,
        list: &mut ListController,
        notes: &mut Notifications,
    ) -> Result<MutationOutcome, SurfaceError> {
        match result {
            Ok(()) => {
                self.surface.finish(true)?;
                list.reconcile_delete(pending.id);
                tracing::info!(user_id = %pending.id, "user deleted");
                notes.success(DELETE_SUCCEEDED);
                Ok(MutationOutcome::Committed)
            }
            Err(err) => {
                self.surface.finish(false)?;
                tracing::warn!(user_id = %pending.id, "delete failed: {err}");
                notes.error(DELETE_FAILED);
                Ok(MutationOutcome::Failed(err))
            }
        }
    }

    /// Send the confirmed delete and drop the record on acknowledgement.
    pub async fn commit<D: DirectoryApi>(
        &mut self,
        api: &D,
        list: &mut ListController,
        notes: &mut Notifications,
    ) -> Result<MutationOutcome, SurfaceError> {
        let pending = self.begin_commit()?;
        let result = api.delete_user(pending.id).await;
        self.finish_commit(pending, result, list, notes)
    }
}
