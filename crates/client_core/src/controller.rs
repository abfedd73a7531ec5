//! Orchestrates one mutating operation at a time for one form instance.

use std::sync::Arc;

use shared::{
    domain::{RecordDraft, RecordId, TableRecord},
    error::{MutationError, ValidationError},
};
use table_store::{Filter, Order, TableStore};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    list::ListStore,
    notify::{NotificationChannel, NotificationKind},
};

/// User-facing strings for one screen. Fixed per controller; the
/// failure-code mapping picks between `conflict` and `save_failed`.
#[derive(Debug, Clone)]
pub struct MessageSet {
    pub saved: String,
    pub conflict: String,
    pub save_failed: String,
    pub deleted: String,
    pub delete_failed: String,
    pub load_failed: String,
}

#[derive(Debug)]
pub enum SubmitOutcome<R> {
    Saved(R),
    Invalid(ValidationError),
    Busy,
    Failed(MutationError),
}

#[derive(Debug)]
pub enum RemoveOutcome {
    Removed,
    Busy,
    Failed(MutationError),
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Loaded(usize),
    Busy,
    Failed(MutationError),
}

struct ControllerState<D> {
    draft: D,
    dialog_open: bool,
    pending: bool,
}

/// One controller owns one form and one list. The `pending` flag is true
/// strictly between dispatch and resolution of this controller's single
/// in-flight remote operation; re-entrant calls are rejected, never queued.
/// Failures never escape: every outcome surfaces as a notification and the
/// flag is always cleared.
pub struct MutationController<D: RecordDraft> {
    store: Arc<dyn TableStore>,
    notifications: NotificationChannel,
    messages: MessageSet,
    scope: Vec<Filter>,
    list: ListStore<D::Record>,
    blank: D,
    inner: Mutex<ControllerState<D>>,
}

impl<D: RecordDraft> MutationController<D> {
    /// `blank` is the draft template restored after a successful submit;
    /// scope-carrying fields (e.g. the session user id) live there.
    pub fn new(
        store: Arc<dyn TableStore>,
        notifications: NotificationChannel,
        messages: MessageSet,
        blank: D,
    ) -> Self {
        Self {
            store,
            notifications,
            messages,
            scope: Vec::new(),
            list: ListStore::new(),
            blank: blank.clone(),
            inner: Mutex::new(ControllerState {
                draft: blank,
                dialog_open: false,
                pending: false,
            }),
        }
    }

    /// Restrict refreshes to rows matching these filters.
    pub fn with_scope(mut self, scope: Vec<Filter>) -> Self {
        self.scope = scope;
        self
    }

    pub fn list(&self) -> &ListStore<D::Record> {
        &self.list
    }

    pub async fn pending(&self) -> bool {
        self.inner.lock().await.pending
    }

    pub async fn dialog_open(&self) -> bool {
        self.inner.lock().await.dialog_open
    }

    pub async fn draft(&self) -> D {
        self.inner.lock().await.draft.clone()
    }

    pub async fn open_dialog(&self) {
        self.inner.lock().await.dialog_open = true;
    }

    pub async fn close_dialog(&self) {
        self.inner.lock().await.dialog_open = false;
    }

    /// Inputs are frozen while a mutation is in flight, mirroring disabled
    /// form fields.
    pub async fn set_draft(&self, draft: D) {
        let mut state = self.inner.lock().await;
        if state.pending {
            debug!(table = D::Record::TABLE, "mutation: edit ignored while in flight");
            return;
        }
        state.draft = draft;
    }

    /// Validate the current draft and create a record from it. Validation
    /// failures never reach the collaborator and never set `pending`.
    pub async fn submit(&self) -> SubmitOutcome<D::Record> {
        let payload = {
            let mut state = self.inner.lock().await;
            if state.pending {
                return SubmitOutcome::Busy;
            }
            match state.draft.validate() {
                Ok(payload) => {
                    state.pending = true;
                    payload
                }
                Err(err) => {
                    drop(state);
                    self.notifications
                        .show(NotificationKind::Error, err.to_string())
                        .await;
                    return SubmitOutcome::Invalid(err);
                }
            }
        };

        match self.store.insert(D::Record::TABLE, payload).await {
            Ok(row) => match serde_json::from_value::<D::Record>(row) {
                Ok(record) => {
                    self.list.prepend(record.clone()).await;
                    {
                        let mut state = self.inner.lock().await;
                        state.pending = false;
                        state.draft = self.blank.clone();
                        state.dialog_open = false;
                    }
                    info!(table = D::Record::TABLE, id = %record.id(), "mutation: record saved");
                    self.notifications
                        .show(NotificationKind::Success, self.messages.saved.clone())
                        .await;
                    SubmitOutcome::Saved(record)
                }
                Err(err) => {
                    // The collaborator answered outside its row contract;
                    // no success effect may be applied.
                    self.inner.lock().await.pending = false;
                    warn!(table = D::Record::TABLE, "mutation: undecodable inserted row: {err}");
                    self.notifications
                        .show(NotificationKind::Error, self.messages.save_failed.clone())
                        .await;
                    SubmitOutcome::Failed(MutationError::Unexpected(err.to_string()))
                }
            },
            Err(err) => {
                self.inner.lock().await.pending = false;
                warn!(
                    table = D::Record::TABLE,
                    code = err.code.as_deref().unwrap_or("-"),
                    "mutation: save failed: {err}"
                );
                let (error, message) = if err.is_unique_violation() {
                    (MutationError::Conflict(err), self.messages.conflict.clone())
                } else {
                    (MutationError::Remote(err), self.messages.save_failed.clone())
                };
                self.notifications
                    .show(NotificationKind::Error, message)
                    .await;
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Delete by id. The record leaves the list only after the collaborator
    /// confirms; there is no optimistic removal.
    pub async fn remove(&self, id: &RecordId) -> RemoveOutcome {
        {
            let mut state = self.inner.lock().await;
            if state.pending {
                return RemoveOutcome::Busy;
            }
            state.pending = true;
        }

        let filters = [Filter::eq("id", id.as_str())];
        match self.store.delete(D::Record::TABLE, &filters).await {
            Ok(()) => {
                self.list.remove(id).await;
                self.inner.lock().await.pending = false;
                info!(table = D::Record::TABLE, %id, "mutation: record deleted");
                self.notifications
                    .show(NotificationKind::Success, self.messages.deleted.clone())
                    .await;
                RemoveOutcome::Removed
            }
            Err(err) => {
                self.inner.lock().await.pending = false;
                warn!(table = D::Record::TABLE, %id, "mutation: delete failed: {err}");
                self.notifications
                    .show(NotificationKind::Error, self.messages.delete_failed.clone())
                    .await;
                RemoveOutcome::Failed(MutationError::Remote(err))
            }
        }
    }

    /// Full re-fetch by scope, newest first, atomically replacing the list.
    pub async fn refresh(&self) -> RefreshOutcome {
        {
            let mut state = self.inner.lock().await;
            if state.pending {
                return RefreshOutcome::Busy;
            }
            state.pending = true;
        }

        let result = self
            .store
            .select(D::Record::TABLE, &self.scope, Some(Order::created_at_desc()))
            .await;
        self.inner.lock().await.pending = false;

        match result {
            Ok(rows) => {
                let decoded: Result<Vec<D::Record>, _> =
                    rows.into_iter().map(serde_json::from_value).collect();
                match decoded {
                    Ok(records) => {
                        let loaded = records.len();
                        self.list.replace(records).await;
                        debug!(table = D::Record::TABLE, loaded, "mutation: list refreshed");
                        RefreshOutcome::Loaded(loaded)
                    }
                    Err(err) => {
                        warn!(table = D::Record::TABLE, "mutation: undecodable rows: {err}");
                        self.notifications
                            .show(NotificationKind::Error, self.messages.load_failed.clone())
                            .await;
                        RefreshOutcome::Failed(MutationError::Unexpected(err.to_string()))
                    }
                }
            }
            Err(err) => {
                warn!(table = D::Record::TABLE, "mutation: refresh failed: {err}");
                self.notifications
                    .show(NotificationKind::Error, self.messages.load_failed.clone())
                    .await;
                RefreshOutcome::Failed(MutationError::Remote(err))
            }
        }
    }
}
