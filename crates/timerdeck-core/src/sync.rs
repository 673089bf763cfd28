//! Sync adapter between the registry and the remote document store.
//!
//! One-way-out: local mutations are forwarded to the store. A failed write
//! is logged and swallowed -- the local optimistic state is not rolled back
//! and there is no retry, so local and remote diverge until the next
//! successful write is echoed back.
//!
//! One-way-in: every change-stream snapshot replaces the registry contents
//! wholesale. A stale snapshot can visibly revert a fresh local edit for up
//! to one round trip; that race is part of the contract, not a bug to fix
//! here.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::registry::TimerRegistry;
use crate::store::{DocumentStore, FieldPatch};
use crate::timer::{Timer, TimerDoc, TimerId};

pub struct SyncAdapter {
    registry: Arc<Mutex<TimerRegistry>>,
    store: Arc<dyn DocumentStore>,
}

impl SyncAdapter {
    pub fn new(registry: Arc<Mutex<TimerRegistry>>, store: Arc<dyn DocumentStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &Arc<Mutex<TimerRegistry>> {
        &self.registry
    }

    /// Create a timer with default fields and a placeholder title. The new
    /// entity appears locally once the store echoes it back through the
    /// change stream.
    pub async fn add_timer(&self) -> Result<TimerId> {
        self.add_timer_with(TimerDoc::placeholder()).await
    }

    /// Create a timer from the given document. Unlike updates and deletes
    /// there is no local state to keep on failure, so the error surfaces
    /// to the caller.
    pub async fn add_timer_with(&self, doc: TimerDoc) -> Result<TimerId> {
        self.persist_create(doc).await
    }

    pub async fn set_title(&self, id: &TimerId, title: &str) {
        let patch = self.registry.lock().unwrap().set_title(id, title);
        self.forward(id, patch).await;
    }

    pub async fn set_hours(&self, id: &TimerId, value: i64) {
        let patch = self.registry.lock().unwrap().set_hours(id, value);
        self.forward(id, patch).await;
    }

    pub async fn set_minutes(&self, id: &TimerId, value: i64) {
        let patch = self.registry.lock().unwrap().set_minutes(id, value);
        self.forward(id, patch).await;
    }

    pub async fn set_seconds(&self, id: &TimerId, value: i64) {
        let patch = self.registry.lock().unwrap().set_seconds(id, value);
        self.forward(id, patch).await;
    }

    /// Remove a timer locally and from the store. A second remove of the
    /// same id is a complete no-op.
    pub async fn remove_timer(&self, id: &TimerId) {
        let removed = self.registry.lock().unwrap().remove(id);
        if removed {
            self.persist_delete(id).await;
        }
    }

    /// Persist a committed registry edit; `None` means the edit was
    /// rejected and there is nothing to persist.
    async fn forward(&self, id: &TimerId, patch: Option<FieldPatch>) {
        if let Some(patch) = patch {
            self.persist_update(id, patch).await;
        }
    }

    pub async fn persist_create(&self, doc: TimerDoc) -> Result<TimerId> {
        match self.store.create(doc).await {
            Ok(id) => Ok(id),
            Err(e) => {
                warn!("create failed: {e}");
                Err(e.into())
            }
        }
    }

    pub async fn persist_update(&self, id: &TimerId, patch: FieldPatch) {
        if let Err(e) = self.store.patch(id, patch).await {
            warn!("update of {id} failed, keeping local state: {e}");
        }
    }

    pub async fn persist_delete(&self, id: &TimerId) {
        if let Err(e) = self.store.delete(id).await {
            warn!("delete of {id} failed, keeping local state: {e}");
        }
    }

    /// Replace the registry contents with a snapshot.
    pub fn apply_snapshot(&self, entities: Vec<Timer>) {
        debug!("applying snapshot of {} timers", entities.len());
        self.registry.lock().unwrap().replace_all(entities);
    }

    /// Drive the inbound half: seed from the current collection contents,
    /// then apply every change-stream snapshot until the store shuts down.
    pub async fn run(self: Arc<Self>) {
        let mut rx = self.store.subscribe();

        match self.store.list().await {
            Ok(entities) => self.apply_snapshot(entities),
            Err(e) => warn!("initial list failed: {e}"),
        }

        loop {
            match rx.recv().await {
                Ok(snapshot) => self.apply_snapshot(snapshot),
                Err(RecvError::Lagged(missed)) => {
                    // Snapshots are full state; the next one supersedes
                    // whatever was missed.
                    warn!("change stream lagged, skipped {missed} snapshots");
                }
                Err(RecvError::Closed) => {
                    info!("change stream closed, stopping snapshot loop");
                    break;
                }
            }
        }
    }
}
