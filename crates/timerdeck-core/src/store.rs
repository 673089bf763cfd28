//! Remote document store boundary.
//!
//! The store is an opaque collaborator: a named collection of timer
//! documents offering CRUD plus a change-stream subscription that delivers
//! the full current collection contents on any write to any document (not
//! just the subscriber's own). Its wire protocol is out of scope here.
//!
//! [`MemoryStore`] is the in-process implementation used by the CLI and by
//! tests; any number of clients sharing one instance observe each other's
//! writes through the snapshot feed.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::StoreError;
use crate::timer::{Timer, TimerDoc, TimerId};

/// A single-field patch, the store's unit of update.
///
/// Time values carried here are already clamped; the store applies them
/// verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "field", content = "value")]
pub enum FieldPatch {
    Title(String),
    Hours(u8),
    Minutes(u8),
    Seconds(u8),
    Running(bool),
    Finished(bool),
}

impl FieldPatch {
    /// Apply this patch to a document.
    pub fn apply(&self, doc: &mut TimerDoc) {
        match self {
            FieldPatch::Title(title) => doc.title = title.clone(),
            FieldPatch::Hours(hours) => doc.left.hours = *hours,
            FieldPatch::Minutes(minutes) => doc.left.minutes = *minutes,
            FieldPatch::Seconds(seconds) => doc.left.seconds = *seconds,
            FieldPatch::Running(running) => doc.running = *running,
            FieldPatch::Finished(finished) => doc.finished = *finished,
        }
    }
}

/// The opaque remote collection of timer documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document; the store assigns and returns its id.
    async fn create(&self, doc: TimerDoc) -> Result<TimerId, StoreError>;

    /// Patch a single field of an existing document.
    async fn patch(&self, id: &TimerId, patch: FieldPatch) -> Result<(), StoreError>;

    /// Delete a document. Deleting an absent id succeeds (idempotent).
    async fn delete(&self, id: &TimerId) -> Result<(), StoreError>;

    /// Current collection contents. No ordering guarantee.
    async fn list(&self) -> Result<Vec<Timer>, StoreError>;

    /// Subscribe to the change stream: every write publishes the full
    /// collection contents to all subscribers.
    fn subscribe(&self) -> broadcast::Receiver<Vec<Timer>>;
}

/// In-process document store broadcasting a full snapshot on every write.
pub struct MemoryStore {
    docs: Mutex<Vec<Timer>>,
    changes: broadcast::Sender<Vec<Timer>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            docs: Mutex::new(Vec::new()),
            changes,
        }
    }

    fn publish(&self, snapshot: Vec<Timer>) {
        // No subscribers is fine; the send result only reports that.
        let _ = self.changes.send(snapshot);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, doc: TimerDoc) -> Result<TimerId, StoreError> {
        let id = TimerId::new(Uuid::new_v4().to_string());
        let snapshot = {
            let mut docs = self.docs.lock().unwrap();
            docs.push(Timer::new(id.clone(), doc));
            docs.clone()
        };
        self.publish(snapshot);
        Ok(id)
    }

    async fn patch(&self, id: &TimerId, patch: FieldPatch) -> Result<(), StoreError> {
        let snapshot = {
            let mut docs = self.docs.lock().unwrap();
            let timer = docs
                .iter_mut()
                .find(|t| &t.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            patch.apply(&mut timer.doc);
            docs.clone()
        };
        self.publish(snapshot);
        Ok(())
    }

    async fn delete(&self, id: &TimerId) -> Result<(), StoreError> {
        let snapshot = {
            let mut docs = self.docs.lock().unwrap();
            let before = docs.len();
            docs.retain(|t| &t.id != id);
            if docs.len() == before {
                // Absent id: success, but nothing changed so no snapshot.
                None
            } else {
                Some(docs.clone())
            }
        };
        if let Some(snapshot) = snapshot {
            self.publish(snapshot);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Timer>, StoreError> {
        Ok(self.docs.lock().unwrap().clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<Vec<Timer>> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimeLeft;

    #[tokio::test]
    async fn create_assigns_unique_ids() {
        let store = MemoryStore::new();
        let a = store.create(TimerDoc::placeholder()).await.unwrap();
        let b = store.create(TimerDoc::placeholder()).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn every_write_publishes_full_snapshot() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe();

        let id = store
            .create(TimerDoc::new("tea", TimeLeft::new(0, 3, 0)))
            .await
            .unwrap();
        let snap = rx.recv().await.unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].id, id);

        store
            .patch(&id, FieldPatch::Title("coffee".into()))
            .await
            .unwrap();
        let snap = rx.recv().await.unwrap();
        assert_eq!(snap[0].doc.title, "coffee");
    }

    #[tokio::test]
    async fn patch_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .patch(&TimerId::new("missing"), FieldPatch::Running(true))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn double_delete_yields_one_removal() {
        let store = MemoryStore::new();
        let id = store.create(TimerDoc::placeholder()).await.unwrap();
        let mut rx = store.subscribe();

        store.delete(&id).await.unwrap();
        store.delete(&id).await.unwrap();

        let snap = rx.recv().await.unwrap();
        assert!(snap.is_empty());
        // Second delete was a no-op: no further snapshot was published.
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn field_patch_round_trips_through_json() {
        let patch = FieldPatch::Minutes(42);
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"field":"minutes","value":42}"#);
        let back: FieldPatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, patch);
    }
}
