//! The Timer entity: pure persisted state, no behavior beyond derivation.
//!
//! A `TimerDoc` is exactly the shape held by the remote document store
//! (`{title, hours, minutes, seconds, running, finished}`); the scheduler's
//! task handle is deliberately not part of it and lives in a side map owned
//! by the scheduler.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::countdown::TimeLeft;

/// Opaque document identifier, assigned by the remote store on creation and
/// stable for the entity's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(String);

impl TimerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle phase derived from the `running`/`finished` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Finished,
}

/// Persisted countdown state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerDoc {
    pub title: String,
    #[serde(flatten)]
    pub left: TimeLeft,
    pub running: bool,
    pub finished: bool,
}

impl TimerDoc {
    pub fn new(title: impl Into<String>, left: TimeLeft) -> Self {
        Self {
            title: title.into(),
            left,
            running: false,
            finished: false,
        }
    }

    /// Defaults for a freshly added timer: zeroed fields and a generated
    /// placeholder title.
    pub fn placeholder() -> Self {
        Self::new(format!("Timer{}", Utc::now().timestamp_millis()), TimeLeft::zero())
    }

    /// `running` and `finished` are never simultaneously true; the three
    /// remaining states map onto the phases.
    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Running
        } else if self.finished {
            TimerPhase::Finished
        } else {
            TimerPhase::Idle
        }
    }
}

/// One countdown as seen by the registry: store-assigned id plus document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub id: TimerId,
    #[serde(flatten)]
    pub doc: TimerDoc,
}

impl Timer {
    pub fn new(id: TimerId, doc: TimerDoc) -> Self {
        Self { id, doc }
    }
}
