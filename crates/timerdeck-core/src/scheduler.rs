//! Per-timer countdown driver.
//!
//! While a timer runs, the scheduler owns one cancellable tokio task firing
//! once per second. Task handles live in a side map keyed by timer id --
//! they are cancellation handles only, never part of the entity's persisted
//! shape. A tick re-checks `running` under the registry lock before applying
//! any effect, so a tick that raced a reset or a snapshot overwrite is a
//! no-op; ticks for different timers are causally independent.
//!
//! Intermediate ticks mutate only the local cache. Remote durability is
//! limited to the flag change on `start`, the cleared state on `reset` and
//! the terminal state on the completion edge; the system favors simplicity
//! over per-tick durability.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::alert::AlertCoordinator;
use crate::registry::TimerRegistry;
use crate::store::FieldPatch;
use crate::sync::SyncAdapter;
use crate::timer::{TimeLeft, Timer, TimerId, TimerPhase};

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// One borrow-decrement step was applied.
    Decremented,
    /// The completion edge fired: flags flipped, alert dispatched.
    Completed,
    /// Nothing happened: the timer is gone or no longer running.
    Skipped,
}

/// Cheaply cloneable handle to the countdown driver.
#[derive(Clone)]
pub struct CountdownScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Arc<Mutex<TimerRegistry>>,
    adapter: Arc<SyncAdapter>,
    alerts: Arc<AlertCoordinator>,
    tasks: Mutex<HashMap<TimerId, JoinHandle<()>>>,
}

impl CountdownScheduler {
    pub fn new(
        registry: Arc<Mutex<TimerRegistry>>,
        adapter: Arc<SyncAdapter>,
        alerts: Arc<AlertCoordinator>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                adapter,
                alerts,
                tasks: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Begin a countdown. A no-op returning `false` if the timer is absent
    /// or already Running/Finished, so at most one task exists per id.
    /// Persists the running flag through the adapter.
    pub async fn start(&self, id: &TimerId) -> bool {
        // The doc's phase can lie: a stale snapshot may show Idle while a
        // task is still alive. The side map is the authority on tasks.
        if self.inner.tasks.lock().unwrap().contains_key(id) {
            return false;
        }
        {
            let mut registry = self.inner.registry.lock().unwrap();
            let Some(timer) = registry.get_mut(id) else {
                return false;
            };
            if timer.doc.phase() != TimerPhase::Idle {
                return false;
            }
            timer.doc.running = true;
        }
        self.inner
            .adapter
            .persist_update(id, FieldPatch::Running(true))
            .await;

        let inner = Arc::clone(&self.inner);
        let task_id = id.clone();
        let handle = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(Duration::from_secs(1));
            // The first interval tick fires immediately; the countdown
            // starts one second after `start`.
            ticks.tick().await;
            loop {
                ticks.tick().await;
                if inner.tick(&task_id).await != TickResult::Decremented {
                    break;
                }
            }
        });
        self.inner.tasks.lock().unwrap().insert(id.clone(), handle);
        debug!("countdown task started for {id}");
        true
    }

    /// Apply one tick to a timer. At zero this is the completion edge:
    /// the task is released, running/finished flip, the terminal state is
    /// persisted, and the alert coordinator is invoked. Otherwise exactly
    /// one borrow-decrement branch fires.
    pub async fn tick(&self, id: &TimerId) -> TickResult {
        self.inner.tick(id).await
    }

    /// Cancel any active task, zero the timer and persist the cleared
    /// state. Idempotent; after this returns, an already-queued tick for
    /// the id can have no observable effect.
    pub async fn reset(&self, id: &TimerId) {
        self.cancel(id);
        let present = {
            let mut registry = self.inner.registry.lock().unwrap();
            match registry.get_mut(id) {
                Some(timer) => {
                    timer.doc.left = TimeLeft::zero();
                    timer.doc.running = false;
                    timer.doc.finished = false;
                    true
                }
                None => false,
            }
        };
        // `start` persisted running=true; without this write the store
        // keeps claiming Running and the next snapshot echo wedges the
        // timer in a phase no operation accepts.
        if present {
            self.inner.persist_zeroed(id, false).await;
        }
    }

    /// Cancel the task for an id without touching the entity. Used on
    /// deletion; cancelling a non-existent task is a no-op.
    pub fn cancel(&self, id: &TimerId) {
        if let Some(handle) = self.inner.tasks.lock().unwrap().remove(id) {
            handle.abort();
            debug!("countdown task cancelled for {id}");
        }
    }

    /// Teardown: cancel every task.
    pub fn stop_all(&self) {
        for (_, handle) in self.inner.tasks.lock().unwrap().drain() {
            handle.abort();
        }
    }

    pub fn is_scheduled(&self, id: &TimerId) -> bool {
        self.inner.tasks.lock().unwrap().contains_key(id)
    }
}

impl Inner {
    async fn tick(&self, id: &TimerId) -> TickResult {
        enum Outcome {
            Skip,
            Done(Timer),
            Dec,
        }

        let outcome = {
            let mut registry = self.registry.lock().unwrap();
            match registry.get_mut(id) {
                None => Outcome::Skip,
                Some(timer) if !timer.doc.running => Outcome::Skip,
                Some(timer) if timer.doc.left.is_zero() => {
                    timer.doc.running = false;
                    timer.doc.finished = true;
                    Outcome::Done(timer.clone())
                }
                Some(timer) => {
                    timer.doc.left.decrement();
                    Outcome::Dec
                }
            }
        };

        match outcome {
            Outcome::Skip => {
                // The entity vanished or stopped running under us; the
                // owning task exits after this.
                self.tasks.lock().unwrap().remove(id);
                TickResult::Skipped
            }
            Outcome::Done(timer) => {
                self.tasks.lock().unwrap().remove(id);
                self.persist_zeroed(id, true).await;
                info!("timer \"{}\" finished", timer.doc.title);
                self.alerts.notify_completion(&timer);
                TickResult::Completed
            }
            Outcome::Dec => TickResult::Decremented,
        }
    }

    /// Write the zeroed triple and both flags. The terminal state and the
    /// reset state differ only in `finished`.
    async fn persist_zeroed(&self, id: &TimerId, finished: bool) {
        self.adapter.persist_update(id, FieldPatch::Hours(0)).await;
        self.adapter.persist_update(id, FieldPatch::Minutes(0)).await;
        self.adapter.persist_update(id, FieldPatch::Seconds(0)).await;
        self.adapter.persist_update(id, FieldPatch::Running(false)).await;
        self.adapter
            .persist_update(id, FieldPatch::Finished(finished))
            .await;
    }
}
