//! # Timerdeck Core Library
//!
//! Core engine for timerdeck: multiple independent countdown timers whose
//! state is kept consistent across clients through a remote real-time
//! document store, with a desktop notification and a shared audible alarm
//! on completion.
//!
//! ## Architecture
//!
//! - **Registry**: the in-memory cache of timer entities rendered to the
//!   user; replaced wholesale by every store snapshot, never merged
//! - **Scheduler**: one cancellable 1 Hz task per running timer applying
//!   the base-60/24 borrow-decrement
//! - **Sync adapter**: persists local mutations optimistically (failures
//!   are logged and swallowed, never rolled back) and applies the store's
//!   change-stream snapshots
//! - **Alert coordinator**: one notification per finished timer, one
//!   shared alarm that restarts instead of stacking
//!
//! Services (store handle, alarm sink, notifier) are constructed once at
//! startup and passed in explicitly; there are no ambient globals.
//!
//! ## Key Components
//!
//! - [`TimerRegistry`]: entity cache with typed, clamped, Idle-gated setters
//! - [`CountdownScheduler`]: countdown driver and task-handle side map
//! - [`SyncAdapter`]: registry <-> store bridge
//! - [`AlertCoordinator`]: completion alerts
//! - [`DocumentStore`]: the opaque remote collection boundary

pub mod alert;
pub mod config;
pub mod error;
pub mod registry;
pub mod scheduler;
pub mod store;
pub mod sync;
pub mod timer;

pub use alert::{AlarmSink, AlertCoordinator, ConsoleBell, ConsoleNotifier, Notifier, NullAlarm, SilentNotifier};
pub use config::{AlertsConfig, Config, SyncConfig};
pub use error::{ConfigError, CoreError, StoreError};
pub use registry::TimerRegistry;
pub use scheduler::{CountdownScheduler, TickResult};
pub use store::{DocumentStore, FieldPatch, MemoryStore};
pub use sync::SyncAdapter;
pub use timer::{TimeLeft, Timer, TimerDoc, TimerId, TimerPhase};
