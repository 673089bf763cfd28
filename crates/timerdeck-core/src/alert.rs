//! Completion alerts: one desktop notification per finished timer, one
//! shared audible alarm for all of them.
//!
//! The coordinator is a process-wide single instance constructed at startup
//! and passed by reference into the scheduler -- the alarm sink and the
//! notifier are explicit services, not ambient globals. Notification
//! permission is requested exactly once, at construction; when denied, every
//! later notify is silently skipped while the alarm still rings.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::timer::Timer;

/// Desktop notification service boundary. `notify` is fire-and-forget and
/// must never fail observably.
pub trait Notifier: Send + Sync {
    /// One-time permission request. `false` suppresses all notifications.
    fn request_permission(&self) -> bool;

    fn notify(&self, summary: &str, body: &str);
}

/// Audio playback boundary for the single shared alarm asset.
pub trait AlarmSink: Send + Sync {
    /// Start playback from the beginning. Called while already playing,
    /// this restarts rather than stacks.
    fn play(&self);

    fn pause(&self);

    /// Reset the playback position to the start.
    fn rewind(&self);
}

/// Owner of the shared alarm resource and notification dispatch.
pub struct AlertCoordinator {
    notifier: Arc<dyn Notifier>,
    alarm: Arc<dyn AlarmSink>,
    permitted: bool,
    ringing: AtomicBool,
}

impl AlertCoordinator {
    pub fn new(notifier: Arc<dyn Notifier>, alarm: Arc<dyn AlarmSink>) -> Self {
        let permitted = notifier.request_permission();
        if !permitted {
            info!("notification permission denied, notifications will be skipped");
        }
        Self {
            notifier,
            alarm,
            permitted,
            ringing: AtomicBool::new(false),
        }
    }

    /// Announce a completed timer. Each completing timer gets its own
    /// notification, but concurrent completions coalesce into a single
    /// alarm restart -- only one audible alert plays at any instant.
    pub fn notify_completion(&self, timer: &Timer) {
        if self.permitted {
            self.notifier.notify(
                "Timer Ended",
                &format!("The timer \"{}\" has ended!", timer.doc.title),
            );
        }
        self.alarm.play();
        self.ringing.store(true, Ordering::SeqCst);
    }

    /// Silence the alarm and reset its position. A no-op when nothing is
    /// playing; callable at any time.
    pub fn stop(&self) {
        if self.ringing.swap(false, Ordering::SeqCst) {
            self.alarm.pause();
            self.alarm.rewind();
        }
    }

    pub fn is_ringing(&self) -> bool {
        self.ringing.load(Ordering::SeqCst)
    }
}

/// Notifier that always grants permission and logs through the subscriber.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn request_permission(&self) -> bool {
        true
    }

    fn notify(&self, summary: &str, body: &str) {
        info!("{summary}: {body}");
    }
}

/// Notifier standing in for a platform that denied permission.
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn request_permission(&self) -> bool {
        false
    }

    fn notify(&self, _summary: &str, _body: &str) {}
}

/// Terminal-bell alarm. A BEL per `play`; pause and rewind have nothing to
/// hold onto, so they only log.
pub struct ConsoleBell;

impl AlarmSink for ConsoleBell {
    fn play(&self) {
        eprint!("\x07");
        info!("alarm ringing");
    }

    fn pause(&self) {
        debug!("alarm paused");
    }

    fn rewind(&self) {
        debug!("alarm rewound");
    }
}

/// Alarm sink that does nothing, for headless or muted runs.
pub struct NullAlarm;

impl AlarmSink for NullAlarm {
    fn play(&self) {}
    fn pause(&self) {}
    fn rewind(&self) {}
}

/// Recording doubles shared by the alert and scheduler tests.
#[cfg(test)]
pub(crate) mod doubles {
    use super::{AlarmSink, Notifier};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub(crate) struct RecordingAlarm {
        pub ops: Mutex<Vec<&'static str>>,
    }

    impl RecordingAlarm {
        pub fn new() -> Self {
            Self { ops: Mutex::new(Vec::new()) }
        }

        pub fn plays(&self) -> usize {
            self.ops.lock().unwrap().iter().filter(|op| **op == "play").count()
        }
    }

    impl AlarmSink for RecordingAlarm {
        fn play(&self) {
            self.ops.lock().unwrap().push("play");
        }

        fn pause(&self) {
            self.ops.lock().unwrap().push("pause");
        }

        fn rewind(&self) {
            self.ops.lock().unwrap().push("rewind");
        }
    }

    pub(crate) struct CountingNotifier {
        granted: bool,
        pub sent: AtomicUsize,
    }

    impl CountingNotifier {
        pub fn granted() -> Self {
            Self { granted: true, sent: AtomicUsize::new(0) }
        }

        pub fn denied() -> Self {
            Self { granted: false, sent: AtomicUsize::new(0) }
        }
    }

    impl Notifier for CountingNotifier {
        fn request_permission(&self) -> bool {
            self.granted
        }

        fn notify(&self, _summary: &str, _body: &str) {
            self.sent.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::doubles::{CountingNotifier, RecordingAlarm};
    use super::*;
    use crate::timer::{TimeLeft, TimerDoc, TimerId};

    fn finished_timer(id: &str, title: &str) -> Timer {
        let mut doc = TimerDoc::new(title, TimeLeft::zero());
        doc.finished = true;
        Timer::new(TimerId::new(id), doc)
    }

    #[test]
    fn concurrent_completions_notify_each_but_share_one_alarm() {
        let notifier = Arc::new(CountingNotifier::granted());
        let alarm = Arc::new(RecordingAlarm::new());
        let alerts = AlertCoordinator::new(
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::clone(&alarm) as Arc<dyn AlarmSink>,
        );

        alerts.notify_completion(&finished_timer("a", "tea"));
        alerts.notify_completion(&finished_timer("b", "eggs"));

        assert_eq!(notifier.sent.load(Ordering::SeqCst), 2);
        // The second completion restarts playback, it does not stack.
        assert_eq!(*alarm.ops.lock().unwrap(), vec!["play", "play"]);
        assert!(alerts.is_ringing());
    }

    #[test]
    fn denied_permission_skips_notification_but_still_rings() {
        let notifier = Arc::new(CountingNotifier::denied());
        let alarm = Arc::new(RecordingAlarm::new());
        let alerts = AlertCoordinator::new(
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::clone(&alarm) as Arc<dyn AlarmSink>,
        );

        alerts.notify_completion(&finished_timer("a", "tea"));

        assert_eq!(notifier.sent.load(Ordering::SeqCst), 0);
        assert_eq!(*alarm.ops.lock().unwrap(), vec!["play"]);
    }

    #[test]
    fn stop_pauses_and_rewinds_once() {
        let alarm = Arc::new(RecordingAlarm::new());
        let alerts = AlertCoordinator::new(
            Arc::new(CountingNotifier::granted()),
            Arc::clone(&alarm) as Arc<dyn AlarmSink>,
        );

        alerts.notify_completion(&finished_timer("a", "tea"));
        alerts.stop();
        alerts.stop();

        assert_eq!(*alarm.ops.lock().unwrap(), vec!["play", "pause", "rewind"]);
        assert!(!alerts.is_ringing());
    }

    #[test]
    fn stop_with_nothing_playing_is_noop() {
        let alarm = Arc::new(RecordingAlarm::new());
        let alerts = AlertCoordinator::new(
            Arc::new(CountingNotifier::granted()),
            Arc::clone(&alarm) as Arc<dyn AlarmSink>,
        );

        alerts.stop();
        assert!(alarm.ops.lock().unwrap().is_empty());
    }
}
