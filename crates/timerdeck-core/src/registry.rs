//! In-memory registry of timer entities.
//!
//! The registry is the single source of truth rendered to the user, but it
//! is only a cache: the remote store owns the durable record, and every
//! inbound snapshot replaces the registry's contents wholesale. Mutating
//! operations are synchronous on the cache; durability is the sync
//! adapter's business and is never awaited here (optimistic update).

use crate::store::FieldPatch;
use crate::timer::{TimeLeft, Timer, TimerId, TimerPhase};

/// Snapshot-ordered collection of timers. Ordering is whatever the backing
/// snapshot provided; nothing stronger is promised.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: Vec<Timer>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn get(&self, id: &TimerId) -> Option<&Timer> {
        self.timers.iter().find(|t| &t.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &TimerId) -> Option<&mut Timer> {
        self.timers.iter_mut().find(|t| &t.id == id)
    }

    pub fn list(&self) -> &[Timer] {
        &self.timers
    }

    /// Replace the entire contents with a store snapshot. A full overwrite,
    /// not a merge: a local optimistic edit not yet echoed by the store is
    /// clobbered by whatever the snapshot carries.
    pub fn replace_all(&mut self, entities: Vec<Timer>) {
        self.timers = entities;
    }

    /// Set the title. Accepted only while Idle; returns the committed patch
    /// for persistence, or `None` if the edit was rejected.
    pub fn set_title(&mut self, id: &TimerId, title: &str) -> Option<FieldPatch> {
        let timer = self.editable(id)?;
        timer.doc.title = title.to_string();
        Some(FieldPatch::Title(timer.doc.title.clone()))
    }

    /// Set the hours field, clamped into 0..=23. Idle-gated.
    pub fn set_hours(&mut self, id: &TimerId, value: i64) -> Option<FieldPatch> {
        let timer = self.editable(id)?;
        timer.doc.left.hours = TimeLeft::clamp_hours(value);
        Some(FieldPatch::Hours(timer.doc.left.hours))
    }

    /// Set the minutes field, clamped into 0..=59. Idle-gated.
    pub fn set_minutes(&mut self, id: &TimerId, value: i64) -> Option<FieldPatch> {
        let timer = self.editable(id)?;
        timer.doc.left.minutes = TimeLeft::clamp_minutes(value);
        Some(FieldPatch::Minutes(timer.doc.left.minutes))
    }

    /// Set the seconds field, clamped into 0..=59. Idle-gated.
    pub fn set_seconds(&mut self, id: &TimerId, value: i64) -> Option<FieldPatch> {
        let timer = self.editable(id)?;
        timer.doc.left.seconds = TimeLeft::clamp_seconds(value);
        Some(FieldPatch::Seconds(timer.doc.left.seconds))
    }

    /// Remove a timer. Removing an absent id is a no-op; returns whether
    /// anything was removed.
    pub fn remove(&mut self, id: &TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| &t.id != id);
        self.timers.len() != before
    }

    /// Edits are permitted only while Idle; Running and Finished timers
    /// ignore them.
    fn editable(&mut self, id: &TimerId) -> Option<&mut Timer> {
        self.get_mut(id).filter(|t| t.doc.phase() == TimerPhase::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerDoc;

    fn seeded() -> (TimerRegistry, TimerId) {
        let id = TimerId::new("t1");
        let mut registry = TimerRegistry::new();
        registry.replace_all(vec![Timer::new(
            id.clone(),
            TimerDoc::new("tea", TimeLeft::new(0, 5, 0)),
        )]);
        (registry, id)
    }

    #[test]
    fn setters_clamp_out_of_range_input() {
        let (mut registry, id) = seeded();
        assert_eq!(registry.set_hours(&id, 99), Some(FieldPatch::Hours(23)));
        assert_eq!(registry.set_minutes(&id, -3), Some(FieldPatch::Minutes(0)));
        assert_eq!(registry.set_seconds(&id, 60), Some(FieldPatch::Seconds(59)));
        let left = registry.get(&id).unwrap().doc.left;
        assert_eq!(left, TimeLeft::new(23, 0, 59));
    }

    #[test]
    fn edits_rejected_unless_idle() {
        let (mut registry, id) = seeded();
        registry.get_mut(&id).unwrap().doc.running = true;
        assert!(registry.set_title(&id, "late").is_none());
        assert!(registry.set_seconds(&id, 10).is_none());

        registry.get_mut(&id).unwrap().doc.running = false;
        registry.get_mut(&id).unwrap().doc.finished = true;
        assert!(registry.set_title(&id, "late").is_none());

        registry.get_mut(&id).unwrap().doc.finished = false;
        assert_eq!(
            registry.set_title(&id, "on time"),
            Some(FieldPatch::Title("on time".into()))
        );
    }

    #[test]
    fn remove_is_idempotent() {
        let (mut registry, id) = seeded();
        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert!(registry.is_empty());
    }

    #[test]
    fn replace_all_overwrites_local_edits() {
        let (mut registry, id) = seeded();
        registry.set_title(&id, "fresh local edit");

        // A stale snapshot from before the edit arrives.
        let stale = vec![Timer::new(
            id.clone(),
            TimerDoc::new("tea", TimeLeft::new(0, 5, 0)),
        )];
        registry.replace_all(stale);
        assert_eq!(registry.get(&id).unwrap().doc.title, "tea");
    }

    #[test]
    fn unknown_id_edits_are_noops() {
        let (mut registry, _) = seeded();
        assert!(registry.set_hours(&TimerId::new("ghost"), 1).is_none());
        assert!(!registry.remove(&TimerId::new("ghost")));
        assert_eq!(registry.len(), 1);
    }
}
