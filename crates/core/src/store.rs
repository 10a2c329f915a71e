//! Canonical in-memory cache of the user's tasks.
//!
//! Only the view controller mutates the store; presentation code reads
//! snapshots. Every operation preserves the invariant that no two entries
//! share an id.

use crate::model::Task;

#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

/// Undo token for an optimistic toggle. Rolling back patches only the
/// affected entry, so edits to other tasks made in between survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleUndo {
    pub id: i64,
    pub previous: bool,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Reset from a server fetch.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Prepend a server-confirmed new task. Any stale entry with the same
    /// id is dropped first.
    pub fn insert_created(&mut self, task: Task) {
        self.tasks.retain(|existing| existing.id != task.id);
        self.tasks.insert(0, task);
    }

    /// Replace the entry matching the server-confirmed update. Returns
    /// false when the id is unknown (e.g. deleted in between).
    pub fn apply_update(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Optimistically flip the completed flag, returning the undo token
    /// needed if the server later rejects the toggle.
    pub fn toggle(&mut self, id: i64) -> Option<ToggleUndo> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        let previous = task.completed;
        task.completed = !previous;
        Some(ToggleUndo { id, previous })
    }

    pub fn undo(&mut self, undo: ToggleUndo) {
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == undo.id) {
            task.completed = undo.previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn task(id: i64, title: &str, completed: bool) -> Task {
        let created = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        Task {
            id,
            title: title.into(),
            description: None,
            completed,
            priority: Priority::P3,
            tags: Vec::new(),
            created_at: created,
            updated_at: created,
        }
    }

    fn seeded() -> TaskStore {
        let mut store = TaskStore::new();
        store.replace_all(vec![task(1, "one", false), task(2, "two", true)]);
        store
    }

    #[test]
    fn insert_created_prepends_and_keeps_ids_unique() {
        let mut store = seeded();
        store.insert_created(task(1, "one, replayed", false));

        assert_eq!(store.len(), 2);
        assert_eq!(store.tasks()[0].title, "one, replayed");
        let ids: Vec<i64> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn apply_update_replaces_matching_entry_only() {
        let mut store = seeded();
        let mut updated = task(2, "two, renamed", true);
        updated.priority = Priority::P1;

        assert!(store.apply_update(updated.clone()));
        assert_eq!(store.get(2), Some(&updated));
        assert_eq!(store.get(1).unwrap().title, "one");

        assert!(!store.apply_update(task(99, "ghost", false)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_reports_whether_anything_was_dropped() {
        let mut store = seeded();
        assert!(store.remove(1));
        assert!(!store.remove(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn failed_toggle_rolls_back_to_deep_equal_state() {
        let mut store = seeded();
        let before = store.tasks().to_vec();

        let undo = store.toggle(1).unwrap();
        assert!(store.get(1).unwrap().completed);

        // Backend rejected the toggle; restore the single entry.
        store.undo(undo);
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn rollback_does_not_clobber_other_edits() {
        let mut store = seeded();
        let undo = store.toggle(1).unwrap();

        // A concurrent edit lands on another task before the rollback.
        let renamed = task(2, "two, edited meanwhile", true);
        assert!(store.apply_update(renamed.clone()));

        store.undo(undo);
        assert!(!store.get(1).unwrap().completed);
        assert_eq!(store.get(2), Some(&renamed));
    }

    #[test]
    fn toggle_of_unknown_id_is_a_no_op() {
        let mut store = seeded();
        assert_eq!(store.toggle(42), None);
    }
}
