//! Ordered queue of deferred setting changes.
//!
//! Entries are keyed by [`SettingPath`], so the queue never holds more than
//! one change for a path. Insertion order is preserved across removals.

use indexmap::IndexMap;
use log::debug;

use crate::change::{SettingChange, SettingPath};
use crate::liveness::Liveness;

/// How [`PendingChanges::queue`] affected the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOutcome {
    /// First change for the path; appended to the queue.
    Queued,
    /// A change for the path was already pending; its value was swapped
    /// while the original baseline and liveness were kept.
    Replaced,
    /// The new value equals the pending baseline; the entry was dropped.
    Collapsed,
    /// The new value equals the value already pending.
    Unchanged,
}

impl QueueOutcome {
    /// Return whether the queue contents changed.
    pub fn is_mutation(self) -> bool {
        !matches!(self, QueueOutcome::Unchanged)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingChanges {
    entries: IndexMap<SettingPath, SettingChange>,
}

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a deferred change, merging with any change already pending for
    /// the same path.
    pub fn queue(&mut self, change: SettingChange) -> QueueOutcome {
        let Some(pending) = self.entries.get_mut(&change.path) else {
            debug!(
                "queued pending change for {} ({})",
                change.path, change.liveness
            );
            self.entries.insert(change.path.clone(), change);
            return QueueOutcome::Queued;
        };

        if pending.is_baseline(&change.value) {
            debug!("pending change for {} reverted to baseline", change.path);
            self.entries.shift_remove(&change.path);
            return QueueOutcome::Collapsed;
        }

        if pending.value == change.value {
            return QueueOutcome::Unchanged;
        }

        debug!("replaced pending value for {}", change.path);
        pending.value = change.value;
        QueueOutcome::Replaced
    }

    /// Remove the change pending for `path`, if any.
    pub fn remove(&mut self, path: &str) -> Option<SettingChange> {
        let removed = self.entries.shift_remove(path);
        if removed.is_some() {
            debug!("removed pending change for {path}");
        }
        removed
    }

    pub fn get(&self, path: &str) -> Option<&SettingChange> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SettingChange> {
        self.entries.values()
    }

    /// Return pending changes with the given liveness, or all of them when
    /// `liveness` is `None`.
    pub fn filtered(&self, liveness: Option<Liveness>) -> Vec<SettingChange> {
        filter_by_liveness(self.iter(), liveness)
    }

    pub fn has_any(&self, liveness: Option<Liveness>) -> bool {
        self.iter().any(|change| matches_liveness(change, liveness))
    }

    pub fn to_vec(&self) -> Vec<SettingChange> {
        self.entries.values().cloned().collect()
    }

    /// Drop every pending change. Returns whether anything was dropped.
    pub fn clear(&mut self) -> bool {
        let had_entries = !self.entries.is_empty();
        self.entries.clear();
        had_entries
    }
}

pub(crate) fn filter_by_liveness<'a>(
    changes: impl IntoIterator<Item = &'a SettingChange>,
    liveness: Option<Liveness>,
) -> Vec<SettingChange> {
    changes
        .into_iter()
        .filter(|change| matches_liveness(change, liveness))
        .cloned()
        .collect()
}

fn matches_liveness(change: &SettingChange, liveness: Option<Liveness>) -> bool {
    liveness.is_none_or(|liveness| change.liveness == liveness)
}
