use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::change::SettingChange;
use crate::liveness::Liveness;
use crate::observer::{ApplyOrigin, BrokerObserver, ObserverId, ObserverRegistry};
use crate::options::{BrokerOptions, KeyOutPolicy, load_options};
use crate::pending::{PendingChanges, filter_by_liveness};

/// Selects which pending changes a bulk apply or undo affects.
///
/// The default selection targets every pending change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PendingSelection {
    /// Changes to visit instead of the broker's own queue.
    pub pending_changes: Option<Vec<SettingChange>>,
    /// Only visit changes with exactly this liveness.
    pub liveness: Option<Liveness>,
}

impl PendingSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_liveness(liveness: Liveness) -> Self {
        Self {
            pending_changes: None,
            liveness: Some(liveness),
        }
    }

    fn resolve(self, pending: &PendingChanges) -> Vec<SettingChange> {
        match self.pending_changes {
            Some(changes) => filter_by_liveness(&changes, self.liveness),
            None => pending.filtered(self.liveness),
        }
    }
}

/// Gates setting changes that need an application or OS restart.
///
/// Live changes are forwarded to observers immediately. Everything else is
/// held in a per-path queue until it is applied or undone, either one by one
/// or in bulk.
pub struct SettingsBroker {
    options: BrokerOptions,
    is_keyed_in: bool,
    pending: PendingChanges,
    observers: ObserverRegistry,
}

impl SettingsBroker {
    pub fn new() -> Self {
        Self::with_options(BrokerOptions::default())
    }

    pub fn with_options(options: BrokerOptions) -> Self {
        Self {
            options,
            is_keyed_in: false,
            pending: PendingChanges::new(),
            observers: ObserverRegistry::new(),
        }
    }

    /// Create a broker configured from the per-user options file, falling
    /// back to defaults when it cannot be read.
    pub fn load() -> Self {
        let options = match load_options() {
            Ok(load) => load.options(),
            Err(err) => {
                warn!("broker options unreadable, using defaults: {err}");
                BrokerOptions::default()
            },
        };
        Self::with_options(options)
    }

    pub fn options(&self) -> BrokerOptions {
        self.options
    }

    /// Register an observer for broker notifications.
    pub fn subscribe(&mut self, observer: Box<dyn BrokerObserver>) -> ObserverId {
        self.observers.subscribe(observer)
    }

    /// Remove a previously registered observer. Returns `false` if `id` was
    /// not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn is_keyed_in(&self) -> bool {
        self.is_keyed_in
    }

    pub fn pending(&self) -> &PendingChanges {
        &self.pending
    }

    /// Snapshot of the pending queue in queue order.
    pub fn pending_changes(&self) -> Vec<SettingChange> {
        self.pending.to_vec()
    }

    /// Apply `change` now if it is live, otherwise queue it until it is
    /// explicitly applied or undone.
    pub fn enqueue(&mut self, change: SettingChange) {
        if change.liveness.is_immediate() {
            self.apply_setting(&change);
            return;
        }

        if self.pending.queue(change).is_mutation() {
            self.notify_restart_required();
        }
    }

    /// Notify observers that `change` must be written, then drop any pending
    /// change for its path.
    pub fn apply_setting(&mut self, change: &SettingChange) {
        trace!("applying {} ({})", change.path, change.liveness);
        self.observers.setting_applied(change, ApplyOrigin::Apply);
        self.remove_pending_change(change);
    }

    /// Notify observers that `change` must be rolled back to its old value,
    /// then drop any pending change for its path.
    pub fn undo_setting(&mut self, change: &SettingChange) {
        let reverted = change.reverted();
        trace!("undoing {} ({})", reverted.path, reverted.liveness);
        self.observers.setting_applied(&reverted, ApplyOrigin::Undo);
        self.remove_pending_change(&reverted);
    }

    pub fn apply_pending_changes(&mut self, selection: PendingSelection) {
        for change in selection.resolve(&self.pending) {
            self.apply_setting(&change);
        }
    }

    pub fn undo_pending_changes(&mut self, selection: PendingSelection) {
        for change in selection.resolve(&self.pending) {
            self.undo_setting(&change);
        }
    }

    /// Return whether a change with `liveness` (or any change when `None`)
    /// is pending.
    pub fn has_pending_change(&self, liveness: Option<Liveness>) -> bool {
        self.pending.has_any(liveness)
    }

    /// Drop the pending change with the same path as `change`. The match is
    /// by path, so stale copies of a pending change still remove it.
    pub fn remove_pending_change(&mut self, change: &SettingChange) {
        if self.pending.remove(change.path.as_str()).is_some() {
            self.notify_restart_required();
        }
    }

    /// Drop every pending change without notifying apply or undo.
    pub fn reset(&mut self) {
        if self.pending.clear() {
            debug!("pending changes discarded");
            self.notify_restart_required();
        }
    }

    /// Update the session state. Any transition clears the queue; keying
    /// out follows the configured [`KeyOutPolicy`].
    pub fn set_keyed_in(&mut self, is_keyed_in: bool) {
        if self.is_keyed_in == is_keyed_in {
            return;
        }
        self.is_keyed_in = is_keyed_in;
        debug!("session keyed {}", if is_keyed_in { "in" } else { "out" });

        if !is_keyed_in && self.options.key_out == KeyOutPolicy::Undo {
            self.undo_pending_changes(PendingSelection::all());
        }
        self.reset();
    }

    fn notify_restart_required(&mut self) {
        let snapshot = self.pending.to_vec();
        trace!("restart required with {} pending change(s)", snapshot.len());
        self.observers.restart_required(&snapshot);
    }
}

impl Default for SettingsBroker {
    fn default() -> Self {
        Self::new()
    }
}
