//! Outbound notifications of the [`SettingsBroker`](crate::SettingsBroker).
//!
//! The surrounding application registers [`BrokerObserver`]s to learn when a
//! setting must be written to the live system and when the set of changes
//! awaiting a restart has changed. Observers are invoked synchronously, in
//! registration order, while the broker call that triggered them runs.

use crate::change::SettingChange;

/// Provenance of a "setting applied" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOrigin {
    /// A live change, or a pending change the user confirmed.
    Apply,
    /// A pending change rolled back to its baseline.
    Undo,
}

impl ApplyOrigin {
    /// Return the provenance tag attached to notifications, if any.
    pub fn source_tag(self) -> Option<&'static str> {
        match self {
            ApplyOrigin::Apply => None,
            ApplyOrigin::Undo => Some("settingsBroker.undo"),
        }
    }
}

/// Callback interface for broker notifications.
///
/// All methods have a default empty implementation so that observers only
/// override what they consume.
pub trait BrokerObserver {
    /// A setting must be written to the live system.
    fn on_setting_applied(
        &mut self,
        _change: &SettingChange,
        _origin: ApplyOrigin,
    ) {
    }

    /// The pending queue changed; `pending` is its full new content.
    fn on_restart_required(&mut self, _pending: &[SettingChange]) {}
}

impl BrokerObserver for () {}

/// Handle returned by [`SettingsBroker::subscribe`](crate::SettingsBroker::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

pub(crate) struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(ObserverId, Box<dyn BrokerObserver>)>,
}

impl ObserverRegistry {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            observers: Vec::new(),
        }
    }

    pub(crate) fn subscribe(
        &mut self,
        observer: Box<dyn BrokerObserver>,
    ) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn setting_applied(
        &mut self,
        change: &SettingChange,
        origin: ApplyOrigin,
    ) {
        for (_, observer) in &mut self.observers {
            observer.on_setting_applied(change, origin);
        }
    }

    pub(crate) fn restart_required(&mut self, pending: &[SettingChange]) {
        for (_, observer) in &mut self.observers {
            observer.on_restart_required(pending);
        }
    }
}
