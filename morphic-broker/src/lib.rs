//! Settings broker for the Morphic quick strip.
//!
//! The broker sits between the settings channel and the code that writes
//! settings to the live system. Each incoming [`SettingChange`] carries a
//! [`Liveness`]:
//! - `live` and `liveRestart` changes are applied immediately,
//! - `manualRestart` and `OSRestart` changes are held in a per-path queue
//!   until the user confirms ([`SettingsBroker::apply_pending_changes`]) or
//!   cancels ([`SettingsBroker::undo_pending_changes`]) them.
//!
//! Consumers implement [`BrokerObserver`] to receive "setting applied" and
//! "restart required" notifications. Inbound channel messages can be decoded
//! into [`BrokerCommand`]s and dispatched with [`reduce`].

mod broker;
mod change;
mod command;
mod error;
mod liveness;
mod observer;
mod options;
mod pending;
pub mod session;
pub mod stepper;

pub use broker::{PendingSelection, SettingsBroker};
pub use change::{SettingChange, SettingPath};
pub use command::{BrokerCommand, BrokerReply, reduce};
pub use error::{BrokerError, Result};
pub use liveness::Liveness;
pub use observer::{ApplyOrigin, BrokerObserver, ObserverId};
pub use options::{
    BrokerOptions, KeyOutPolicy, OptionsLoad, OptionsLoadStatus,
    default_options_path, load_options, load_options_from_path,
    save_options_to_path,
};
pub use pending::{PendingChanges, QueueOutcome};
