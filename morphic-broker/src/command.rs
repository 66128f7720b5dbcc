use log::trace;
use serde::{Deserialize, Serialize};

use crate::broker::{PendingSelection, SettingsBroker};
use crate::change::SettingChange;
use crate::error::Result;
use crate::liveness::Liveness;

/// Requests delivered to the broker over the settings channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BrokerCommand {
    Enqueue(SettingChange),
    ApplySetting(SettingChange),
    UndoSetting(SettingChange),
    ApplyPendingChanges(PendingSelection),
    UndoPendingChanges(PendingSelection),
    HasPendingChange {
        #[serde(default)]
        liveness: Option<Liveness>,
    },
    RemovePendingChange(SettingChange),
    Reset,
    SetKeyedIn {
        is_keyed_in: bool,
    },
}

impl BrokerCommand {
    /// Decode a command from its JSON message form.
    pub fn from_json_str(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Answer to a reduced [`BrokerCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerReply {
    Done,
    HasPendingChange(bool),
}

/// Dispatch `command` to the matching broker operation.
pub fn reduce(broker: &mut SettingsBroker, command: BrokerCommand) -> BrokerReply {
    trace!("broker command: {command:?}");
    match command {
        BrokerCommand::Enqueue(change) => broker.enqueue(change),
        BrokerCommand::ApplySetting(change) => broker.apply_setting(&change),
        BrokerCommand::UndoSetting(change) => broker.undo_setting(&change),
        BrokerCommand::ApplyPendingChanges(selection) => {
            broker.apply_pending_changes(selection)
        },
        BrokerCommand::UndoPendingChanges(selection) => {
            broker.undo_pending_changes(selection)
        },
        BrokerCommand::HasPendingChange { liveness } => {
            return BrokerReply::HasPendingChange(
                broker.has_pending_change(liveness),
            );
        },
        BrokerCommand::RemovePendingChange(change) => {
            broker.remove_pending_change(&change)
        },
        BrokerCommand::Reset => broker.reset(),
        BrokerCommand::SetKeyedIn { is_keyed_in } => {
            broker.set_keyed_in(is_keyed_in)
        },
    }

    BrokerReply::Done
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{BrokerCommand, BrokerReply, reduce};
    use crate::broker::{PendingSelection, SettingsBroker};
    use crate::liveness::Liveness;

    #[test]
    fn given_enqueue_message_when_decoded_then_carries_change() {
        let payload = r#"{
            "type": "enqueue",
            "path": "http://registry\\.gpii\\.net/common/language",
            "value": "es",
            "oldValue": "en",
            "liveness": "OSRestart"
        }"#;

        let command = BrokerCommand::from_json_str(payload)
            .expect("enqueue message should decode");

        match command {
            BrokerCommand::Enqueue(change) => {
                assert_eq!(change.value, json!("es"));
                assert_eq!(change.old_value, json!("en"));
                assert_eq!(change.liveness, Liveness::OsRestart);
            },
            other => panic!("expected enqueue, got {other:?}"),
        }
    }

    #[test]
    fn given_bulk_message_without_fields_when_decoded_then_selects_all() {
        let command =
            BrokerCommand::from_json_str(r#"{ "type": "applyPendingChanges" }"#)
                .expect("bulk message should decode");

        assert_eq!(
            command,
            BrokerCommand::ApplyPendingChanges(PendingSelection::all())
        );
    }

    #[test]
    fn given_session_message_when_decoded_then_reads_flag() {
        let command = BrokerCommand::from_json_str(
            r#"{ "type": "setKeyedIn", "isKeyedIn": true }"#,
        )
        .expect("session message should decode");

        assert_eq!(command, BrokerCommand::SetKeyedIn { is_keyed_in: true });
    }

    #[test]
    fn given_unknown_message_when_decoded_then_fails() {
        assert!(BrokerCommand::from_json_str(r#"{ "type": "reboot" }"#).is_err());
    }

    #[test]
    fn given_commands_when_reduced_then_broker_state_follows() {
        let mut broker = SettingsBroker::new();
        let enqueue = BrokerCommand::from_json_str(
            r#"{
                "type": "enqueue",
                "path": "p",
                "value": 2,
                "oldValue": 1,
                "liveness": "manualRestart"
            }"#,
        )
        .expect("enqueue message should decode");

        assert_eq!(reduce(&mut broker, enqueue), BrokerReply::Done);
        assert_eq!(
            reduce(
                &mut broker,
                BrokerCommand::HasPendingChange {
                    liveness: Some(Liveness::ManualRestart)
                }
            ),
            BrokerReply::HasPendingChange(true)
        );

        reduce(
            &mut broker,
            BrokerCommand::UndoPendingChanges(PendingSelection::all()),
        );

        assert_eq!(
            reduce(
                &mut broker,
                BrokerCommand::HasPendingChange { liveness: None }
            ),
            BrokerReply::HasPendingChange(false)
        );
    }

    #[test]
    fn given_keyed_in_broker_when_key_out_command_then_queue_cleared() {
        let mut broker = SettingsBroker::new();
        reduce(&mut broker, BrokerCommand::SetKeyedIn { is_keyed_in: true });
        let change = crate::change::SettingChange::new(
            "p",
            json!(true),
            json!(false),
            Liveness::OsRestart,
        );
        reduce(&mut broker, BrokerCommand::Enqueue(change));

        reduce(&mut broker, BrokerCommand::SetKeyedIn { is_keyed_in: false });

        assert!(broker.pending_changes().is_empty());
    }
}
