use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BrokerError;

/// When a setting change takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Liveness {
    /// Applied instantly.
    #[serde(rename = "live")]
    Live,
    /// Applied instantly, but tied to a restart of its application.
    #[serde(rename = "liveRestart")]
    LiveRestart,
    /// The owning application must be restarted for the change to apply.
    #[serde(rename = "manualRestart")]
    ManualRestart,
    /// The whole OS must be restarted for the change to apply.
    #[serde(rename = "OSRestart")]
    OsRestart,
}

impl Liveness {
    /// Return the wire name used by the settings channel.
    pub fn as_str(self) -> &'static str {
        match self {
            Liveness::Live => "live",
            Liveness::LiveRestart => "liveRestart",
            Liveness::ManualRestart => "manualRestart",
            Liveness::OsRestart => "OSRestart",
        }
    }

    /// Return whether changes with this liveness bypass the pending queue.
    pub fn is_immediate(self) -> bool {
        matches!(self, Liveness::Live | Liveness::LiveRestart)
    }
}

impl fmt::Display for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Liveness {
    type Err = BrokerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "live" => Ok(Liveness::Live),
            "liveRestart" => Ok(Liveness::LiveRestart),
            "manualRestart" => Ok(Liveness::ManualRestart),
            "OSRestart" => Ok(Liveness::OsRestart),
            other => Err(BrokerError::UnknownLiveness(other.to_string())),
        }
    }
}
