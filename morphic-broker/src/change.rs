use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BrokerError, Result};
use crate::liveness::Liveness;

/// Unique identifier of a setting, e.g.
/// `http://registry\.gpii\.net/common/language`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SettingPath(String);

impl SettingPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SettingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SettingPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SettingPath {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for SettingPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Descriptor of a single requested setting change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingChange {
    pub path: SettingPath,
    #[serde(default)]
    pub value: Value,
    /// Value the setting held before this change was requested.
    #[serde(default)]
    pub old_value: Value,
    pub liveness: Liveness,
}

impl SettingChange {
    pub fn new(
        path: impl Into<SettingPath>,
        value: Value,
        old_value: Value,
        liveness: Liveness,
    ) -> Self {
        Self {
            path: path.into(),
            value,
            old_value,
            liveness,
        }
    }

    /// Return a copy of this change that restores the previous value.
    pub fn reverted(&self) -> Self {
        Self {
            value: self.old_value.clone(),
            ..self.clone()
        }
    }

    /// Return whether `value` equals the baseline of this change.
    pub fn is_baseline(&self, value: &Value) -> bool {
        &self.old_value == value
    }

    /// Build a change from a raw descriptor as sent over the settings
    /// channel.
    ///
    /// `path` and `liveness` are required; absent `value` or `oldValue`
    /// are treated as `null`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let path = value
            .get("path")
            .and_then(Value::as_str)
            .ok_or(BrokerError::MissingField("path"))?;
        let liveness = value
            .get("liveness")
            .and_then(Value::as_str)
            .ok_or(BrokerError::MissingField("liveness"))?
            .parse::<Liveness>()?;

        Ok(Self::new(
            path,
            value.get("value").cloned().unwrap_or(Value::Null),
            value.get("oldValue").cloned().unwrap_or(Value::Null),
            liveness,
        ))
    }
}
