use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::Result;

/// What happens to pending changes when the user keys out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyOutPolicy {
    /// Drop pending changes without notifying observers.
    #[default]
    Discard,
    /// Roll back every pending change, firing undo notifications.
    Undo,
}

/// Tunables of the settings broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrokerOptions {
    pub key_out: KeyOutPolicy,
}

/// Status describing how options were loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsLoadStatus {
    Loaded,
    Missing,
    Invalid(String),
}

/// Result of loading options from disk.
#[derive(Debug, Clone)]
pub struct OptionsLoad {
    options: BrokerOptions,
    status: OptionsLoadStatus,
}

impl OptionsLoad {
    pub fn new(options: BrokerOptions, status: OptionsLoadStatus) -> Self {
        Self { options, status }
    }

    pub fn options(&self) -> BrokerOptions {
        self.options
    }

    pub fn status(&self) -> &OptionsLoadStatus {
        &self.status
    }

    /// Consume the value and return both payload and status.
    pub fn into_parts(self) -> (BrokerOptions, OptionsLoadStatus) {
        (self.options, self.status)
    }
}

/// Location of the per-user options file, `<config dir>/morphic/broker.json`.
pub fn default_options_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("morphic").join("broker.json"))
}

/// Load options from [`default_options_path`]. Platforms without a config
/// directory get defaults with [`OptionsLoadStatus::Missing`].
pub fn load_options() -> Result<OptionsLoad> {
    match default_options_path() {
        Some(path) => load_options_from_path(&path),
        None => Ok(OptionsLoad::new(
            BrokerOptions::default(),
            OptionsLoadStatus::Missing,
        )),
    }
}

/// Load options from `path`. A missing or malformed file yields defaults;
/// only IO failures other than "not found" are errors.
pub fn load_options_from_path(path: &Path) -> Result<OptionsLoad> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(OptionsLoad::new(
                BrokerOptions::default(),
                OptionsLoadStatus::Missing,
            ));
        },
        Err(err) => return Err(err.into()),
    };

    let (options, status) = match serde_json::from_slice::<BrokerOptions>(&bytes) {
        Ok(options) => (options, OptionsLoadStatus::Loaded),
        Err(err) => {
            warn!("broker options at {} invalid: {err}", path.display());
            let status = OptionsLoadStatus::Invalid(err.to_string());
            (BrokerOptions::default(), status)
        },
    };
    Ok(OptionsLoad::new(options, status))
}

/// Write `options` to `path`. The file is replaced in one step, so a reader
/// never observes a partially written document.
pub fn save_options_to_path(path: &Path, options: &BrokerOptions) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut staged, options)?;
    staged.write_all(b"\n")?;
    staged.persist(path).map_err(|err| err.error)?;

    Ok(())
}
