//! Persisted appearance preferences behind a storage collaborator.

use std::{
    fs,
    path::PathBuf,
    sync::Mutex,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
}

pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> Result<Preferences>;
    fn save(&self, prefs: Preferences) -> Result<()>;
}

/// Preferences in a TOML file. A missing file yields defaults; saving
/// creates parent directories as needed.
pub struct TomlPreferenceStore {
    path: PathBuf,
}

impl TomlPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read preferences at {}", self.path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("invalid preferences file {}", self.path.display()))
    }

    fn save(&self, prefs: Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create preferences directory {}", parent.display())
                })?;
            }
        }
        let raw = toml::to_string(&prefs).context("failed to encode preferences")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write preferences to {}", self.path.display()))
    }
}

pub struct MemoryPreferenceStore {
    inner: Mutex<Preferences>,
}

impl MemoryPreferenceStore {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            inner: Mutex::new(prefs),
        }
    }
}

impl Default for MemoryPreferenceStore {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("preferences lock poisoned"))?;
        Ok(*guard)
    }

    fn save(&self, prefs: Preferences) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("preferences lock poisoned"))?;
        *guard = prefs;
        Ok(())
    }
}
