//! JSON-file backed secret store.

use anyhow::{Context, Result, anyhow};
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::SecretStore;

/// Stores secrets as a flat JSON object in a single file.
///
/// The file is created on first write with owner-only permissions on Unix.
/// A missing file reads as an empty store.
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `<config_dir>/netplate/secrets.json`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("netplate").join("secrets.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read secrets file {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse secrets file {}", self.path.display()))
    }

    /// Writes a sibling temp file and renames it over the real one, so
    /// readers only ever see a complete file.
    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create secrets directory")?;
        }
        let contents = serde_json::to_string_pretty(values)?;

        let temp_path = self.path.with_extension("tmp");
        // A leftover temp file would keep its old mode through `open`.
        if temp_path.exists() {
            fs::remove_file(&temp_path).context("Failed to remove stale secrets temp file")?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&temp_path)
            .with_context(|| format!("Failed to create {}", temp_path.display()))?;
        file.write_all(contents.as_bytes())
            .context("Failed to write secrets file")?;
        file.sync_all().context("Failed to flush secrets file")?;
        drop(file);

        fs::rename(&temp_path, &self.path).context("Failed to replace secrets file")?;

        debug!("Saved secrets to {}", self.path.display());
        Ok(())
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow!("Secret store lock poisoned"))?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow!("Secret store lock poisoned"))?;
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }
}
