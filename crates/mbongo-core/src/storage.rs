//! File-backed key/value store for wallet state.
//!
//! One JSON file per key under a single directory. Reads that fail for any
//! reason (missing file, unreadable file, bad JSON) are logged and reported
//! as "no value", so a corrupt store degrades to a fresh one instead of
//! taking the wallet down. Writes propagate their errors.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::models::{Account, Language};

/// Key holding the active account and its ledger.
pub const ACCOUNT_KEY: &str = "user";

/// Key holding the interface language preference.
pub const LANGUAGE_KEY: &str = "language";

#[derive(Debug, Clone)]
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create storage directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(key, error = %e, "Failed to read stored value, treating as absent");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Failed to parse stored value, treating as absent");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.entry_path(key);
        let contents = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize value for key: {}", key))?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write storage file: {}", path.display()))?;
        Ok(())
    }

    /// Delete a key. Deleting a key that was never written is not an error.
    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove storage file: {}", path.display()))?;
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entry_path(key).exists()
    }

    // ===== Account =====

    pub fn load_account(&self) -> Option<Account> {
        self.load(ACCOUNT_KEY)
    }

    pub fn save_account(&self, account: &Account) -> Result<()> {
        self.save(ACCOUNT_KEY, account)
    }

    pub fn clear_account(&self) -> Result<()> {
        self.remove(ACCOUNT_KEY)
    }

    // ===== Language preference =====

    /// Stored language, or the default when nothing valid is persisted.
    pub fn load_language(&self) -> Language {
        self.load(LANGUAGE_KEY).unwrap_or_default()
    }

    pub fn save_language(&self, language: Language) -> Result<()> {
        self.save(LANGUAGE_KEY, &language)
    }
}
