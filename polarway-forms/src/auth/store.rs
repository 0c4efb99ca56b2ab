//! CredentialStore — the YAML credential file
//!
//! Every call goes back to disk: `load()` re-reads the file, `save()` reads,
//! merges one entry, and replaces the whole file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::atomic;
use crate::error::{FormsError, Result};

use super::types::{CredentialEntry, CredentialFile};

/// Sole owner of the credential file
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full username → entry mapping
    ///
    /// A missing, unreadable, or malformed file is `ConfigUnavailable`.
    pub fn load(&self) -> Result<BTreeMap<String, CredentialEntry>> {
        Ok(self.load_file()?.users)
    }

    /// Insert or overwrite one entry and rewrite the file
    pub fn save(&self, entry: CredentialEntry) -> Result<()> {
        let mut file = self.load_file()?;
        let username = entry.username.clone();
        let replaced = file.users.insert(username.clone(), entry).is_some();

        let yaml = serde_yaml::to_string(&file)?;
        atomic::replace_file(&self.path, yaml.as_bytes())?;

        info!(username = %username, replaced, "Credential entry saved");
        Ok(())
    }

    fn load_file(&self) -> Result<CredentialFile> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| FormsError::config_unavailable(&self.path, e))?;
        let mut file: CredentialFile = serde_yaml::from_str(&content)
            .map_err(|e| FormsError::config_unavailable(&self.path, e))?;

        for (key, entry) in file.users.iter_mut() {
            if entry.username.is_empty() {
                entry.username = key.clone();
            }
        }

        debug!(path = %self.path.display(), users = file.users.len(), "Credentials loaded");
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use tempfile::TempDir;

    fn seeded(dir: &TempDir) -> CredentialStore {
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "users:\n  admin:\n    username: admin\n    password: secret\n    role: admin\n",
        )
        .unwrap();
        CredentialStore::new(path)
    }

    #[test]
    fn test_load_seeded_file() {
        let dir = TempDir::new().unwrap();
        let users = seeded(&dir).load().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users["admin"].password, "secret");
        assert_eq!(users["admin"].role, Role::Admin);
    }

    #[test]
    fn test_missing_file_is_config_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("absent.yaml"));
        assert!(matches!(store.load(), Err(FormsError::ConfigUnavailable { .. })));
    }

    #[test]
    fn test_malformed_file_is_config_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "people: []\n").unwrap();
        let store = CredentialStore::new(path);
        assert!(matches!(store.load(), Err(FormsError::ConfigUnavailable { .. })));
    }

    #[test]
    fn test_save_overwrites_existing_entry() {
        let dir = TempDir::new().unwrap();
        let store = seeded(&dir);
        store
            .save(CredentialEntry::new("admin", "rotated", Role::Admin))
            .unwrap();
        let users = store.load().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users["admin"].password, "rotated");
    }

    #[test]
    fn test_username_filled_from_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "users:\n  root:\n    password: pw\n    role: admin\n").unwrap();
        let users = CredentialStore::new(path).load().unwrap();
        assert_eq!(users["root"].username, "root");
    }
}
