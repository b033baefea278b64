//! Persisted user credential.
//!
//! The credential is read once when a session starts and written back on
//! every edit. Storage is keyed by a fixed name so other local settings can
//! share the same file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use liveportrait_models::Credential;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Fixed storage key of the saved API key.
pub const CREDENTIAL_STORAGE_KEY: &str = "liveportrait.huggingface_api_key";

/// Load/save lifecycle for the optional user credential.
pub trait CredentialStore: Send + Sync {
    /// Read the saved credential, if any.
    fn load(&self) -> ClientResult<Option<Credential>>;

    /// Persist the credential. `None` removes the saved value.
    fn save(&self, credential: Option<&Credential>) -> ClientResult<()>;
}

/// JSON key/value file on disk.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.liveportrait/settings.json`, or a file in the working
    /// directory when no home is set.
    pub fn default_path() -> PathBuf {
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".liveportrait").join("settings.json"),
            None => PathBuf::from(".liveportrait-settings.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> ClientResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> ClientResult<Option<Credential>> {
        let entries = self.read_entries()?;
        Ok(entries
            .get(CREDENTIAL_STORAGE_KEY)
            .and_then(|raw| Credential::parse(raw)))
    }

    fn save(&self, credential: Option<&Credential>) -> ClientResult<()> {
        let mut entries = self.read_entries()?;
        match credential {
            Some(credential) => {
                entries.insert(
                    CREDENTIAL_STORAGE_KEY.to_string(),
                    credential.expose().to_string(),
                );
            }
            None => {
                entries.remove(CREDENTIAL_STORAGE_KEY);
            }
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;

        debug!(path = %self.path.display(), saved = credential.is_some(), "Credential store updated");
        Ok(())
    }
}

/// In-memory store for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    value: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            value: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> ClientResult<Option<Credential>> {
        self.value
            .lock()
            .map(|value| value.clone())
            .map_err(|e| ClientError::Store(e.to_string()))
    }

    fn save(&self, credential: Option<&Credential>) -> ClientResult<()> {
        let mut value = self
            .value
            .lock()
            .map_err(|e| ClientError::Store(e.to_string()))?;
        *value = credential.cloned();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("settings.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join("settings.json"));

        store.save(Credential::parse("hf_saved").as_ref()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.expose(), "hf_saved");

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let entries: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entries.get(CREDENTIAL_STORAGE_KEY).unwrap(), "hf_saved");
    }

    #[test]
    fn test_clearing_keeps_other_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"theme":"dark","liveportrait.huggingface_api_key":"hf_old"}"#,
        )
        .unwrap();

        let store = FileCredentialStore::new(&path);
        store.save(None).unwrap();

        assert!(store.load().unwrap().is_none());
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(entries.get("theme").unwrap(), "dark");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(matches!(store.load(), Err(ClientError::Json(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(Credential::parse("hf_mem").as_ref()).unwrap();
        assert_eq!(store.load().unwrap().unwrap().expose(), "hf_mem");
    }
}
