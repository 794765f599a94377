//! Label store and its durable backing file
//!
//! The whole mapping is rewritten on every mutation, so a restart always
//! recovers exactly the last successful write.

use super::entry::{Label, PairKey};
use crate::error::StorageError;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the durable label blob inside the state directory
pub const LABELS_FILE_NAME: &str = "labels.json";

/// The fixed on-disk location holding the serialized label mapping
#[derive(Debug, Clone)]
pub struct LabelFile {
    path: PathBuf,
}

impl LabelFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Label file inside a state directory
    pub fn in_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join(LABELS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored mapping. `Ok(None)` means no prior session.
    pub fn load(&self) -> Result<Option<BTreeMap<PairKey, Label>>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| StorageError::Read {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    /// Replace the stored mapping with `labels`
    pub fn save(&self, labels: &BTreeMap<PairKey, Label>) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(write_err)?;
            }
        }

        let json = serde_json::to_string_pretty(labels)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(write_err)?;
        fs::rename(&tmp_path, &self.path).map_err(write_err)?;
        Ok(())
    }

    /// Delete the stored mapping entirely
    pub fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Mapping from pair key to label; a key is present only after an explicit choice
#[derive(Debug)]
pub struct LabelStore {
    labels: BTreeMap<PairKey, Label>,
    file: LabelFile,
}

impl LabelStore {
    /// Open the store, starting empty when the file is absent or unreadable
    pub fn open(file: LabelFile) -> Self {
        let labels = match file.load() {
            Ok(Some(labels)) => {
                tracing::info!(count = labels.len(), path = %file.path().display(), "restored labels");
                labels
            }
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring stored labels");
                BTreeMap::new()
            }
        };
        Self { labels, file }
    }

    pub fn get(&self, key: &PairKey) -> Option<Label> {
        self.labels.get(key).copied()
    }

    /// Overwrite the label for `key` and persist the whole mapping.
    ///
    /// The in-memory value is updated even when the write fails.
    pub fn set(&mut self, key: PairKey, label: Label) -> Result<(), StorageError> {
        self.labels.insert(key, label);
        self.file.save(&self.labels)
    }

    /// Remove every label and the durable blob
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        self.labels.clear();
        self.file.clear()
    }

    pub fn count(&self) -> usize {
        self.labels.len()
    }


    /// Copy of the current mapping, used as an export snapshot
    pub fn snapshot(&self) -> BTreeMap<PairKey, Label> {
        self.labels.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_in(dir: &TempDir) -> LabelStore {
        LabelStore::open(LabelFile::in_dir(dir.path()))
    }

    #[test]
    fn test_set_then_get() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);

        store.set(PairKey::from("0000"), Label(2)).unwrap();
        store.set(PairKey::from("0001"), Label::NO_PREFERENCE).unwrap();

        assert_eq!(store.get(&PairKey::from("0000")), Some(Label(2)));
        assert_eq!(store.get(&PairKey::from("0001")), Some(Label(-1)));
        assert_eq!(store.get(&PairKey::from("0002")), None);
    }

    #[test]
    fn test_set_overwrites_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);

        store.set(PairKey::from("0000"), Label(1)).unwrap();
        store.set(PairKey::from("0000"), Label(4)).unwrap();
        store.set(PairKey::from("0000"), Label(4)).unwrap();

        assert_eq!(store.count(), 1);
        assert_eq!(store.get(&PairKey::from("0000")), Some(Label(4)));
    }

    #[test]
    fn test_reopen_restores_mapping() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        store.set(PairKey::from("0000"), Label(2)).unwrap();
        store.set(PairKey::from("0002"), Label(-1)).unwrap();
        let before = store.snapshot();
        drop(store);

        let reopened = open_in(&dir);
        assert_eq!(reopened.snapshot(), before);
    }

    #[test]
    fn test_clear_all_empties_memory_and_disk() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        store.set(PairKey::from("0000"), Label(2)).unwrap();
        store.set(PairKey::from("0001"), Label(3)).unwrap();

        store.clear_all().unwrap();

        assert_eq!(store.count(), 0);
        assert_eq!(store.get(&PairKey::from("0000")), None);
        assert!(!dir.path().join(LABELS_FILE_NAME).exists());
        assert_eq!(open_in(&dir).count(), 0);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LABELS_FILE_NAME), "{not json").unwrap();

        let store = open_in(&dir);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_incompatible_blob_is_read_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LABELS_FILE_NAME), r#"{"0000": "left"}"#).unwrap();

        let file = LabelFile::in_dir(dir.path());
        assert!(matches!(file.load(), Err(StorageError::Read { .. })));
    }

    #[test]
    fn test_missing_file_is_no_prior_session() {
        let dir = TempDir::new().unwrap();
        let file = LabelFile::in_dir(dir.path());
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_count_tracks_distinct_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        assert_eq!(store.count(), 0);

        store.set(PairKey::from("0000"), Label(1)).unwrap();
        store.set(PairKey::from("0000"), Label::NO_PREFERENCE).unwrap();
        store.set(PairKey::from("0001"), Label(4)).unwrap();
        assert_eq!(store.count(), 2);
    }
}
