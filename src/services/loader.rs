//! Dataset loading from a folder of files
//!
//! A dataset folder holds one `data.json` manifest plus the images it
//! references. Loading is all-or-nothing: any error leaves the caller's
//! current session untouched.

use crate::error::LoadError;
use crate::model::dataset::{AssetMap, Dataset};
use crate::model::entry::{basename, Entry, PairKey};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Manifest file name, matched case-insensitively
pub const MANIFEST_NAME: &str = "data.json";

/// A named file from the selected folder
#[derive(Debug, Clone)]
pub struct RawFile {
    /// Path relative to the folder root
    pub path: String,
    pub contents: Vec<u8>,
}

impl RawFile {
    pub fn new(path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    fn is_manifest(&self) -> bool {
        basename(&self.path).eq_ignore_ascii_case(MANIFEST_NAME)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Read every non-hidden file under `dir`, in a stable order
pub fn collect_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<RawFile>, LoadError> {
    let dir = dir.as_ref();
    let mut files = Vec::new();

    // Symlinked images from a shared store count as dataset files
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = entry.map_err(|e| LoadError::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let contents = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rel = path.strip_prefix(dir).unwrap_or(path);
        files.push(RawFile::new(rel.to_string_lossy(), contents));
    }

    tracing::debug!(count = files.len(), dir = %dir.display(), "collected files");
    Ok(files)
}

/// Turn a file collection into ordered entries plus an asset map
pub fn load_dataset(files: Vec<RawFile>) -> Result<Dataset, LoadError> {
    let (manifests, others): (Vec<RawFile>, Vec<RawFile>) =
        files.into_iter().partition(RawFile::is_manifest);

    let manifest = match manifests.len() {
        0 => return Err(LoadError::MissingManifest),
        1 => &manifests[0],
        count => return Err(LoadError::AmbiguousManifest { count }),
    };

    let entries = parse_manifest(&manifest.contents)?;
    check_unique_keys(&entries)?;

    let mut assets = AssetMap::new();
    for file in others {
        if assets.insert(&file.path, file.contents).is_some() {
            tracing::warn!(path = %file.path, "asset name collision, keeping the later file");
        }
    }

    tracing::info!(
        entries = entries.len(),
        assets = assets.len(),
        manifest = %manifest.path,
        "dataset loaded"
    );
    Ok(Dataset { entries, assets })
}

/// Parse manifest bytes and apply the minimal shape checks
pub fn parse_manifest(contents: &[u8]) -> Result<Vec<Entry>, LoadError> {
    let entries: Vec<Entry> = serde_json::from_slice(contents)
        .map_err(|e| LoadError::MalformedManifest(e.to_string()))?;

    for (i, entry) in entries.iter().enumerate() {
        if entry.caption1_index < 0 || entry.caption2_index < 0 {
            return Err(LoadError::MalformedManifest(format!(
                "entry {} has a negative caption index",
                i
            )));
        }
    }

    Ok(entries)
}

fn check_unique_keys(entries: &[Entry]) -> Result<(), LoadError> {
    let mut seen: HashMap<PairKey, usize> = HashMap::new();
    for (i, entry) in entries.iter().enumerate() {
        let key = entry.pair_key();
        if let Some(&first) = seen.get(&key) {
            return Err(LoadError::DuplicatePairKey {
                key: key.to_string(),
                first,
                second: i,
            });
        }
        seen.insert(key, i);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"[
        {"goal_image": "0001_goal.jpg", "current_image": "0001_current.jpg",
         "caption1_text": "a", "caption2_text": "b",
         "caption1_index": 0, "caption2_index": 1, "task": "stack"},
        {"goal_image": "0000_goal.jpg", "current_image": "0000_current.jpg",
         "caption1_text": "c", "caption2_text": "d",
         "caption1_index": 2, "caption2_index": 3}
    ]"#;

    #[test]
    fn test_load_preserves_manifest_order() {
        let files = vec![
            RawFile::new("set/0000_goal.jpg", vec![0u8; 4]),
            RawFile::new("set/data.json", MANIFEST),
        ];

        let dataset = load_dataset(files).unwrap();

        let keys: Vec<String> = dataset.entries.iter().map(|e| e.pair_key().to_string()).collect();
        assert_eq!(keys, vec!["0001", "0000"]);
        assert_eq!(dataset.entries[0].extra.get("task").unwrap(), "stack");
    }

    #[test]
    fn test_manifest_name_is_case_insensitive() {
        let files = vec![RawFile::new("DATA.JSON", MANIFEST)];
        assert_eq!(load_dataset(files).unwrap().entries.len(), 2);
    }

    #[test]
    fn test_assets_are_indexed_by_basename_and_kept_when_unused() {
        let files = vec![
            RawFile::new("data.json", MANIFEST),
            RawFile::new("imgs/deep/0000_goal.jpg", vec![7u8]),
            RawFile::new("notes.txt", "unused"),
        ];

        let dataset = load_dataset(files).unwrap();

        assert_eq!(dataset.assets.get("0000_goal.jpg"), Some(&[7u8][..]));
        assert!(dataset.assets.get("notes.txt").is_some());
        assert!(dataset.assets.get("0001_goal.jpg").is_none());
    }

    #[test]
    fn test_missing_manifest() {
        let files = vec![RawFile::new("0000_goal.jpg", vec![1u8])];
        assert!(matches!(load_dataset(files), Err(LoadError::MissingManifest)));
    }

    #[test]
    fn test_two_manifests_are_ambiguous() {
        let files = vec![
            RawFile::new("a/data.json", MANIFEST),
            RawFile::new("b/Data.json", MANIFEST),
        ];
        assert!(matches!(
            load_dataset(files),
            Err(LoadError::AmbiguousManifest { count: 2 })
        ));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let files = vec![RawFile::new("data.json", "[{\"goal_image\": ")];
        assert!(matches!(load_dataset(files), Err(LoadError::MalformedManifest(_))));
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let manifest = r#"[{"goal_image": "0000_goal.jpg", "current_image": "x.jpg"}]"#;
        let files = vec![RawFile::new("data.json", manifest)];
        assert!(matches!(load_dataset(files), Err(LoadError::MalformedManifest(_))));
    }

    #[test]
    fn test_object_instead_of_array_is_malformed() {
        let files = vec![RawFile::new("data.json", "{}")];
        assert!(matches!(load_dataset(files), Err(LoadError::MalformedManifest(_))));
    }

    #[test]
    fn test_negative_caption_index_is_malformed() {
        let manifest = r#"[{"goal_image": "0000_goal.jpg", "current_image": "0000_current.jpg",
            "caption1_text": "a", "caption2_text": "b",
            "caption1_index": -1, "caption2_index": 1}]"#;
        let files = vec![RawFile::new("data.json", manifest)];
        assert!(matches!(load_dataset(files), Err(LoadError::MalformedManifest(_))));
    }

    #[test]
    fn test_duplicate_pair_keys_are_rejected() {
        let manifest = r#"[
            {"goal_image": "0000_goal.jpg", "current_image": "0000_a.jpg",
             "caption1_text": "a", "caption2_text": "b", "caption1_index": 0, "caption2_index": 1},
            {"goal_image": "0000_goal_v2.jpg", "current_image": "0000_b.jpg",
             "caption1_text": "c", "caption2_text": "d", "caption1_index": 2, "caption2_index": 3}
        ]"#;
        let files = vec![RawFile::new("data.json", manifest)];

        match load_dataset(files) {
            Err(LoadError::DuplicatePairKey { key, first, second }) => {
                assert_eq!(key, "0000");
                assert_eq!((first, second), (0, 1));
            }
            other => panic!("expected duplicate key error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_manifest_loads_empty_dataset() {
        let files = vec![RawFile::new("data.json", "[]")];
        assert!(load_dataset(files).unwrap().entries.is_empty());
    }

    #[test]
    fn test_collect_dir_skips_hidden_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("imgs")).unwrap();
        fs::create_dir_all(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join("data.json"), MANIFEST).unwrap();
        fs::write(dir.path().join("imgs/0000_goal.jpg"), [1u8, 2]).unwrap();
        fs::write(dir.path().join(".DS_Store"), "x").unwrap();
        fs::write(dir.path().join(".cache/junk.bin"), "x").unwrap();

        let files = collect_dir(dir.path()).unwrap();
        let mut names: Vec<String> = files.iter().map(|f| f.path.replace('\\', "/")).collect();
        names.sort();
        assert_eq!(names, vec!["data.json", "imgs/0000_goal.jpg"]);

        let dataset = load_dataset(files).unwrap();
        assert_eq!(dataset.assets.get("0000_goal.jpg"), Some(&[1u8, 2][..]));
    }

    #[test]
    fn test_collect_dir_missing_folder_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = collect_dir(dir.path().join("nope"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_dir_follows_symlinked_assets() {
        let store = TempDir::new().unwrap();
        let real = store.path().join("shared_goal.jpg");
        fs::write(&real, b"jpeg bytes").unwrap();

        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("data.json"),
            r#"[{"goal_image": "0000_goal.jpg", "current_image": "0000_current.jpg",
                 "caption1_text": "a", "caption2_text": "b",
                 "caption1_index": 0, "caption2_index": 1}]"#,
        )
        .unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("0000_goal.jpg")).unwrap();

        let dataset = load_dataset(collect_dir(dir.path()).unwrap()).unwrap();
        assert_eq!(dataset.assets.get("0000_goal.jpg"), Some(&b"jpeg bytes"[..]));
    }
}
