//! Loaded dataset: ordered entries plus the asset lookup

use super::entry::{basename, Entry};
use std::collections::HashMap;

/// Asset contents keyed by basename
#[derive(Debug, Default, Clone)]
pub struct AssetMap {
    assets: HashMap<String, Vec<u8>>,
}

impl AssetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `contents` under the basename of `path`, returning what it replaced
    pub fn insert(&mut self, path: &str, contents: Vec<u8>) -> Option<Vec<u8>> {
        self.assets.insert(basename(path).to_string(), contents)
    }

    /// Resolve an image reference by exact basename match
    pub fn get(&self, image_ref: &str) -> Option<&[u8]> {
        self.assets.get(basename(image_ref)).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }
}

/// Entries in manifest order with their assets
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    pub entries: Vec<Entry>,
    pub assets: AssetMap,
}
