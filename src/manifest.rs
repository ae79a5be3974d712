//! The public asset manifest (`mix-manifest.json`)

use crate::error::Result;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Maps public asset paths to their (possibly versioned) URLs
#[derive(Debug, Clone)]
pub struct AssetManifest {
    path: PathBuf,
    entries: IndexMap<String, String>,
}

impl AssetManifest {
    /// Start an empty manifest that will be written to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: IndexMap::new(),
        }
    }

    /// Read the manifest at `path`, or start empty when it does not exist
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self::new(path));
        }

        let content = std::fs::read_to_string(&path)?;
        let entries = serde_json::from_str(&content)?;
        Ok(Self { path, entries })
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
