//! Named mapping store
//!
//! Saves opaque configuration bundles (query strings) under a name. The
//! storage medium sits behind [`MappingStore`] so scoring never depends on
//! it. [`FileStore`] keeps a JSON object on disk and replaces it atomically.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default store location relative to the working directory
pub const DEFAULT_STORE_PATH: &str = ".riskcalc/mappings.json";

/// A stored name/value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMapping {
    pub name: String,
    pub value: String,
}

/// Key-value store for named configuration bundles
pub trait MappingStore {
    fn set(&mut self, name: &str, value: &str) -> Result<()>;
    fn get(&self, name: &str) -> Result<Option<String>>;
    /// Remove an entry; returns whether it existed
    fn delete(&mut self, name: &str) -> Result<bool>;
    /// All entries sorted by name
    fn list(&self) -> Result<Vec<StoredMapping>>;
}

fn check_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("mapping name must not be empty");
    }
    Ok(name)
}

fn to_list(entries: &BTreeMap<String, String>) -> Vec<StoredMapping> {
    entries
        .iter()
        .map(|(name, value)| StoredMapping {
            name: name.clone(),
            value: value.clone(),
        })
        .collect()
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MappingStore for MemoryStore {
    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let name = check_name(name)?;
        self.entries.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.entries.get(name.trim()).cloned())
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        Ok(self.entries.remove(name.trim()).is_some())
    }

    fn list(&self) -> Result<Vec<StoredMapping>> {
        Ok(to_list(&self.entries))
    }
}

/// JSON-file store: `{ "name": "value", ... }`
///
/// Every operation reads the file; writes go through a temp file + rename.
/// A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read mapping store: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse mapping store: {}", self.path.display()))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json =
            serde_json::to_string_pretty(entries).context("failed to serialize mapping store")?;
        atomic_write(&self.path, &json)
    }
}

impl MappingStore for FileStore {
    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let name = check_name(name)?;
        let mut entries = self.load()?;
        entries.insert(name.to_string(), value.to_string());
        self.save(&entries)
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(name.trim()))
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        let mut entries = self.load()?;
        if entries.remove(name.trim()).is_none() {
            return Ok(false);
        }
        self.save(&entries)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<StoredMapping>> {
        Ok(to_list(&self.load()?))
    }
}

/// Temp file beside the store: `mappings.json` -> `.mappings.json.riskcalc-tmp`
///
/// Derived from the full file name so it never collides with a sibling
/// `mappings.tmp` or another store in the same directory.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mappings".to_string());
    path.with_file_name(format!(".{}.riskcalc-tmp", name))
}

/// Replace the store file in one rename; a failed write leaves the old file
pub fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    use std::fs;
    use std::io::Write;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create store directory: {}", parent.display()))?;
    }

    let temp_path = temp_path_for(path);
    let written = fs::File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&temp_path, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("failed to write mapping store: {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &mut dyn MappingStore) {
        assert_eq!(store.get("team").unwrap(), None);
        store.set("team", "mapping=A").unwrap();
        store.set("audit", "mapping=B").unwrap();
        store.set("team", "mapping=C").unwrap();
        assert_eq!(store.get("team").unwrap().as_deref(), Some("mapping=C"));

        let names: Vec<String> = store.list().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["audit", "team"]);

        assert!(store.delete("team").unwrap());
        assert!(!store.delete("team").unwrap());
        assert_eq!(store.list().unwrap().len(), 1);
        assert!(store.set("  ", "x").is_err());
    }

    #[test]
    fn test_memory_store() {
        exercise(&mut MemoryStore::new());
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested").join("mappings.json"));
        exercise(&mut store);
        assert!(store.path().exists());
        assert!(!temp_path_for(store.path()).exists());
    }

    #[test]
    fn test_file_store_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");
        FileStore::new(&path).set("saved", "vector=x").unwrap();
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("saved").unwrap().as_deref(), Some("vector=x"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileStore::new(&path).list().is_err());
    }

    #[test]
    fn test_write_leaves_sibling_tmp_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let sibling = dir.path().join("mappings.tmp");
        std::fs::write(&sibling, "unrelated").unwrap();

        let mut store = FileStore::new(dir.path().join("mappings.json"));
        store.set("team", "mapping=A").unwrap();

        assert_eq!(std::fs::read_to_string(&sibling).unwrap(), "unrelated");
        assert_eq!(
            temp_path_for(store.path()),
            dir.path().join(".mappings.json.riskcalc-tmp")
        );
        assert_eq!(store.get("team").unwrap().as_deref(), Some("mapping=A"));
    }
}
