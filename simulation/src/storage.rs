//! Map storage - byte-level load/save keyed by map name

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::error::{LifeError, Result};

const MAP_EXTENSION: &str = "json";

pub trait MapStore {
    fn read_all(&self, name: &str) -> Result<Vec<u8>>;
    fn write_all(&self, name: &str, bytes: &[u8]) -> Result<()>;
    /// Stored map names, sorted
    fn list(&self) -> Result<Vec<String>>;
}

/// Names become file stems, so anything path-like is refused.
pub fn validate_map_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name.starts_with('.')
        || name.contains(['/', '\\', ':', '\0'])
    {
        return Err(LifeError::InvalidMapName(name.to_string()));
    }
    Ok(())
}

// ============================================================================
// Directory Store
// ============================================================================

/// One `<name>.json` file per map under `root`
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_map_name(name)?;
        Ok(self.root.join(format!("{}.{}", name, MAP_EXTENSION)))
    }
}

impl MapStore for DirectoryStore {
    fn read_all(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(name)?;
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "Read map");
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(LifeError::MapNotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.root)?;
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote map");
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(MAP_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// ============================================================================
// Memory Store
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    maps: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MapStore for MemoryStore {
    fn read_all(&self, name: &str) -> Result<Vec<u8>> {
        validate_map_name(name)?;
        let maps = self.maps.lock().unwrap_or_else(|e| e.into_inner());
        maps.get(name)
            .cloned()
            .ok_or_else(|| LifeError::MapNotFound(name.to_string()))
    }

    fn write_all(&self, name: &str, bytes: &[u8]) -> Result<()> {
        validate_map_name(name)?;
        let mut maps = self.maps.lock().unwrap_or_else(|e| e.into_inner());
        maps.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let maps = self.maps.lock().unwrap_or_else(|e| e.into_inner());
        Ok(maps.keys().cloned().collect())
    }
}
