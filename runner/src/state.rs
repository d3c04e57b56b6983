use anyhow::{Context, Result};
use lifegrid::{DirectoryStore, Preferences};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const MAPS_DIR: &str = "Maps";
const PREFERENCES_FILE: &str = "preferences.json";

/// Process-level resources shared by the commands
pub struct AppState {
    pub data_dir: PathBuf,
    pub maps: DirectoryStore,
    pub threads: Option<usize>,
}

impl AppState {
    pub fn new(data_dir: &Path, threads: Option<usize>) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            maps: DirectoryStore::new(data_dir.join(MAPS_DIR)),
            threads,
        }
    }

    fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE)
    }

    /// Stored preferences, or empty ones if none were saved yet
    pub fn load_preferences(&self) -> Result<Preferences> {
        let path = self.preferences_path();
        match fs::read_to_string(&path) {
            Ok(json) => {
                debug!(path = %path.display(), "Loaded preferences");
                Preferences::from_json(&json)
                    .with_context(|| format!("Invalid preferences file {}", path.display()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Preferences::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    pub fn save_preferences(&self, prefs: &Preferences) -> Result<()> {
        let path = self.preferences_path();
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create {}", self.data_dir.display()))?;
        fs::write(&path, prefs.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), "Saved preferences");
        Ok(())
    }
}
