//! JSON file store for native builds

use std::io::ErrorKind;
use std::path::PathBuf;

use super::{PersistError, Profile, ProgressStore};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&mut self) -> Result<Profile, PersistError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("no profile at {}, starting fresh", self.path.display());
                Ok(Profile::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, profile: &Profile) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        // Write then rename
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(profile)?)?;
        std::fs::rename(&tmp, &self.path)?;
        log::debug!("profile saved to {}", self.path.display());
        Ok(())
    }
}
