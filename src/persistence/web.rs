//! LocalStorage store for browser builds

use web_sys::Storage;

use super::{PersistError, Profile, ProgressStore};

#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new("abyss_arena_profile")
    }
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<Storage, PersistError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistError::Unavailable)
    }
}

impl ProgressStore for LocalStorageStore {
    fn load(&mut self) -> Result<Profile, PersistError> {
        let storage = Self::storage()?;
        match storage.get_item(&self.key) {
            Ok(Some(json)) => Ok(serde_json::from_str(&json)?),
            Ok(None) => Ok(Profile::default()),
            Err(_) => Err(PersistError::Unavailable),
        }
    }

    fn save(&mut self, profile: &Profile) -> Result<(), PersistError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(profile)?;
        storage
            .set_item(&self.key, &json)
            .map_err(|_| PersistError::Unavailable)?;
        log::info!("profile saved");
        Ok(())
    }
}
