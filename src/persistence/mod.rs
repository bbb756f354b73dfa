//! Cross-run progress persistence
//!
//! A [`Profile`] is read when a run starts and written when it ends. Stores:
//! - [`MemoryStore`]: tests and throwaway sessions
//! - [`JsonFileStore`]: native builds
//! - [`LocalStorageStore`]: browser builds

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
}

/// Totals carried across runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub coins: u64,
    pub total_runs: u32,
    pub victories: u32,
}

impl Profile {
    /// Fold a finished run into the totals
    pub fn record_run(&mut self, victory: bool, coins_earned: u32) {
        self.total_runs += 1;
        self.coins += u64::from(coins_earned);
        if victory {
            self.victories += 1;
        }
    }
}

pub trait ProgressStore {
    fn load(&mut self) -> Result<Profile, PersistError>;
    fn save(&mut self, profile: &Profile) -> Result<(), PersistError>;
}

/// In-memory store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub profile: Option<Profile>,
}

impl ProgressStore for MemoryStore {
    fn load(&mut self) -> Result<Profile, PersistError> {
        Ok(self.profile.clone().unwrap_or_default())
    }

    fn save(&mut self, profile: &Profile) -> Result<(), PersistError> {
        self.profile = Some(profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_run_totals() {
        let mut p = Profile::default();
        p.record_run(false, 40);
        p.record_run(true, 100);
        assert_eq!(p.total_runs, 2);
        assert_eq!(p.victories, 1);
        assert_eq!(p.coins, 140);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::default();
        assert_eq!(store.load().unwrap(), Profile::default());
        let p = Profile {
            coins: 12,
            total_runs: 3,
            victories: 1,
        };
        store.save(&p).unwrap();
        assert_eq!(store.load().unwrap(), p);
    }

    #[test]
    fn test_profile_tolerates_missing_fields() {
        let p: Profile = serde_json::from_str(r#"{ "coins": 7 }"#).unwrap();
        assert_eq!(p.coins, 7);
        assert_eq!(p.total_runs, 0);
    }
}
