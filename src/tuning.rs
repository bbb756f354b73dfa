//! Data-driven game balance
//!
//! Every field has a default matching the shipped game, so a tuning file only
//! needs the values it changes.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::WeaponArchetype;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Balance and progression knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Floors in a normal run
    pub total_floors: u32,
    /// Floors that spawn a boss (and offer a class advancement)
    pub boss_floors: Vec<u32>,
    /// Every Nth floor leads to a rest room instead of a reward
    pub rest_every: u32,
    /// Wall time between a cleared room and the next screen
    pub transition_ms: f64,

    // === Spawning (in logic ticks) ===
    pub spawn_delay_ticks: u64,
    pub boss_spawn_delay_ticks: u64,
    pub boss_escorts: u32,
    /// Enemies in a normal room are `base_enemies + floor / 2`
    pub base_enemies: u32,
    pub spawn_min_distance: f32,
    pub spawn_attempts: u32,
    pub boss_corner_inset: f32,

    /// Rewards offered per reward room
    pub reward_choices: usize,
    /// Per-archetype base cooldowns replacing the registry values
    pub cooldown_overrides: HashMap<WeaponArchetype, u32>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            total_floors: 10,
            boss_floors: vec![3, 7, 10],
            rest_every: 3,
            transition_ms: 500.0,
            spawn_delay_ticks: 60,
            boss_spawn_delay_ticks: 30,
            boss_escorts: 2,
            base_enemies: 3,
            spawn_min_distance: 150.0,
            spawn_attempts: 20,
            boss_corner_inset: 80.0,
            reward_choices: 3,
            cooldown_overrides: HashMap::new(),
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.total_floors == 0 {
            return Err(TuningError::Invalid("total_floors must be at least 1".into()));
        }
        if self.rest_every == 0 {
            return Err(TuningError::Invalid("rest_every must be at least 1".into()));
        }
        if self.reward_choices == 0 {
            return Err(TuningError::Invalid("reward_choices must be at least 1".into()));
        }
        if !self.transition_ms.is_finite() || self.transition_ms < 0.0 {
            return Err(TuningError::Invalid("transition_ms must be non-negative".into()));
        }
        if let Some((w, _)) = self.cooldown_overrides.iter().find(|(_, cd)| **cd == 0) {
            return Err(TuningError::Invalid(format!("cooldown override for {w:?} is zero")));
        }
        Ok(())
    }

    /// Base cooldown for an archetype, honoring overrides
    pub fn cooldown(&self, archetype: WeaponArchetype) -> u32 {
        self.cooldown_overrides
            .get(&archetype)
            .copied()
            .unwrap_or_else(|| archetype.pattern().cooldown)
    }

    /// Minions queued for a normal floor
    pub fn room_enemy_count(&self, floor: u32) -> u32 {
        self.base_enemies + floor / 2
    }

    pub fn is_boss_floor(&self, floor: u32) -> bool {
        self.boss_floors.contains(&floor)
    }

    pub fn is_rest_floor(&self, floor: u32) -> bool {
        floor % self.rest_every == 0
    }
}
