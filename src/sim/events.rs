//! Simulation events consumed by audio and UI collaborators.
//!
//! The simulation only records events; it never calls out. The engine drains
//! the queue once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::classes::ClassId;
use super::state::GamePhase;
use super::weapon::WeaponArchetype;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    RunStarted { class: ClassId, endless: bool },
    FloorStarted { floor: u32, boss: bool },
    Attack(WeaponArchetype),
    /// Enemy projectiles destroyed by a melee swing
    Deflect { count: usize },
    Hit { pos: Vec2, damage: f32, crit: bool },
    EnemyKilled { pos: Vec2, boss: bool, coins: u32 },
    PlayerHurt { damage: f32 },
    Revived,
    RoomCleared { floor: u32 },
    ClassAdvanced { from: ClassId, to: ClassId },
    RunEnded { victory: bool, floor: u32, coins_earned: u32 },
}

impl GameEvent {
    /// Whether the UI layer cares about this event
    pub fn is_ui(&self) -> bool {
        matches!(
            self,
            GameEvent::PhaseChanged { .. }
                | GameEvent::RunStarted { .. }
                | GameEvent::RunEnded { .. }
                | GameEvent::ClassAdvanced { .. }
        )
    }
}
