//! Abyss Arena - a floor-climbing arena combat roguelite
//!
//! Core modules:
//! - `sim`: Combat simulation (entities, weapons, projectiles, collisions, floors)
//! - `scheduler`: Fixed-step accumulator decoupling logic ticks from rendering
//! - `game`: Engine facade wiring the simulation to its collaborators
//! - `renderer`, `audio`, `platform`, `persistence`: Collaborator seams
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{CommandError, SimError};
pub use game::Game;
pub use scheduler::FixedStepScheduler;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logic ticks per second
    pub const LOGIC_HZ: f64 = 60.0;
    /// Fixed logic step in milliseconds
    pub const TICK_MS: f64 = 1000.0 / LOGIC_HZ;
    /// Largest wall-clock delta accepted per frame (avoids catch-up bursts after a stall)
    pub const MAX_FRAME_MS: f64 = 200.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 640.0;
    /// Player position is clamped this far inside the arena edge
    pub const ARENA_MARGIN: f32 = 40.0;
    /// Projectiles beyond the arena by more than this are culled
    pub const OUT_OF_BOUNDS_MARGIN: f32 = 50.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 32.0;
    pub const PLAYER_DASH_SPEED: f32 = 8.0;
    /// Dash duration in milliseconds, drained 16 ms per tick
    pub const PLAYER_DASH_MS: f32 = 200.0;
    pub const DASH_DRAIN_MS: f32 = 16.0;
    pub const DEFAULT_CRIT_MULTIPLIER: f32 = 2.0;
    /// Attack-speed window after a kill in berserker mode (2 seconds)
    pub const BERSERK_TICKS: u32 = 120;
    /// Fraction of max hp restored by a revive
    pub const REVIVE_HP_FRACTION: f32 = 0.5;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 20.0;
    pub const ENEMY_BASE_SPEED: f32 = 1.5;
    pub const ENEMY_MELEE_REACH: f32 = 30.0;
    pub const ENEMY_MELEE_COOLDOWN: i32 = 60;

    /// Boss defaults
    pub const BOSS_SIZE: f32 = 70.0;
    pub const BOSS_SPEED_MULT: f32 = 0.6;
    pub const BOSS_MELEE_REACH: f32 = 60.0;
    pub const BOSS_SHOOT_COOLDOWN: i32 = 90;
    pub const BOSS_SHOT_DAMAGE_MULT: f32 = 0.6;

    /// Projectile defaults
    pub const BULLET_SPEED: f32 = 8.0;
    pub const BULLET_SIZE: f32 = 8.0;
    pub const BULLET_LIFETIME: i32 = 100;
    pub const DEFAULT_TURN_RATE: f32 = 0.08;

    /// Melee arc defaults
    pub const SLASH_RANGE: f32 = 80.0;
    pub const SLASH_VISUAL_TICKS: i32 = 8;

    /// Explosion splash
    pub const EXPLOSION_RADIUS: f32 = 80.0;
    pub const EXPLOSION_DAMAGE_MULT: f32 = 0.7;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps_into_range() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-1.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_tick_rate_constants_agree() {
        assert!((consts::TICK_MS * consts::LOGIC_HZ - 1000.0).abs() < 1e-9);
    }
}
