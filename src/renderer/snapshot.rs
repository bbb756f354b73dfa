//! Read-only frame view handed to renderers

use serde::Serialize;

use crate::sim::{
    DamageText, Enemy, GamePhase, GameState, Particle, Player, Projectile, RunStats,
};

/// Everything a renderer may draw for one frame, borrowed from the state
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot<'a> {
    pub phase: GamePhase,
    pub paused: bool,
    pub floor: u32,
    pub total_floors: u32,
    pub endless: bool,
    pub boss_floor: bool,
    pub time_ticks: u64,
    pub player: Option<&'a Player>,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub particles: &'a [Particle],
    pub texts: &'a [DamageText],
    pub stats: &'a RunStats,
    /// Reward ids on offer while in the reward room
    pub reward_offer: &'a [u32],
    /// 0..1 while in the transition screen
    pub transition_progress: f32,
}

impl<'a> FrameSnapshot<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        let transition_progress = if state.tuning.transition_ms > 0.0 {
            (state.transition_ms / state.tuning.transition_ms).clamp(0.0, 1.0) as f32
        } else {
            1.0
        };
        Self {
            phase: state.phase,
            paused: state.paused,
            floor: state.floor,
            total_floors: state.tuning.total_floors,
            endless: state.endless,
            boss_floor: state.is_boss_floor(),
            time_ticks: state.time_ticks,
            player: state.player.as_ref(),
            enemies: &state.arena.enemies,
            projectiles: &state.arena.projectiles,
            particles: &state.arena.effects.particles,
            texts: &state.arena.effects.texts,
            stats: &state.arena.stats,
            reward_offer: &state.reward_offer.choices,
            transition_progress,
        }
    }

    /// Boss currently on the field, for the boss hp bar
    pub fn boss(&self) -> Option<&'a Enemy> {
        self.enemies.iter().find(|e| e.is_boss())
    }
}
