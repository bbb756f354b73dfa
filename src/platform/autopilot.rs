//! Scripted input for headless runs
//!
//! Aims at the nearest enemy, keeps its distance and strafes around it.
//! Purely a function of the observed state, so a seeded run stays repeatable.

use glam::Vec2;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::sim::{GameState, TickInput};

/// Closer than this the autopilot backs off
const RETREAT_DISTANCE: f32 = 120.0;
/// Farther than this it closes in (melee classes need to be near)
const ENGAGE_DISTANCE: f32 = 220.0;
/// Ticks between strafe direction flips
const STRAFE_PERIOD: u64 = 90;
/// Dash away when below this hp fraction with an enemy in reach
const PANIC_HP: f32 = 0.35;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    dashes: u32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dashes requested so far
    pub fn dashes(&self) -> u32 {
        self.dashes
    }

    pub fn next_input(&mut self, state: &GameState) -> TickInput {
        let Some(player) = state.player.as_ref() else {
            return TickInput::default();
        };
        let pos = player.pos();
        let target = state
            .arena
            .enemies
            .iter()
            .filter(|e| !e.is_dead())
            .map(|e| e.pos())
            .min_by(|a, b| a.distance_squared(pos).total_cmp(&b.distance_squared(pos)));

        let Some(target) = target else {
            // Nothing to fight yet; drift back toward the middle
            let center = Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0);
            return steer(center - pos, None);
        };

        let to_target = target - pos;
        let dist = to_target.length();
        let strafe = if (state.time_ticks / STRAFE_PERIOD) % 2 == 0 {
            to_target.perp()
        } else {
            -to_target.perp()
        };
        let wanted = if dist < RETREAT_DISTANCE {
            -to_target + strafe * 0.5
        } else if dist > ENGAGE_DISTANCE {
            to_target
        } else {
            strafe
        };

        let mut input = steer(wanted, Some(target));
        let hurt = player.hp < player.max_hp * PANIC_HP;
        if hurt && dist < RETREAT_DISTANCE && !player.dashing {
            input.dash = true;
            self.dashes += 1;
        }
        input
    }
}

fn steer(dir: Vec2, aim: Option<Vec2>) -> TickInput {
    // Dead zone keeps the player from jittering on one axis
    const DEAD: f32 = 0.25;
    let dir = dir.normalize_or_zero();
    TickInput {
        up: dir.y < -DEAD,
        down: dir.y > DEAD,
        left: dir.x < -DEAD,
        right: dir.x > DEAD,
        dash: false,
        fire: aim.is_some(),
        aim,
    }
}
