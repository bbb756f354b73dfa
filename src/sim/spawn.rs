//! Deferred enemy spawning
//!
//! Spawns are queued against the logic tick they are due on and polled at the
//! start of every tick. The queue being non-empty is what "still spawning"
//! means for the room-cleared check.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Minion,
    Boss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSpawn {
    pub due_tick: u64,
    pub kind: SpawnKind,
}

/// Tick-keyed spawn queue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnScheduler {
    /// Sorted by due tick
    queue: Vec<PendingSpawn>,
}

impl SpawnScheduler {
    pub fn schedule(&mut self, due_tick: u64, kind: SpawnKind) {
        let at = self.queue.partition_point(|p| p.due_tick <= due_tick);
        self.queue.insert(at, PendingSpawn { due_tick, kind });
    }

    /// Queue the encounter for a combat room starting at `now`
    pub fn plan_room(&mut self, now: u64, floor: u32, boss_floor: bool, tuning: &Tuning) {
        self.clear();
        if boss_floor {
            self.schedule(now + tuning.boss_spawn_delay_ticks, SpawnKind::Boss);
            for i in 1..=tuning.boss_escorts as u64 {
                self.schedule(now + i * tuning.spawn_delay_ticks, SpawnKind::Minion);
            }
        } else {
            let count = tuning.room_enemy_count(floor) as u64;
            for i in 0..count {
                self.schedule(now + i * tuning.spawn_delay_ticks, SpawnKind::Minion);
            }
        }
    }

    /// Remove and return every spawn due at or before `now`
    pub fn poll(&mut self, now: u64) -> Vec<SpawnKind> {
        let due = self.queue.partition_point(|p| p.due_tick <= now);
        self.queue.drain(..due).map(|p| p.kind).collect()
    }

    pub fn is_spawning(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Random point on the arena perimeter, preferring points at least
/// `min_distance` from the player. Falls back to the last candidate.
pub fn perimeter_position(
    rng: &mut Pcg32,
    player_pos: Option<Vec2>,
    min_distance: f32,
    attempts: u32,
) -> Vec2 {
    let margin = ARENA_MARGIN;
    let mut candidate = Vec2::new(margin, margin);
    for _ in 0..attempts.max(1) {
        let along_x = margin + rng.random::<f32>() * (ARENA_WIDTH - margin * 2.0);
        let along_y = margin + rng.random::<f32>() * (ARENA_HEIGHT - margin * 2.0);
        candidate = match rng.random_range(0..4) {
            0 => Vec2::new(along_x, margin),
            1 => Vec2::new(along_x, ARENA_HEIGHT - margin),
            2 => Vec2::new(margin, along_y),
            _ => Vec2::new(ARENA_WIDTH - margin, along_y),
        };
        match player_pos {
            Some(p) if candidate.distance(p) < min_distance => continue,
            _ => return candidate,
        }
    }
    candidate
}

/// Arena corner farthest from the player, inset from the walls
pub fn farthest_corner(player_pos: Option<Vec2>, inset: f32) -> Vec2 {
    let corners = [
        Vec2::new(inset, inset),
        Vec2::new(ARENA_WIDTH - inset, inset),
        Vec2::new(inset, ARENA_HEIGHT - inset),
        Vec2::new(ARENA_WIDTH - inset, ARENA_HEIGHT - inset),
    ];
    let Some(player) = player_pos else {
        return corners[0];
    };
    corners
        .into_iter()
        .max_by(|a, b| a.distance(player).total_cmp(&b.distance(player)))
        .unwrap_or(corners[0])
}
