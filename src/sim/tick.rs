//! Fixed timestep simulation tick
//!
//! One call advances combat by exactly one 60 Hz logic step.

use glam::Vec2;
use log::warn;

use super::collision::{check_player_death, resolve_collisions};
use super::entity::EnemyAction;
use super::state::{CoinRule, GameState};
use super::weapon;
use crate::error::SimError;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Start a dash this tick
    pub dash: bool,
    /// Attack button held
    pub fire: bool,
    /// Aim point in arena coordinates
    pub aim: Option<Vec2>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), SimError> {
    if !state.is_simulating() {
        return Ok(());
    }
    if state.player.is_none() {
        warn!("tick while playing without a player");
        return Ok(());
    }

    state.time_ticks += 1;
    state.spawn_due();

    let GameState {
        player,
        arena,
        tuning,
        floor,
        ..
    } = state;
    let Some(player) = player.as_mut() else {
        return Ok(());
    };
    let floor = *floor;

    // Player
    player.update(input);
    if input.dash {
        player.dash();
    }
    if let Some(aim) = input.aim.filter(|_| input.fire) {
        weapon::fire(player, arena, aim, tuning);
    }

    // Enemies
    for idx in 0..arena.enemies.len() {
        if arena.enemies[idx].is_dead() {
            continue;
        }
        let EnemyAction { melee, shot } = arena.enemies[idx].update(player.pos());
        if let Some(damage) = melee {
            arena.hurt_player(player, damage);
            if player.mods.thorns_damage > 0.0 {
                let thorns = player.mods.thorns_damage;
                arena.strike_enemy(player, idx, thorns, false, CoinRule::Ranged { floor });
            }
        }
        if let Some(shot) = shot {
            arena.projectiles.push(shot);
        }
    }

    // Projectiles
    for projectile in arena.projectiles.iter_mut() {
        projectile.update(&arena.enemies);
    }

    resolve_collisions(player, arena, floor);
    arena.effects.update();
    arena.sweep();

    check_finite(state)?;

    if state.is_room_cleared() {
        state.on_room_cleared();
    }

    let run_over = match state.player.as_mut() {
        Some(player) => check_player_death(player, &mut state.arena),
        None => false,
    };
    if run_over {
        state.game_over();
    }
    Ok(())
}

fn check_finite(state: &GameState) -> Result<(), SimError> {
    let tick = state.time_ticks;
    let player_ok = state
        .player
        .as_ref()
        .is_none_or(|p| p.body.is_finite() && p.hp.is_finite());
    if !player_ok {
        return Err(SimError::NonFiniteState {
            entity: "player",
            tick,
        });
    }
    if state.arena.enemies.iter().any(|e| !e.body.is_finite()) {
        return Err(SimError::NonFiniteState {
            entity: "enemy",
            tick,
        });
    }
    if state.arena.projectiles.iter().any(|p| !p.body.is_finite()) {
        return Err(SimError::NonFiniteState {
            entity: "projectile",
            tick,
        });
    }
    Ok(())
}
