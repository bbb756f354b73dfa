//! Collision detection and damage resolution
//!
//! Hitboxes are axis-aligned squares. Player projectiles are resolved against
//! every live enemy in spawn order; enemy projectiles only against the player.

use glam::Vec2;

use super::effects::{COLOR_GOLD, TextKind};
use super::entity::{Body, Faction, Player, Projectile};
use super::events::GameEvent;
use super::state::{Arena, CoinRule};
use crate::consts::*;

const COLOR_EXPLOSION: u32 = 0xf97316;

/// Square-vs-square overlap using the average of both edge lengths
#[inline]
pub fn aabb_overlap(a: &Body, b: &Body) -> bool {
    let reach = (a.size + b.size) / 2.0;
    let d = a.pos - b.pos;
    d.x.abs() < reach && d.y.abs() < reach
}

impl Arena {
    /// Apply damage to the player and record it. Returns the damage taken.
    pub fn hurt_player(&mut self, player: &mut Player, amount: f32) -> f32 {
        let taken = player.take_damage(amount);
        self.stats.damage_taken += taken;
        self.effects.text(
            &mut self.rng,
            player.pos() - Vec2::Y * 20.0,
            format!("-{}", taken.floor() as i64),
            TextKind::PlayerHurt,
        );
        self.emit(GameEvent::PlayerHurt { damage: taken });
        taken
    }
}

/// Resolve all projectile hits for this tick
pub fn resolve_collisions(player: &mut Player, arena: &mut Arena, floor: u32) {
    let projectiles = std::mem::take(&mut arena.projectiles);
    let mut survivors = Vec::with_capacity(projectiles.len());

    for mut projectile in projectiles {
        if !projectile.collides() || projectile.is_expired() {
            survivors.push(projectile);
            continue;
        }
        let destroyed = match projectile.faction {
            Faction::Player => player_projectile_hits(player, arena, &mut projectile, floor),
            Faction::Enemy => {
                let hit = aabb_overlap(&projectile.body, &player.body);
                if hit {
                    arena.hurt_player(player, projectile.damage);
                }
                hit
            }
        };
        if !destroyed {
            survivors.push(projectile);
        }
    }

    // Anything emitted while resolving stays after the survivors
    survivors.append(&mut arena.projectiles);
    arena.projectiles = survivors;
}

/// Run one player projectile against the enemy list. Returns true if it was
/// consumed.
///
/// A piercing projectile strikes each enemy at most once per flight.
fn player_projectile_hits(
    player: &mut Player,
    arena: &mut Arena,
    projectile: &mut Projectile,
    floor: u32,
) -> bool {
    let rule = CoinRule::Ranged { floor };
    for idx in 0..arena.enemies.len() {
        let enemy = &arena.enemies[idx];
        if enemy.is_dead()
            || projectile.hit.contains(&enemy.id)
            || !aabb_overlap(&projectile.body, &enemy.body)
        {
            continue;
        }
        projectile.hit.push(enemy.id);

        let crit = arena.roll_crit(player);
        let damage = if crit {
            projectile.damage * player.crit_multiplier
        } else {
            projectile.damage
        };
        if projectile.heal_on_hit > 0.0 {
            player.heal(projectile.heal_on_hit);
        }
        arena.strike_enemy(player, idx, damage, crit, rule);

        if projectile.explode_on_hit {
            explode(player, arena, projectile, idx, rule);
            return true;
        }
        if !projectile.pierce {
            return true;
        }
    }
    false
}

/// Splash every other live enemy around the projectile
fn explode(
    player: &mut Player,
    arena: &mut Arena,
    projectile: &Projectile,
    struck: usize,
    rule: CoinRule,
) {
    let center = projectile.body.pos;
    let splash = projectile.damage * EXPLOSION_DAMAGE_MULT;
    for idx in 0..arena.enemies.len() {
        let enemy = &arena.enemies[idx];
        if idx == struck || enemy.is_dead() || enemy.pos().distance(center) > EXPLOSION_RADIUS {
            continue;
        }
        arena.strike_enemy(player, idx, splash, false, rule);
    }
    arena.effects.burst(&mut arena.rng, center, COLOR_EXPLOSION, 12);
}

/// End-of-tick death check. Returns true if the run is over.
///
/// A pending revive is consumed instead of ending the run.
pub fn check_player_death(player: &mut Player, arena: &mut Arena) -> bool {
    if !player.is_dead() {
        return false;
    }
    if player.mods.revive {
        player.mods.revive = false;
        player.hp = player.max_hp * REVIVE_HP_FRACTION;
        arena
            .effects
            .burst(&mut arena.rng, player.pos(), COLOR_GOLD, 20);
        arena
            .effects
            .text(&mut arena.rng, player.pos(), "REVIVE", TextKind::Revive);
        arena.emit(GameEvent::Revived);
        log::debug!("revive consumed");
        return false;
    }
    true
}
