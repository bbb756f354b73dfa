//! Game state and the shared combat context
//!
//! [`Arena`] bundles everything weapons and collisions mutate (enemy and
//! projectile lists, effects, run stats, the event queue, the RNG) so it can
//! be passed explicitly instead of reached through a back-reference.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::classes::ClassId;
use super::effects::{COLOR_GOLD, Effects, TextKind};
use super::entity::{Enemy, Player, Projectile};
use super::events::GameEvent;
use super::spawn::SpawnScheduler;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    Menu,
    /// Choosing a starting class
    ClassSelect,
    /// Active combat room
    Playing,
    /// Short pause after a room is cleared
    Transition,
    /// Pick one of three rewards
    Reward,
    /// Free bonus plus shop
    Rest,
    /// Choose a class advancement after a boss floor
    ClassAdvance,
    /// Final floor cleared; keep going or cash out
    Victory,
    /// Run over
    End { victory: bool },
}

/// Per-run counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub kills: u32,
    pub coins_earned: u32,
    pub damage_taken: f32,
    pub floors_cleared: u32,
}

/// How many coins a kill pays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinRule {
    /// Killed by a melee swing
    Melee,
    /// Killed by a projectile or splash on the given floor
    Ranged { floor: u32 },
}

impl CoinRule {
    /// Guaranteed part of the payout, before the random bonus
    pub fn base(self, boss: bool) -> u32 {
        match (self, boss) {
            (CoinRule::Melee, true) => 15,
            (CoinRule::Melee, false) => 5,
            (CoinRule::Ranged { .. }, true) => 20,
            (CoinRule::Ranged { floor }, false) => 5 + (1.5 * floor as f32).floor() as u32,
        }
    }
}

/// Mutable combat context shared by weapons, projectiles and collisions
#[derive(Debug, Clone)]
pub struct Arena {
    /// Live enemies in spawn order
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub effects: Effects,
    pub stats: RunStats,
    /// Pending events, drained by the engine every frame
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
    next_id: u32,
}

impl Arena {
    pub fn new(seed: u64) -> Self {
        Self {
            enemies: Vec::new(),
            projectiles: Vec::new(),
            effects: Effects::default(),
            stats: RunStats::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Player flying swords currently in flight
    pub fn live_swords(&self) -> usize {
        self.projectiles.iter().filter(|p| p.is_sword()).count()
    }

    pub fn live_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| !e.is_dead()).count()
    }

    /// Roll a crit for the player
    pub fn roll_crit(&mut self, player: &Player) -> bool {
        self.rng.random::<f32>() < player.crit_chance
    }

    /// Damage the enemy at `idx` and pay out if it dies.
    ///
    /// Dead enemies are skipped; removal happens in [`Arena::sweep`].
    /// Returns true if this strike killed the enemy.
    pub fn strike_enemy(
        &mut self,
        player: &mut Player,
        idx: usize,
        damage: f32,
        crit: bool,
        rule: CoinRule,
    ) -> bool {
        let Some(enemy) = self.enemies.get_mut(idx) else {
            return false;
        };
        if enemy.is_dead() {
            return false;
        }
        let killed = enemy.take_damage(damage);
        let pos = enemy.pos();
        let boss = enemy.is_boss();
        let color = enemy.archetype.color();

        let kind = if crit { TextKind::Crit } else { TextKind::Damage };
        self.effects.text(
            &mut self.rng,
            pos - Vec2::Y * 10.0,
            format!("{}", damage.floor() as i64),
            kind,
        );
        self.events.push(GameEvent::Hit { pos, damage, crit });

        if killed {
            self.pay_kill(player, pos, boss, color, damage, rule);
        }
        killed
    }

    fn pay_kill(
        &mut self,
        player: &mut Player,
        pos: Vec2,
        boss: bool,
        color: u32,
        damage: f32,
        rule: CoinRule,
    ) {
        let coins = rule.base(boss) + self.rng.random_range(0..5);
        player.coins += coins;
        self.stats.kills += 1;
        self.stats.coins_earned += coins;

        let text_pos = if player.mods.magnet_range > 0.0 {
            player.pos()
        } else {
            pos + Vec2::Y * 10.0
        };
        self.effects
            .text(&mut self.rng, text_pos, format!("+{coins}"), TextKind::Coins);

        player.on_kill_enemy();
        if player.life_steal > 0.0 {
            player.heal(damage * player.life_steal);
        }

        self.effects.burst(&mut self.rng, pos, color, 8);
        if boss {
            self.effects.burst(&mut self.rng, pos, COLOR_GOLD, 8);
        }
        self.events.push(GameEvent::EnemyKilled { pos, boss, coins });
    }

    /// Drop dead enemies and expired projectiles
    pub fn sweep(&mut self) {
        self.enemies.retain(|e| !e.is_dead());
        self.projectiles.retain(|p| !p.is_expired());
    }

    /// Empty the room for a new encounter
    pub fn clear_room(&mut self) {
        self.enemies.clear();
        self.projectiles.clear();
    }

    /// Full reset for a new run
    pub fn reset(&mut self) {
        self.clear_room();
        self.effects.clear();
        self.stats = RunStats::default();
    }
}

/// Offer shown in the reward room
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardOffer {
    pub choices: Vec<u32>,
}

/// Per-visit rest room state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestVisit {
    pub bonus_claimed: bool,
    /// Shop items already bought this visit
    pub sold: Vec<u32>,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Orthogonal to the phase; only meaningful while playing
    pub paused: bool,
    /// Current floor, 1-based (0 before the first room)
    pub floor: u32,
    pub endless: bool,
    /// Logic ticks since the session started
    pub time_ticks: u64,
    /// Wall time spent in the current transition
    pub transition_ms: f64,
    pub player: Option<Player>,
    /// Chosen at class select; survives until the run ends
    pub class: Option<ClassId>,
    pub arena: Arena,
    pub spawner: SpawnScheduler,
    pub reward_offer: RewardOffer,
    pub rest: RestVisit,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            tuning,
            phase: GamePhase::Menu,
            paused: false,
            floor: 0,
            endless: false,
            time_ticks: 0,
            transition_ms: 0.0,
            player: None,
            class: None,
            arena: Arena::new(seed),
            spawner: SpawnScheduler::default(),
            reward_offer: RewardOffer::default(),
            rest: RestVisit::default(),
        }
    }

    /// Move to a new phase, recording the change for the UI
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from != to {
            log::debug!("phase {from:?} -> {to:?}");
            self.phase = to;
            self.arena.emit(GameEvent::PhaseChanged { from, to });
        }
    }

    pub fn is_boss_floor(&self) -> bool {
        self.tuning.boss_floors.contains(&self.floor)
    }

    /// Playing and not paused
    pub fn is_simulating(&self) -> bool {
        self.phase == GamePhase::Playing && !self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EnemyArchetype;

    #[test]
    fn test_coin_rules() {
        assert_eq!(CoinRule::Melee.base(false), 5);
        assert_eq!(CoinRule::Melee.base(true), 15);
        assert_eq!(CoinRule::Ranged { floor: 4 }.base(false), 11);
        assert_eq!(CoinRule::Ranged { floor: 4 }.base(true), 20);
    }

    #[test]
    fn test_strike_skips_dead_enemy() {
        let mut arena = Arena::new(3);
        let mut player = Player::new(Vec2::ZERO, &ClassId::Warrior.def());
        let mut e = Enemy::minion(1, Vec2::new(10.0, 10.0), 1, EnemyArchetype::Slime);
        e.hp = 0.0;
        arena.enemies.push(e);
        assert!(!arena.strike_enemy(&mut player, 0, 5.0, false, CoinRule::Melee));
        assert!(!arena.strike_enemy(&mut player, 9, 5.0, false, CoinRule::Melee));
        assert_eq!(arena.stats.kills, 0);
    }

    #[test]
    fn test_magnet_routes_coin_text_to_player() {
        let mut arena = Arena::new(3);
        let mut player = Player::new(Vec2::new(500.0, 500.0), &ClassId::Warrior.def());
        player.mods.magnet_range = 120.0;
        arena
            .enemies
            .push(Enemy::minion(1, Vec2::new(100.0, 100.0), 1, EnemyArchetype::Slime));
        assert!(arena.strike_enemy(&mut player, 0, 1000.0, false, CoinRule::Ranged { floor: 1 }));

        let coin_text = arena
            .effects
            .texts
            .iter()
            .find(|t| t.kind == TextKind::Coins)
            .map(|t| t.pos);
        let Some(pos) = coin_text else {
            panic!("no coin text recorded");
        };
        assert!((pos.y - 500.0).abs() < 1e-3);
        assert!((pos.x - 500.0).abs() <= 10.0);
    }

    #[test]
    fn test_kill_lifesteal_and_berserk() {
        let mut arena = Arena::new(3);
        let mut player = Player::new(Vec2::ZERO, &ClassId::Warrior.def());
        player.hp = 50.0;
        player.life_steal = 0.1;
        player.mods.berserker_mode = true;
        arena
            .enemies
            .push(Enemy::minion(1, Vec2::new(50.0, 50.0), 1, EnemyArchetype::Slime));
        arena.strike_enemy(&mut player, 0, 100.0, false, CoinRule::Melee);
        assert_eq!(player.hp, 60.0);
        assert!(player.berserker_timer > 0);
    }
}
