//! Entity model: one shared kinematic body plus per-kind payloads
//!
//! Player, enemies (minions and bosses) and projectiles all carry a [`Body`].
//! Behavior differences are expressed as tagged variants matched at the call
//! site rather than overridden methods.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arc::SlashArc;
use super::classes::{ClassDef, ClassId};
use super::tick::TickInput;
use super::weapon::WeaponArchetype;
use crate::consts::*;

/// Which side an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

/// Shared kinematic record. Velocities are in arena units per logic tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Edge length of the square hitbox
    pub size: f32,
}

impl Body {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    /// Integrate position by velocity
    #[inline]
    pub fn advance(&mut self, dt_ticks: f32) {
        self.pos += self.vel * dt_ticks;
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Modifiers accumulated from rewards and the shop.
///
/// Every field has an explicit neutral default so attack math never has to
/// special-case a missing modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Additional projectiles per volley
    pub extra_bullets: u32,
    /// Any value above zero makes emitted projectiles pierce
    pub pierce_count: u32,
    /// Damage reflected onto an enemy that lands a melee hit
    pub thorns_damage: f32,
    pub slash_range: f32,
    /// Projectile range overriding every archetype default once upgraded
    pub ranged_range: Option<f32>,
    pub bullet_size_mult: f32,
    pub bullet_damage_mult: f32,
    /// Coins fly to the player when above zero
    pub magnet_range: f32,
    /// Stack count, starts at 1
    pub multi_shot: u32,
    /// Multiplies weapon cooldowns (lower is faster)
    pub attack_speed_mult: f32,
    pub berserker_mode: bool,
    /// One-shot revive on death
    pub revive: bool,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            extra_bullets: 0,
            pierce_count: 0,
            thorns_damage: 0.0,
            slash_range: SLASH_RANGE,
            ranged_range: None,
            bullet_size_mult: 1.0,
            bullet_damage_mult: 1.0,
            magnet_range: 0.0,
            multi_shot: 1,
            attack_speed_mult: 1.0,
            berserker_mode: false,
            revive: false,
        }
    }
}

/// The player-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub class: ClassId,
    pub weapon: WeaponArchetype,
    pub max_hp: f32,
    pub hp: f32,
    pub damage: f32,
    pub speed: f32,
    pub armor: f32,
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    pub life_steal: f32,
    pub mods: Modifiers,
    pub coins: u32,
    pub dashing: bool,
    /// Remaining dash time in milliseconds
    pub dash_ms: f32,
    /// Ticks until the weapon can fire again
    pub shoot_cooldown: u32,
    /// Ticks left in the berserk attack-speed window
    pub berserker_timer: u32,
}

impl Player {
    pub fn new(pos: Vec2, class: &ClassDef) -> Self {
        Self {
            body: Body::new(pos, PLAYER_SIZE),
            class: class.id,
            weapon: class.weapon,
            max_hp: class.base_hp,
            hp: class.base_hp,
            damage: class.base_damage,
            speed: class.base_speed,
            armor: 0.0,
            crit_chance: 0.0,
            crit_multiplier: DEFAULT_CRIT_MULTIPLIER,
            life_steal: 0.0,
            mods: Modifiers::default(),
            coins: 0,
            dashing: false,
            dash_ms: 0.0,
            shoot_cooldown: 0,
            berserker_timer: 0,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Per-tick movement and timer update
    pub fn update(&mut self, input: &TickInput) {
        if self.dashing {
            self.dash_ms -= DASH_DRAIN_MS;
            if self.dash_ms <= 0.0 {
                self.dashing = false;
            }
        }

        self.berserker_timer = self.berserker_timer.saturating_sub(1);

        let move_speed = if self.dashing {
            PLAYER_DASH_SPEED
        } else {
            self.speed
        };
        let mut vel = Vec2::ZERO;
        if input.up {
            vel.y = -move_speed;
        }
        if input.down {
            vel.y = move_speed;
        }
        if input.left {
            vel.x = -move_speed;
        }
        if input.right {
            vel.x = move_speed;
        }
        // Diagonals use a constant factor, not a renormalized vector
        if vel.x != 0.0 && vel.y != 0.0 {
            vel *= FRAC_1_SQRT_2;
        }
        self.body.vel = vel;
        self.body.advance(1.0);

        self.body.pos.x = self
            .body
            .pos
            .x
            .clamp(ARENA_MARGIN, ARENA_WIDTH - ARENA_MARGIN);
        self.body.pos.y = self
            .body
            .pos
            .y
            .clamp(ARENA_MARGIN, ARENA_HEIGHT - ARENA_MARGIN);

        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
    }

    /// Start a dash if moving and not already dashing
    pub fn dash(&mut self) {
        if !self.dashing && self.body.vel != Vec2::ZERO {
            self.dashing = true;
            self.dash_ms = PLAYER_DASH_MS;
        }
    }

    /// Weapon cooldown after attack-speed and berserk modifiers, at least one tick
    pub fn adjusted_cooldown(&self, base: u32) -> u32 {
        let mut cooldown = base as f32 * self.mods.attack_speed_mult;
        if self.mods.berserker_mode && self.berserker_timer > 0 {
            cooldown *= 0.5;
        }
        (cooldown.floor() as u32).max(1)
    }

    /// Kill hook: arms the berserk window when berserker mode is active
    pub fn on_kill_enemy(&mut self) {
        if self.mods.berserker_mode {
            self.berserker_timer = BERSERK_TICKS;
        }
    }

    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    /// Apply incoming damage. Returns the damage actually taken after armor.
    ///
    /// Lifesteal heals off the raw incoming amount, not the armored one.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let final_damage = (amount - self.armor).max(1.0);
        self.hp -= final_damage;

        if self.life_steal > 0.0 && amount > 0.0 {
            self.heal(amount * self.life_steal);
        }

        final_damage
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Swap in an advanced class's stat table, keeping the hp ratio
    pub fn advance_class(&mut self, class: &ClassDef) {
        let hp_ratio = if self.max_hp > 0.0 {
            self.hp / self.max_hp
        } else {
            1.0
        };
        self.class = class.id;
        self.weapon = class.weapon;
        self.max_hp = class.base_hp;
        self.hp = self.max_hp * hp_ratio;
        self.damage = class.base_damage;
        self.speed = class.base_speed;
    }
}

// ---------------------------------------------------------------------------
// Enemies
// ---------------------------------------------------------------------------

/// Flavor archetype; only scales stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyArchetype {
    Slime,
    Bat,
    Skeleton,
    Ghost,
    Orc,
    Demon,
    Wraith,
    Golem,
}

impl EnemyArchetype {
    pub const ALL: [EnemyArchetype; 8] = [
        EnemyArchetype::Slime,
        EnemyArchetype::Bat,
        EnemyArchetype::Skeleton,
        EnemyArchetype::Ghost,
        EnemyArchetype::Orc,
        EnemyArchetype::Demon,
        EnemyArchetype::Wraith,
        EnemyArchetype::Golem,
    ];

    /// (hp, damage, speed) multipliers
    pub fn multipliers(self) -> (f32, f32, f32) {
        match self {
            EnemyArchetype::Slime => (1.0, 1.0, 1.0),
            EnemyArchetype::Bat => (0.7, 0.8, 1.6),
            EnemyArchetype::Skeleton => (1.3, 1.3, 1.1),
            EnemyArchetype::Ghost => (1.0, 1.5, 1.3),
            EnemyArchetype::Orc => (1.8, 1.4, 0.8),
            EnemyArchetype::Demon => (1.5, 1.8, 1.2),
            EnemyArchetype::Wraith => (1.2, 2.0, 1.5),
            EnemyArchetype::Golem => (2.5, 1.5, 0.6),
        }
    }

    /// Inclusive floor band this archetype appears on
    pub fn floors(self) -> (u32, u32) {
        match self {
            EnemyArchetype::Slime | EnemyArchetype::Bat => (1, 3),
            EnemyArchetype::Skeleton | EnemyArchetype::Ghost | EnemyArchetype::Orc => (4, 6),
            EnemyArchetype::Demon | EnemyArchetype::Wraith | EnemyArchetype::Golem => (7, 10),
        }
    }

    pub fn color(self) -> u32 {
        match self {
            EnemyArchetype::Slime => 0x22c55e,
            EnemyArchetype::Bat => 0x8b5cf6,
            EnemyArchetype::Skeleton => 0xd4d4d8,
            EnemyArchetype::Ghost => 0x67e8f9,
            EnemyArchetype::Orc => 0x84cc16,
            EnemyArchetype::Demon => 0xdc2626,
            EnemyArchetype::Wraith => 0x6366f1,
            EnemyArchetype::Golem => 0x78716c,
        }
    }

    /// Pick a random archetype for a floor. Floors past the table use the
    /// last band.
    pub fn roll(rng: &mut Pcg32, floor: u32) -> Self {
        let last_band = Self::ALL.iter().map(|a| a.floors().1).max().unwrap_or(1);
        let floor = floor.clamp(1, last_band);
        let available: Vec<_> = Self::ALL
            .iter()
            .copied()
            .filter(|a| {
                let (lo, hi) = a.floors();
                (lo..=hi).contains(&floor)
            })
            .collect();
        if available.is_empty() {
            return EnemyArchetype::Slime;
        }
        available[rng.random_range(0..available.len())]
    }
}

/// Minion or boss; the boss runs its own movement and ranged attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    Minion,
    Boss { shoot_cooldown: i32 },
}

/// What an enemy did to the player this tick. A boss can do both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnemyAction {
    /// Contact attack for this much raw damage
    pub melee: Option<f32>,
    /// Ranged shot to add to the projectile list
    pub shot: Option<Projectile>,
}

impl EnemyAction {
    pub fn is_idle(&self) -> bool {
        self.melee.is_none() && self.shot.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    pub archetype: EnemyArchetype,
    pub kind: EnemyKind,
    pub max_hp: f32,
    pub hp: f32,
    pub damage: f32,
    pub speed: f32,
    pub attack_cooldown: i32,
}

impl Enemy {
    /// Regular floor enemy scaled by floor and archetype
    pub fn minion(id: u32, pos: Vec2, floor: u32, archetype: EnemyArchetype) -> Self {
        let (hp_mult, dmg_mult, speed_mult) = archetype.multipliers();
        let floor = floor as f32;
        let max_hp = ((30.0 + floor * 10.0) * hp_mult).floor();
        Self {
            id,
            body: Body::new(pos, ENEMY_SIZE),
            archetype,
            kind: EnemyKind::Minion,
            max_hp,
            hp: max_hp,
            damage: ((10.0 + floor * 2.0) * dmg_mult).floor(),
            speed: ENEMY_BASE_SPEED * speed_mult,
            attack_cooldown: 0,
        }
    }

    /// Floor boss: large, slow, tanky, with a ranged attack
    pub fn boss(id: u32, pos: Vec2, floor: u32, archetype: EnemyArchetype) -> Self {
        let f = floor as f32;
        let max_hp = 500.0 + f * 100.0;
        Self {
            id,
            body: Body::new(pos, BOSS_SIZE),
            archetype,
            kind: EnemyKind::Boss { shoot_cooldown: 0 },
            max_hp,
            hp: max_hp,
            damage: 10.0 + f * 3.0,
            speed: ENEMY_BASE_SPEED * BOSS_SPEED_MULT,
            attack_cooldown: 0,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss { .. })
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Subtract damage. Returns true if this left the enemy at or below zero hp.
    /// Negative amounts are ignored.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.hp -= amount.max(0.0);
        self.hp <= 0.0
    }

    /// Chase the player, attack in reach, and for bosses fire on cooldown
    pub fn update(&mut self, player_pos: Vec2) -> EnemyAction {
        let delta = player_pos - self.body.pos;
        let dist = delta.length();
        let reach = if self.is_boss() {
            BOSS_MELEE_REACH
        } else {
            ENEMY_MELEE_REACH
        };

        let mut action = EnemyAction::default();
        if dist > reach {
            self.body.vel = delta / dist * self.speed;
        } else {
            self.body.vel = Vec2::ZERO;
            if self.attack_cooldown <= 0 {
                action.melee = Some(self.damage);
                self.attack_cooldown = ENEMY_MELEE_COOLDOWN;
            }
        }
        self.attack_cooldown -= 1;

        if let EnemyKind::Boss {
            ref mut shoot_cooldown,
        } = self.kind
        {
            *shoot_cooldown -= 1;
            if *shoot_cooldown <= 0 {
                *shoot_cooldown = BOSS_SHOOT_COOLDOWN;
                if dist > 0.0 {
                    action.shot = Some(Projectile::enemy_shot(
                        self.body.pos,
                        delta / dist,
                        self.damage * BOSS_SHOT_DAMAGE_MULT,
                    ));
                }
            }
        }

        self.body.advance(1.0);
        action
    }
}

// ---------------------------------------------------------------------------
// Projectiles
// ---------------------------------------------------------------------------

/// Render/behavior tag for a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileTag {
    /// Zero-damage visual for a melee arc
    MeleeSlash,
    Magic,
    Elemental,
    Arrow,
    Snipe,
    Shadow,
    Shuriken,
    Homing,
    Holy,
    FlyingSword,
    Summon,
    /// Fired by a boss
    Enemy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    pub damage: f32,
    pub faction: Faction,
    pub tag: ProjectileTag,
    /// Remaining ticks
    pub lifetime: i32,
    pub max_range: Option<f32>,
    pub distance_traveled: f32,
    pub pierce: bool,
    /// Steering turn rate when homing
    pub homing: Option<f32>,
    pub heal_on_hit: f32,
    pub explode_on_hit: bool,
    /// Enemies already struck, so a piercing shot hits each one once
    #[serde(skip)]
    pub hit: Vec<u32>,
    /// Arc drawn by the renderer for melee visuals
    pub slash: Option<SlashArc>,
}

impl Projectile {
    /// Plain projectile moving along `dir` at the base bullet speed
    pub fn new(pos: Vec2, dir: Vec2, damage: f32, faction: Faction, tag: ProjectileTag) -> Self {
        let mut body = Body::new(pos, BULLET_SIZE);
        body.vel = dir * BULLET_SPEED;
        Self {
            body,
            damage,
            faction,
            tag,
            lifetime: BULLET_LIFETIME,
            max_range: None,
            distance_traveled: 0.0,
            pierce: false,
            homing: None,
            heal_on_hit: 0.0,
            explode_on_hit: false,
            hit: Vec::new(),
            slash: None,
        }
    }

    /// Boss shot aimed at the player
    pub fn enemy_shot(pos: Vec2, dir: Vec2, damage: f32) -> Self {
        Self::new(pos, dir, damage, Faction::Enemy, ProjectileTag::Enemy)
    }

    /// Visual-only record of a melee swing; never collides
    pub fn slash_visual(arc: SlashArc) -> Self {
        let dir = arc.direction();
        let mut p = Self::new(
            arc.origin + dir * 20.0,
            dir * (0.1 / BULLET_SPEED),
            0.0,
            Faction::Player,
            ProjectileTag::MeleeSlash,
        );
        p.body.size = 0.0;
        p.lifetime = SLASH_VISUAL_TICKS;
        p.slash = Some(arc);
        p
    }

    /// Whether this projectile takes part in collision passes
    pub fn collides(&self) -> bool {
        self.body.size > 0.0 && self.damage > 0.0
    }

    pub fn is_sword(&self) -> bool {
        self.faction == Faction::Player && self.tag == ProjectileTag::FlyingSword
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn warrior() -> Player {
        Player::new(Vec2::new(480.0, 320.0), &ClassId::Warrior.def())
    }

    #[test]
    fn test_player_armor_scenario() {
        let mut p = warrior();
        p.armor = 3.0;
        let hp = p.hp;
        let taken = p.take_damage(10.0);
        assert_eq!(taken, 7.0);
        assert_eq!(p.hp, hp - 7.0);
    }

    #[test]
    fn test_player_damage_floor_of_one() {
        let mut p = warrior();
        p.armor = 50.0;
        assert_eq!(p.take_damage(10.0), 1.0);
        assert_eq!(p.take_damage(0.0), 1.0);
    }

    #[test]
    fn test_lifesteal_heals_off_raw_damage() {
        let mut p = warrior();
        p.hp = 50.0;
        p.armor = 5.0;
        p.life_steal = 0.5;
        // 20 raw -> 15 taken, heals 10 (half of raw)
        p.take_damage(20.0);
        assert_eq!(p.hp, 45.0);
    }

    #[test]
    fn test_diagonal_movement_uses_constant_factor() {
        let mut p = warrior();
        let start = p.pos();
        let input = TickInput {
            up: true,
            right: true,
            ..Default::default()
        };
        p.update(&input);
        let moved = p.pos() - start;
        let expected = p.speed * FRAC_1_SQRT_2;
        assert!((moved.x - expected).abs() < 1e-4);
        assert!((moved.y + expected).abs() < 1e-4);
    }

    #[test]
    fn test_player_clamped_to_arena_margin() {
        let mut p = warrior();
        p.body.pos = Vec2::new(ARENA_MARGIN + 1.0, ARENA_MARGIN + 1.0);
        let input = TickInput {
            up: true,
            left: true,
            ..Default::default()
        };
        for _ in 0..10 {
            p.update(&input);
        }
        assert_eq!(p.pos(), Vec2::splat(ARENA_MARGIN));
    }

    #[test]
    fn test_dash_requires_movement_and_expires() {
        let mut p = warrior();
        p.dash();
        assert!(!p.dashing, "standing still cannot dash");

        let input = TickInput {
            right: true,
            ..Default::default()
        };
        p.update(&input);
        p.dash();
        assert!(p.dashing);
        // 200ms drained at 16ms per tick
        for _ in 0..13 {
            p.update(&input);
        }
        assert!(!p.dashing);
    }

    #[test]
    fn test_advance_class_preserves_hp_ratio() {
        let mut p = warrior();
        p.hp = p.max_hp * 0.25;
        p.advance_class(&ClassId::Berserker.def());
        assert_eq!(p.weapon, WeaponArchetype::HeavySlash);
        assert!((p.hp / p.max_hp - 0.25).abs() < 1e-6);
        assert_eq!(p.damage, 35.0);
    }

    #[test]
    fn test_enemy_take_damage_reports_death() {
        let mut e = Enemy::minion(1, Vec2::ZERO, 1, EnemyArchetype::Slime);
        assert_eq!(e.max_hp, 40.0);
        assert!(!e.take_damage(39.0));
        assert!(e.take_damage(1.0));
    }

    #[test]
    fn test_enemy_negative_damage_never_heals() {
        let mut e = Enemy::minion(1, Vec2::ZERO, 1, EnemyArchetype::Slime);
        e.take_damage(10.0);
        let hp = e.hp;
        assert!(!e.take_damage(-25.0));
        assert_eq!(e.hp, hp);
    }

    #[test]
    fn test_enemy_chases_then_attacks() {
        let mut e = Enemy::minion(1, Vec2::new(100.0, 100.0), 1, EnemyArchetype::Slime);
        let action = e.update(Vec2::new(300.0, 100.0));
        assert!(action.is_idle());
        assert!(e.pos().x > 100.0);

        let mut e = Enemy::minion(2, Vec2::new(100.0, 100.0), 1, EnemyArchetype::Slime);
        let action = e.update(Vec2::new(110.0, 100.0));
        assert_eq!(action.melee, Some(e.damage));
        assert!(action.shot.is_none());
        // Cooldown gates the next swing
        assert!(e.update(Vec2::new(110.0, 100.0)).is_idle());
    }

    #[test]
    fn test_boss_fires_at_range() {
        let mut boss = Enemy::boss(1, Vec2::new(80.0, 80.0), 3, EnemyArchetype::Slime);
        assert_eq!(boss.max_hp, 800.0);
        let action = boss.update(Vec2::new(600.0, 400.0));
        assert!(action.melee.is_none());
        let shot = action.shot.expect("boss should fire on its first tick");
        assert_eq!(shot.faction, Faction::Enemy);
        assert!((shot.damage - boss.damage * BOSS_SHOT_DAMAGE_MULT).abs() < 1e-4);
    }

    #[test]
    fn test_boss_in_reach_melees_and_fires_together() {
        let mut boss = Enemy::boss(1, Vec2::new(400.0, 400.0), 3, EnemyArchetype::Slime);
        let action = boss.update(Vec2::new(430.0, 400.0));
        assert_eq!(action.melee, Some(boss.damage));
        let shot = action.shot.expect("shot is not dropped by the melee hit");
        assert!((shot.body.vel.normalize() - Vec2::X).length() < 1e-5);
        assert_eq!(boss.kind, EnemyKind::Boss { shoot_cooldown: BOSS_SHOOT_COOLDOWN });
    }

    #[test]
    fn test_archetype_roll_respects_floor_bands() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let a = EnemyArchetype::roll(&mut rng, 2);
            assert!(matches!(a, EnemyArchetype::Slime | EnemyArchetype::Bat));
            let late = EnemyArchetype::roll(&mut rng, 25);
            assert!(matches!(
                late,
                EnemyArchetype::Demon | EnemyArchetype::Wraith | EnemyArchetype::Golem
            ));
        }
    }
}
