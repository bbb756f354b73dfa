//! Weapon archetypes and attack dispatch
//!
//! Every archetype maps to one [`AttackPattern`] in a static registry. The
//! pattern's family picks the emission routine, the remaining fields tune it.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arc::SlashArc;
use super::entity::{Faction, Player, Projectile, ProjectileTag};
use super::events::GameEvent;
use super::state::{Arena, CoinRule};
use crate::consts::*;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponArchetype {
    Slash,
    HeavySlash,
    HolySlash,
    Magic,
    Arcane,
    Elemental,
    Projectile,
    Snipe,
    Shadow,
    Shuriken,
    Homing,
    Holy,
    FlyingSword,
    FlyingSwordTri,
    FlyingSwordBurst,
    Bull,
    Beast,
    BeastKing,
}

/// Emission routine shared by a group of archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponFamily {
    /// Instant hit on everything inside a swing, plus projectile deflection
    MeleeArc,
    /// Fan of projectiles centered on the aim direction
    Spread,
    /// Large slow piercing creatures
    Summon,
    /// Homing blades limited by a live-count cap
    FlyingSword,
}

/// Static tuning for one archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackPattern {
    pub family: WeaponFamily,
    /// Base cooldown in ticks before attack-speed modifiers
    pub cooldown: u32,
    pub base_count: u32,
    /// Extra projectiles per additional multi-shot stack
    pub count_step: u32,
    /// Angle between neighbouring projectiles (half the swing for melee)
    pub angle_step: f32,
    pub damage_scale: f32,
    /// Per-projectile damage factor per additional multi-shot stack
    pub falloff: f32,
    pub speed_scale: f32,
    pub size: f32,
    pub default_range: Option<f32>,
    pub pierce: bool,
    pub homing: Option<f32>,
    pub lifetime: i32,
    pub heal_on_hit: f32,
    pub explode_on_hit: bool,
    /// Maximum simultaneously live projectiles of this kind
    pub concurrency_cap: Option<usize>,
    pub tag: ProjectileTag,
}

const MELEE: AttackPattern = AttackPattern {
    family: WeaponFamily::MeleeArc,
    cooldown: 25,
    base_count: 1,
    count_step: 0,
    angle_step: FRAC_PI_2,
    damage_scale: 1.0,
    falloff: 1.0,
    speed_scale: 0.0,
    size: 0.0,
    default_range: None,
    pierce: false,
    homing: None,
    lifetime: SLASH_VISUAL_TICKS,
    heal_on_hit: 0.0,
    explode_on_hit: false,
    concurrency_cap: None,
    tag: ProjectileTag::MeleeSlash,
};

const SPREAD: AttackPattern = AttackPattern {
    family: WeaponFamily::Spread,
    cooldown: 18,
    base_count: 1,
    count_step: 2,
    angle_step: 0.15,
    damage_scale: 1.0,
    falloff: 0.5,
    speed_scale: 1.0,
    size: BULLET_SIZE,
    default_range: Some(380.0),
    pierce: false,
    homing: None,
    lifetime: BULLET_LIFETIME,
    heal_on_hit: 0.0,
    explode_on_hit: false,
    concurrency_cap: None,
    tag: ProjectileTag::Magic,
};

const SUMMON: AttackPattern = AttackPattern {
    family: WeaponFamily::Summon,
    cooldown: 30,
    base_count: 1,
    count_step: 1,
    angle_step: 0.35,
    damage_scale: 1.0,
    falloff: 0.7,
    speed_scale: 0.5,
    size: 24.0,
    default_range: None,
    pierce: true,
    homing: None,
    lifetime: 180,
    heal_on_hit: 0.0,
    explode_on_hit: false,
    concurrency_cap: None,
    tag: ProjectileTag::Summon,
};

const SWORD: AttackPattern = AttackPattern {
    family: WeaponFamily::FlyingSword,
    cooldown: 40,
    base_count: 1,
    count_step: 1,
    angle_step: 0.3,
    damage_scale: 1.0,
    falloff: 0.7,
    speed_scale: 0.8,
    size: 14.0,
    default_range: None,
    pierce: true,
    homing: Some(0.15),
    lifetime: 240,
    heal_on_hit: 0.0,
    explode_on_hit: false,
    concurrency_cap: Some(1),
    tag: ProjectileTag::FlyingSword,
};

impl WeaponArchetype {
    pub const ALL: [WeaponArchetype; 18] = [
        WeaponArchetype::Slash,
        WeaponArchetype::HeavySlash,
        WeaponArchetype::HolySlash,
        WeaponArchetype::Magic,
        WeaponArchetype::Arcane,
        WeaponArchetype::Elemental,
        WeaponArchetype::Projectile,
        WeaponArchetype::Snipe,
        WeaponArchetype::Shadow,
        WeaponArchetype::Shuriken,
        WeaponArchetype::Homing,
        WeaponArchetype::Holy,
        WeaponArchetype::FlyingSword,
        WeaponArchetype::FlyingSwordTri,
        WeaponArchetype::FlyingSwordBurst,
        WeaponArchetype::Bull,
        WeaponArchetype::Beast,
        WeaponArchetype::BeastKing,
    ];

    /// Registry lookup
    pub fn pattern(self) -> AttackPattern {
        use WeaponArchetype as W;
        match self {
            W::Slash | W::HeavySlash | W::HolySlash => MELEE,
            W::Magic | W::Arcane => AttackPattern {
                speed_scale: 1.5,
                ..SPREAD
            },
            W::Elemental => AttackPattern {
                cooldown: 20,
                base_count: 2,
                angle_step: 0.18,
                damage_scale: 0.8,
                default_range: Some(360.0),
                tag: ProjectileTag::Elemental,
                ..SPREAD
            },
            W::Projectile => AttackPattern {
                cooldown: 22,
                base_count: 3,
                damage_scale: 0.7,
                size: 6.0,
                default_range: Some(350.0),
                tag: ProjectileTag::Arrow,
                ..SPREAD
            },
            W::Snipe => AttackPattern {
                cooldown: 40,
                angle_step: 0.1,
                damage_scale: 2.0,
                size: 10.0,
                default_range: Some(400.0),
                pierce: true,
                tag: ProjectileTag::Snipe,
                ..SPREAD
            },
            W::Shadow => AttackPattern {
                cooldown: 10,
                angle_step: 0.12,
                speed_scale: 1.8,
                size: 6.0,
                default_range: Some(300.0),
                tag: ProjectileTag::Shadow,
                ..SPREAD
            },
            W::Shuriken => AttackPattern {
                cooldown: 8,
                angle_step: 0.2,
                damage_scale: 0.5,
                speed_scale: 1.6,
                size: 6.0,
                default_range: Some(320.0),
                tag: ProjectileTag::Shuriken,
                ..SPREAD
            },
            W::Homing => AttackPattern {
                cooldown: 24,
                base_count: 2,
                angle_step: 0.3,
                damage_scale: 0.9,
                default_range: Some(500.0),
                homing: Some(DEFAULT_TURN_RATE),
                lifetime: 150,
                tag: ProjectileTag::Homing,
                ..SPREAD
            },
            W::Holy => AttackPattern {
                cooldown: 22,
                speed_scale: 1.2,
                size: 10.0,
                heal_on_hit: 2.0,
                tag: ProjectileTag::Holy,
                ..SPREAD
            },
            W::FlyingSword => SWORD,
            W::FlyingSwordTri => AttackPattern {
                cooldown: 20,
                base_count: 3,
                concurrency_cap: Some(3),
                ..SWORD
            },
            W::FlyingSwordBurst => AttackPattern {
                explode_on_hit: true,
                concurrency_cap: Some(3),
                ..SWORD
            },
            W::Bull => SUMMON,
            W::Beast => AttackPattern {
                base_count: 2,
                ..SUMMON
            },
            W::BeastKing => AttackPattern {
                base_count: 3,
                ..SUMMON
            },
        }
    }

    pub fn family(self) -> WeaponFamily {
        self.pattern().family
    }
}

/// Try to attack toward `aim`.
///
/// Returns true when an attack happened and the cooldown was consumed. A
/// flying-sword cast at its cap still counts as an attack.
pub fn fire(player: &mut Player, arena: &mut Arena, aim: Vec2, tuning: &Tuning) -> bool {
    if player.shoot_cooldown > 0 {
        return false;
    }
    let delta = aim - player.pos();
    let dist = delta.length();
    if dist <= f32::EPSILON || !dist.is_finite() {
        return false;
    }
    let dir = delta / dist;

    let archetype = player.weapon;
    let pattern = archetype.pattern();
    match pattern.family {
        WeaponFamily::MeleeArc => melee_arc(player, arena, dir, &pattern),
        WeaponFamily::Spread | WeaponFamily::Summon => {
            let count = volley_count(player, &pattern);
            emit_volley(player, arena, dir, &pattern, count);
        }
        WeaponFamily::FlyingSword => {
            let wanted = volley_count(player, &pattern) as usize;
            let live = arena.live_swords();
            let room = pattern
                .concurrency_cap
                .map_or(wanted, |cap| cap.saturating_sub(live));
            let count = wanted.min(room);
            trace!("sword cast: wanted {wanted}, live {live}, emitting {count}");
            emit_volley(player, arena, dir, &pattern, count as u32);
        }
    }

    player.shoot_cooldown = player.adjusted_cooldown(tuning.cooldown(archetype));
    arena.emit(GameEvent::Attack(archetype));
    true
}

/// Projectiles wanted per volley for the current modifiers
fn volley_count(player: &Player, pattern: &AttackPattern) -> u32 {
    let stacks = player.mods.multi_shot.max(1) - 1;
    pattern.base_count + stacks * pattern.count_step + player.mods.extra_bullets
}

fn emit_volley(
    player: &Player,
    arena: &mut Arena,
    dir: Vec2,
    pattern: &AttackPattern,
    count: u32,
) {
    let stacks = player.mods.multi_shot.max(1) - 1;
    let damage = player.damage
        * pattern.damage_scale
        * pattern.falloff.powi(stacks as i32)
        * player.mods.bullet_damage_mult;
    let size = pattern.size * player.mods.bullet_size_mult;
    let speed_scale = pattern.speed_scale;
    // A ranged-range upgrade replaces every archetype default
    let range = pattern
        .default_range
        .map(|r| player.mods.ranged_range.unwrap_or(r));
    let pierce = pattern.pierce || player.mods.pierce_count > 0;
    let base_angle = dir.y.atan2(dir.x);

    for i in 0..count {
        let offset = (i as f32 - (count as f32 - 1.0) / 2.0) * pattern.angle_step;
        let shot_dir = Vec2::from_angle(base_angle + offset);
        let mut p = Projectile::new(
            player.pos(),
            shot_dir * speed_scale,
            damage,
            Faction::Player,
            pattern.tag,
        );
        p.body.size = size;
        p.lifetime = pattern.lifetime;
        p.max_range = range;
        p.pierce = pierce;
        p.homing = pattern.homing;
        p.heal_on_hit = pattern.heal_on_hit;
        p.explode_on_hit = pattern.explode_on_hit;
        arena.projectiles.push(p);
    }
}

fn melee_arc(player: &mut Player, arena: &mut Arena, dir: Vec2, pattern: &AttackPattern) {
    let arc = SlashArc::new(
        player.pos(),
        dir.y.atan2(dir.x),
        pattern.angle_step,
        player.mods.slash_range,
    );

    for idx in 0..arena.enemies.len() {
        let enemy = &arena.enemies[idx];
        if enemy.is_dead() || !arc.contains_point(enemy.pos()) {
            continue;
        }
        let crit = arena.rng.random::<f32>() < player.crit_chance;
        let mut damage = player.damage * pattern.damage_scale;
        if crit {
            damage *= player.crit_multiplier;
        }
        if pattern.heal_on_hit > 0.0 {
            player.heal(pattern.heal_on_hit);
        }
        arena.strike_enemy(player, idx, damage, crit, CoinRule::Melee);
    }

    let before = arena.projectiles.len();
    arena
        .projectiles
        .retain(|p| p.faction != Faction::Enemy || !arc.contains_point(p.body.pos));
    let deflected = before - arena.projectiles.len();
    if deflected > 0 {
        arena.emit(GameEvent::Deflect { count: deflected });
    }

    arena.projectiles.push(Projectile::slash_visual(arc));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::classes::ClassId;
    use crate::sim::entity::{Enemy, EnemyArchetype};
    use proptest::prelude::*;

    fn setup(class: ClassId) -> (Player, Arena) {
        let player = Player::new(Vec2::new(400.0, 300.0), &class.def());
        (player, Arena::new(11))
    }

    fn player_shots(arena: &Arena) -> Vec<&Projectile> {
        arena
            .projectiles
            .iter()
            .filter(|p| p.faction == Faction::Player && p.collides())
            .collect()
    }

    #[test]
    fn test_every_archetype_has_a_positive_cooldown() {
        for w in WeaponArchetype::ALL {
            assert!(w.pattern().cooldown > 0, "{w:?}");
        }
    }

    #[test]
    fn test_magic_multishot_two_fires_three_half_damage() {
        let (mut player, mut arena) = setup(ClassId::Mage);
        player.mods.multi_shot = 2;
        let aim = player.pos() + Vec2::X * 100.0;
        assert!(fire(&mut player, &mut arena, aim, &Tuning::default()));

        let shots = player_shots(&arena);
        assert_eq!(shots.len(), 3);
        for s in shots {
            assert!((s.damage - player.damage * 0.5).abs() < 1e-4);
            assert_eq!(s.max_range, Some(380.0));
        }
        assert!(arena.events.contains(&GameEvent::Attack(WeaponArchetype::Magic)));
    }

    #[test]
    fn test_spread_is_centered_on_aim() {
        let (mut player, mut arena) = setup(ClassId::Ranger);
        let aim = player.pos() + Vec2::Y * 50.0;
        fire(&mut player, &mut arena, aim, &Tuning::default());
        let shots = player_shots(&arena);
        assert_eq!(shots.len(), 3);
        let mid = shots[1].body.vel.normalize();
        assert!((mid - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn test_zero_length_aim_is_skipped() {
        let (mut player, mut arena) = setup(ClassId::Mage);
        let aim = player.pos();
        assert!(!fire(&mut player, &mut arena, aim, &Tuning::default()));
        assert_eq!(player.shoot_cooldown, 0);
        assert!(arena.projectiles.is_empty());
    }

    #[test]
    fn test_cooldown_blocks_attack() {
        let (mut player, mut arena) = setup(ClassId::Mage);
        player.shoot_cooldown = 3;
        let aim = player.pos() + Vec2::X;
        assert!(!fire(&mut player, &mut arena, aim, &Tuning::default()));
        assert!(arena.projectiles.is_empty());
    }

    #[test]
    fn test_pierce_modifier_applies_to_volley() {
        let (mut player, mut arena) = setup(ClassId::Mage);
        player.mods.pierce_count = 1;
        player.mods.extra_bullets = 1;
        let aim = player.pos() + Vec2::X;
        fire(&mut player, &mut arena, aim, &Tuning::default());
        let shots = player_shots(&arena);
        assert_eq!(shots.len(), 2);
        assert!(shots.iter().all(|s| s.pierce));
    }

    #[test]
    fn test_tri_sword_at_cap_emits_nothing_but_consumes_cooldown() {
        let (mut player, mut arena) = setup(ClassId::SwordSaint);
        let aim = player.pos() + Vec2::X * 100.0;
        let tuning = Tuning::default();
        assert!(fire(&mut player, &mut arena, aim, &tuning));
        assert_eq!(arena.live_swords(), 3);

        player.shoot_cooldown = 0;
        assert!(fire(&mut player, &mut arena, aim, &tuning));
        assert_eq!(arena.live_swords(), 3);
        assert_eq!(player.shoot_cooldown, 20);
    }

    #[test]
    fn test_single_sword_refills_after_expiry() {
        let (mut player, mut arena) = setup(ClassId::Swordbearer);
        let aim = player.pos() + Vec2::X * 100.0;
        let tuning = Tuning::default();
        fire(&mut player, &mut arena, aim, &tuning);
        assert_eq!(arena.live_swords(), 1);
        assert!(arena.projectiles[0].homing.is_some());

        arena.projectiles.clear();
        player.shoot_cooldown = 0;
        fire(&mut player, &mut arena, aim, &tuning);
        assert_eq!(arena.live_swords(), 1);
    }

    #[test]
    fn test_slash_hits_only_inside_arc() {
        let (mut player, mut arena) = setup(ClassId::Warrior);
        let origin = player.pos();
        arena.enemies.push(Enemy::minion(
            1,
            origin + Vec2::X * 60.0,
            1,
            EnemyArchetype::Slime,
        ));
        arena.enemies.push(Enemy::minion(
            2,
            origin - Vec2::X * 60.0,
            1,
            EnemyArchetype::Slime,
        ));
        let aim = origin + Vec2::X * 10.0;
        assert!(fire(&mut player, &mut arena, aim, &Tuning::default()));

        let front = &arena.enemies[0];
        let behind = &arena.enemies[1];
        assert!(front.hp < front.max_hp);
        assert_eq!(behind.hp, behind.max_hp);
        assert_eq!(player.shoot_cooldown, 25);

        // Only the zero-size visual was emitted
        assert_eq!(arena.projectiles.len(), 1);
        assert!(!arena.projectiles[0].collides());
    }

    #[test]
    fn test_slash_kill_pays_melee_coins() {
        let (mut player, mut arena) = setup(ClassId::Warrior);
        let mut e = Enemy::minion(1, player.pos() + Vec2::X * 40.0, 1, EnemyArchetype::Slime);
        e.hp = 1.0;
        arena.enemies.push(e);
        let aim = player.pos() + Vec2::X;
        fire(&mut player, &mut arena, aim, &Tuning::default());

        assert_eq!(arena.stats.kills, 1);
        assert!((5..10).contains(&player.coins), "coins {}", player.coins);
        assert_eq!(arena.stats.coins_earned, player.coins);
    }

    #[test]
    fn test_slash_deflects_enemy_shots() {
        let (mut player, mut arena) = setup(ClassId::Warrior);
        let origin = player.pos();
        arena.projectiles.push(Projectile::enemy_shot(
            origin + Vec2::X * 30.0,
            -Vec2::X,
            10.0,
        ));
        arena.projectiles.push(Projectile::enemy_shot(
            origin - Vec2::X * 30.0,
            Vec2::X,
            10.0,
        ));
        fire(&mut player, &mut arena, origin + Vec2::X, &Tuning::default());

        let enemy_shots = arena
            .projectiles
            .iter()
            .filter(|p| p.faction == Faction::Enemy)
            .count();
        assert_eq!(enemy_shots, 1);
        assert!(arena.events.contains(&GameEvent::Deflect { count: 1 }));
    }

    #[test]
    fn test_cooldown_override_from_tuning() {
        let (mut player, mut arena) = setup(ClassId::Mage);
        let mut tuning = Tuning::default();
        tuning.cooldown_overrides.insert(WeaponArchetype::Magic, 6);
        let aim = player.pos() + Vec2::X;
        fire(&mut player, &mut arena, aim, &tuning);
        assert_eq!(player.shoot_cooldown, 6);
    }

    #[test]
    fn test_summon_count_grows_with_multishot() {
        let (mut player, mut arena) = setup(ClassId::Tamer);
        player.mods.multi_shot = 3;
        let aim = player.pos() + Vec2::X;
        fire(&mut player, &mut arena, aim, &Tuning::default());
        let shots = player_shots(&arena);
        assert_eq!(shots.len(), 3);
        assert!(shots.iter().all(|s| s.pierce && s.max_range.is_none()));
        assert!((shots[0].damage - player.damage * 0.49).abs() < 1e-3);
    }

    #[test]
    fn test_heavy_and_holy_slash_swing_like_slash() {
        for class in [ClassId::Berserker, ClassId::Paladin] {
            let (mut player, mut arena) = setup(class);
            player.hp = 50.0;
            arena.enemies.push(Enemy::minion(
                1,
                player.pos() + Vec2::X * 40.0,
                1,
                EnemyArchetype::Slime,
            ));
            let aim = player.pos() + Vec2::X;
            assert!(fire(&mut player, &mut arena, aim, &Tuning::default()));

            assert_eq!(player.shoot_cooldown, 25, "{class:?}");
            assert_eq!(player.hp, 50.0, "{class:?} swing must not heal");
            let slime = &arena.enemies[0];
            assert!(slime.hp < slime.max_hp);
        }
    }

    #[test]
    fn test_burst_sword_keeps_three_alive() {
        let (mut player, mut arena) = setup(ClassId::Spellblade);
        player.mods.extra_bullets = 4;
        let aim = player.pos() + Vec2::X * 100.0;
        let tuning = Tuning::default();
        assert!(fire(&mut player, &mut arena, aim, &tuning));
        assert_eq!(arena.live_swords(), 3);
        assert!(arena.projectiles.iter().all(|p| p.explode_on_hit));

        player.shoot_cooldown = 0;
        assert!(fire(&mut player, &mut arena, aim, &tuning));
        assert_eq!(arena.live_swords(), 3);
    }

    #[test]
    fn test_range_upgrade_replaces_archetype_default() {
        let (mut player, mut arena) = setup(ClassId::Mage);
        player.mods.ranged_range = Some(450.0);
        let aim = player.pos() + Vec2::X;
        fire(&mut player, &mut arena, aim, &Tuning::default());
        assert!(player_shots(&arena).iter().all(|s| s.max_range == Some(450.0)));
    }

    proptest! {
        #[test]
        fn prop_adjusted_cooldown_monotone(base in 1u32..200, a in 0.05f32..1.0, b in 0.05f32..1.0) {
            let (mut player, _) = setup(ClassId::Warrior);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            player.mods.attack_speed_mult = lo;
            let fast = player.adjusted_cooldown(base);
            player.mods.attack_speed_mult = hi;
            let slow = player.adjusted_cooldown(base);
            prop_assert!(fast <= slow);
            prop_assert!(fast >= 1);
        }

        #[test]
        fn prop_berserk_halves_cooldown(base in 2u32..200) {
            let (mut player, _) = setup(ClassId::Warrior);
            player.mods.berserker_mode = true;
            let calm = player.adjusted_cooldown(base);
            player.berserker_timer = 10;
            let raging = player.adjusted_cooldown(base);
            prop_assert_eq!(raging, ((base as f32 * 0.5).floor() as u32).max(1));
            prop_assert!(raging <= calm);
        }
    }
}
