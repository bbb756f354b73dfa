//! Rewards, shop items and rest bonuses
//!
//! All three tables are plain data. The mutation each entry performs is a
//! [`StatEffect`] value applied to the player.

use rand::seq::index;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
}

/// A single player mutation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StatEffect {
    /// Raise max hp and refill to full
    MaxHpAndFullHeal(f32),
    Damage(f32),
    /// Heal a fraction of max hp
    HealFraction(f32),
    HealFlat(f32),
    FullHeal,
    Speed(f32),
    Armor(f32),
    /// Multiply the cooldown multiplier
    AttackSpeed(f32),
    CritChance(f32),
    LifeSteal(f32),
    ExtraBullets(u32),
    Pierce(u32),
    Thorns(f32),
    SlashRange(f32),
    RangedRange(f32),
    BigBullets { size_mult: f32, damage_mult: f32 },
    Magnet(f32),
    CritMultiplier(f32),
    Revive,
    MultiShot(u32),
    BerserkerMode,
}

/// Starting point for the first ranged-range upgrade
const BASE_RANGED_RANGE: f32 = 350.0;

impl StatEffect {
    pub fn apply(self, p: &mut Player) {
        match self {
            StatEffect::MaxHpAndFullHeal(amount) => {
                p.max_hp += amount;
                p.hp = p.max_hp;
            }
            StatEffect::Damage(amount) => p.damage += amount,
            StatEffect::HealFraction(fraction) => p.heal(p.max_hp * fraction),
            StatEffect::HealFlat(amount) => p.heal(amount),
            StatEffect::FullHeal => p.hp = p.max_hp,
            StatEffect::Speed(amount) => p.speed += amount,
            StatEffect::Armor(amount) => p.armor += amount,
            StatEffect::AttackSpeed(mult) => p.mods.attack_speed_mult *= mult,
            StatEffect::CritChance(amount) => p.crit_chance += amount,
            StatEffect::LifeSteal(amount) => p.life_steal += amount,
            StatEffect::ExtraBullets(n) => p.mods.extra_bullets += n,
            StatEffect::Pierce(n) => p.mods.pierce_count += n,
            StatEffect::Thorns(amount) => p.mods.thorns_damage += amount,
            StatEffect::SlashRange(amount) => p.mods.slash_range += amount,
            StatEffect::RangedRange(amount) => {
                let current = p.mods.ranged_range.unwrap_or(BASE_RANGED_RANGE);
                p.mods.ranged_range = Some(current + amount);
            }
            StatEffect::BigBullets {
                size_mult,
                damage_mult,
            } => {
                p.mods.bullet_size_mult *= size_mult;
                p.mods.bullet_damage_mult *= damage_mult;
            }
            StatEffect::Magnet(range) => p.mods.magnet_range = range,
            StatEffect::CritMultiplier(mult) => p.crit_multiplier = mult,
            StatEffect::Revive => p.mods.revive = true,
            StatEffect::MultiShot(n) => p.mods.multi_shot += n,
            StatEffect::BerserkerMode => p.mods.berserker_mode = true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reward {
    pub id: u32,
    pub rarity: Rarity,
    pub name: &'static str,
    pub description: &'static str,
    pub effect: StatEffect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShopItem {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub price: u32,
    pub effect: StatEffect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestBonus {
    pub name: &'static str,
    pub description: &'static str,
    pub effect: StatEffect,
}

const fn reward(
    id: u32,
    rarity: Rarity,
    name: &'static str,
    description: &'static str,
    effect: StatEffect,
) -> Reward {
    Reward {
        id,
        rarity,
        name,
        description,
        effect,
    }
}

pub const REWARDS: [Reward; 23] = {
    use Rarity::*;
    use StatEffect as E;
    [
        reward(1, Common, "Vitality", "Max HP +30, full heal", E::MaxHpAndFullHeal(30.0)),
        reward(2, Common, "Strength", "Damage +5", E::Damage(5.0)),
        reward(3, Common, "First Aid", "Heal 50% HP", E::HealFraction(0.5)),
        reward(4, Common, "Swift Boots", "Move speed +0.5", E::Speed(0.5)),
        reward(11, Common, "Iron Skin", "Armor +3", E::Armor(3.0)),
        reward(12, Common, "Quick Hands", "Attack speed +15%", E::AttackSpeed(0.85)),
        reward(5, Rare, "Precision", "Crit chance +15%", E::CritChance(0.15)),
        reward(6, Rare, "Vampiric Touch", "Lifesteal +10%", E::LifeSteal(0.1)),
        reward(7, Rare, "Bulwark", "Max HP +50, full heal", E::MaxHpAndFullHeal(50.0)),
        reward(8, Rare, "Fury", "Damage +10", E::Damage(10.0)),
        reward(13, Rare, "Scatter", "Projectiles +1", E::ExtraBullets(1)),
        reward(14, Rare, "Piercing Shot", "Projectiles pierce", E::Pierce(1)),
        reward(15, Rare, "Thorns", "Reflect 5 damage to attackers", E::Thorns(5.0)),
        reward(18, Rare, "Wide Swing", "Melee range +25", E::SlashRange(25.0)),
        reward(19, Rare, "Long Shot", "Projectile range +100", E::RangedRange(100.0)),
        reward(
            20,
            Rare,
            "Giant Rounds",
            "Projectile size +50%, damage +20%",
            E::BigBullets {
                size_mult: 1.5,
                damage_mult: 1.2,
            },
        ),
        reward(22, Rare, "Coin Magnet", "Coins fly to you", E::Magnet(120.0)),
        reward(9, Epic, "Divine Grace", "Max HP +100, full heal", E::MaxHpAndFullHeal(100.0)),
        reward(10, Epic, "Devastation", "Damage +20", E::Damage(20.0)),
        reward(16, Epic, "Reaper", "Crits deal 3x damage", E::CritMultiplier(3.0)),
        reward(17, Epic, "Undying", "Revive once at 50% HP", E::Revive),
        reward(21, Epic, "Multishot", "More projectiles, each weaker (stacks)", E::MultiShot(1)),
        reward(23, Epic, "Bloodlust", "Double attack speed for 2s after a kill", E::BerserkerMode),
    ]
};

pub const SHOP_ITEMS: [ShopItem; 5] = [
    ShopItem {
        id: 1,
        name: "Healing Potion",
        description: "Heal 50 HP",
        price: 15,
        effect: StatEffect::HealFlat(50.0),
    },
    ShopItem {
        id: 2,
        name: "Whetstone",
        description: "Damage +3",
        price: 30,
        effect: StatEffect::Damage(3.0),
    },
    ShopItem {
        id: 3,
        name: "Armor Plate",
        description: "Armor +2",
        price: 25,
        effect: StatEffect::Armor(2.0),
    },
    ShopItem {
        id: 4,
        name: "Power Pill",
        description: "Damage +8",
        price: 60,
        effect: StatEffect::Damage(8.0),
    },
    ShopItem {
        id: 5,
        name: "Elixir",
        description: "Full heal",
        price: 45,
        effect: StatEffect::FullHeal,
    },
];

pub const REST_BONUSES: [RestBonus; 3] = [
    RestBonus {
        name: "Vitality",
        description: "Max HP +30, full heal",
        effect: StatEffect::MaxHpAndFullHeal(30.0),
    },
    RestBonus {
        name: "Strength",
        description: "Damage +5",
        effect: StatEffect::Damage(5.0),
    },
    RestBonus {
        name: "First Aid",
        description: "Heal 50% HP",
        effect: StatEffect::HealFraction(0.5),
    },
];

pub fn find_reward(id: u32) -> Option<&'static Reward> {
    REWARDS.iter().find(|r| r.id == id)
}

pub fn find_shop_item(id: u32) -> Option<&'static ShopItem> {
    SHOP_ITEMS.iter().find(|i| i.id == id)
}

/// Pick `count` distinct reward ids
pub fn roll_offer(rng: &mut Pcg32, count: usize) -> Vec<u32> {
    let count = count.min(REWARDS.len());
    index::sample(rng, REWARDS.len(), count)
        .into_iter()
        .map(|i| REWARDS[i].id)
        .collect()
}
