//! Player classes and their advancement tree
//!
//! Four starting classes advance at boss floors into tier-2 and then tier-3
//! classes. A class only decides base stats and which weapon archetype is
//! wielded; attack behavior lives entirely in the archetype registry.

use serde::{Deserialize, Serialize};

use super::weapon::WeaponArchetype;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassId {
    // Tier 1
    Warrior,
    Mage,
    Ranger,
    Tamer,
    // Tier 2
    Berserker,
    Paladin,
    Archmage,
    Elementalist,
    Sniper,
    Shadowblade,
    Beastmaster,
    Swordbearer,
    // Tier 3
    Warlord,
    Templar,
    Astromancer,
    Spellblade,
    Deadeye,
    Ninja,
    BeastKing,
    SwordSaint,
}

/// Static stat table entry for a class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDef {
    pub id: ClassId,
    pub name: &'static str,
    pub tier: u8,
    pub base_hp: f32,
    pub base_damage: f32,
    pub base_speed: f32,
    pub weapon: WeaponArchetype,
    /// Weapon tint for the renderer (0xRRGGBB)
    pub color: u32,
    /// Classes this one may advance into at a boss floor
    pub advances: &'static [ClassId],
}

impl ClassId {
    /// Classes offered at the start of a run
    pub const STARTERS: [ClassId; 4] = [
        ClassId::Warrior,
        ClassId::Mage,
        ClassId::Ranger,
        ClassId::Tamer,
    ];

    pub fn def(self) -> ClassDef {
        use ClassId::*;
        use WeaponArchetype as W;

        match self {
            Warrior => entry(self, "Warrior", 1, 120.0, 25.0, 2.8, W::Slash, 0xef4444, &[Berserker, Paladin]),
            Mage => entry(self, "Mage", 1, 80.0, 30.0, 3.2, W::Magic, 0xa855f7, &[Archmage, Elementalist]),
            Ranger => entry(self, "Ranger", 1, 100.0, 20.0, 3.5, W::Projectile, 0x10b981, &[Sniper, Shadowblade]),
            Tamer => entry(self, "Tamer", 1, 110.0, 22.0, 3.0, W::Bull, 0xb45309, &[Beastmaster, Swordbearer]),

            Berserker => entry(self, "Berserker", 2, 140.0, 35.0, 3.0, W::HeavySlash, 0xdc2626, &[Warlord]),
            Paladin => entry(self, "Paladin", 2, 150.0, 28.0, 2.8, W::HolySlash, 0xfbbf24, &[Templar]),
            Archmage => entry(self, "Archmage", 2, 90.0, 40.0, 3.2, W::Arcane, 0x8b5cf6, &[Astromancer]),
            Elementalist => entry(self, "Elementalist", 2, 85.0, 32.0, 3.3, W::Elemental, 0x06b6d4, &[Spellblade]),
            Sniper => entry(self, "Sniper", 2, 95.0, 45.0, 3.4, W::Snipe, 0xf59e0b, &[Deadeye]),
            Shadowblade => entry(self, "Shadowblade", 2, 105.0, 25.0, 4.0, W::Shadow, 0x6366f1, &[Ninja]),
            Beastmaster => entry(self, "Beastmaster", 2, 130.0, 28.0, 3.0, W::Beast, 0xd97706, &[BeastKing]),
            Swordbearer => entry(self, "Swordbearer", 2, 105.0, 32.0, 3.3, W::FlyingSword, 0x38bdf8, &[SwordSaint]),

            Warlord => entry(self, "Warlord", 3, 170.0, 45.0, 3.1, W::HeavySlash, 0xb91c1c, &[]),
            Templar => entry(self, "Templar", 3, 180.0, 36.0, 2.9, W::Holy, 0xfde047, &[]),
            Astromancer => entry(self, "Astromancer", 3, 110.0, 48.0, 3.3, W::Homing, 0xc084fc, &[]),
            Spellblade => entry(self, "Spellblade", 3, 105.0, 42.0, 3.4, W::FlyingSwordBurst, 0x22d3ee, &[]),
            Deadeye => entry(self, "Deadeye", 3, 115.0, 58.0, 3.5, W::Snipe, 0xfacc15, &[]),
            Ninja => entry(self, "Ninja", 3, 125.0, 32.0, 4.3, W::Shuriken, 0x818cf8, &[]),
            BeastKing => entry(self, "Beast King", 3, 160.0, 36.0, 3.1, W::BeastKing, 0x92400e, &[]),
            SwordSaint => entry(self, "Sword Saint", 3, 130.0, 40.0, 3.4, W::FlyingSwordTri, 0x7dd3fc, &[]),
        }
    }

    /// Whether this class can still advance
    pub fn can_advance(self) -> bool {
        !self.def().advances.is_empty()
    }

    /// Whether `next` is a valid advancement of this class
    pub fn advances_into(self, next: ClassId) -> bool {
        self.def().advances.contains(&next)
    }
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: ClassId,
    name: &'static str,
    tier: u8,
    base_hp: f32,
    base_damage: f32,
    base_speed: f32,
    weapon: WeaponArchetype,
    color: u32,
    advances: &'static [ClassId],
) -> ClassDef {
    ClassDef {
        id,
        name,
        tier,
        base_hp,
        base_damage,
        base_speed,
        weapon,
        color,
        advances,
    }
}
