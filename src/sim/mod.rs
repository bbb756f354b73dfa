//! Combat simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform dependencies:
//! - Fixed timestep only (one call to [`tick`] is one 60 Hz step)
//! - Seeded RNG only
//! - Enemies and projectiles iterate in spawn order

pub mod arc;
pub mod classes;
pub mod collision;
pub mod effects;
pub mod encounter;
pub mod entity;
pub mod events;
pub mod projectile;
pub mod rewards;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weapon;

pub use arc::SlashArc;
pub use classes::{ClassDef, ClassId};
pub use collision::{aabb_overlap, check_player_death, resolve_collisions};
pub use effects::{DamageText, Effects, Particle, TextKind};
pub use entity::{
    Body, Enemy, EnemyAction, EnemyArchetype, EnemyKind, Faction, Modifiers, Player, Projectile,
    ProjectileTag,
};
pub use events::GameEvent;
pub use rewards::{REST_BONUSES, REWARDS, Rarity, Reward, SHOP_ITEMS, ShopItem, StatEffect};
pub use spawn::{SpawnKind, SpawnScheduler};
pub use state::{Arena, CoinRule, GamePhase, GameState, RunStats};
pub use tick::{TickInput, tick};
pub use weapon::{AttackPattern, WeaponArchetype, WeaponFamily, fire};
