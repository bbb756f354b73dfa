//! Visual-only combat records: particle bursts and floating numbers.
//!
//! Nothing here feeds back into gameplay. The records are advanced once per
//! logic tick so the renderer can draw them straight from a snapshot.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Default particle cap when no settings are applied
pub const MAX_PARTICLES: usize = 256;

/// Particle colors (0xRRGGBB)
pub const COLOR_GOLD: u32 = 0xfbbf24;

/// What a floating number represents (drives color/size in the renderer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextKind {
    /// Damage dealt to an enemy
    Damage,
    /// Critical damage dealt to an enemy
    Crit,
    /// Coins picked up
    Coins,
    /// Damage taken by the player
    PlayerHurt,
    /// Revive triggered
    Revive,
}

/// A floating text that drifts upward and fades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageText {
    pub pos: Vec2,
    pub text: String,
    pub kind: TextKind,
    /// Remaining ticks
    pub life: u32,
    pub vy: f32,
}

impl DamageText {
    pub const LIFETIME: u32 = 60;

    pub fn new(pos: Vec2, text: impl Into<String>, kind: TextKind) -> Self {
        Self {
            pos,
            text: text.into(),
            kind,
            life: Self::LIFETIME,
            vy: -2.0,
        }
    }

    /// Advance one tick. Returns false once the text has faded out.
    pub fn update(&mut self) -> bool {
        self.pos.y += self.vy;
        self.vy *= 0.95;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    /// Opacity in [0, 1]
    pub fn alpha(&self) -> f32 {
        self.life as f32 / Self::LIFETIME as f32
    }
}

/// A single spark from a kill or revive burst
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

impl Particle {
    /// Spawn a particle with a random outward velocity
    pub fn spark(rng: &mut Pcg32, pos: Vec2, color: u32) -> Self {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 6.0,
            (rng.random::<f32>() - 0.5) * 6.0,
        );
        let life = 30.0 + rng.random::<f32>() * 20.0;
        Self {
            pos,
            vel,
            color,
            life,
            max_life: life,
            size: 2.0 + rng.random::<f32>() * 3.0,
        }
    }

    /// Advance one tick. Returns false once the particle has died.
    pub fn update(&mut self) -> bool {
        self.pos += self.vel;
        self.vel *= 0.95;
        self.life -= 1.0;
        self.life > 0.0
    }
}

/// Container for every visual effect alive in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub texts: Vec<DamageText>,
    /// Bursts beyond this many live particles are dropped
    pub particle_cap: usize,
    /// Whether enemy damage numbers are recorded at all
    pub damage_numbers: bool,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            texts: Vec::new(),
            particle_cap: MAX_PARTICLES,
            damage_numbers: true,
        }
    }
}

impl Effects {
    /// Emit `count` sparks at `pos`, respecting the particle cap
    pub fn burst(&mut self, rng: &mut Pcg32, pos: Vec2, color: u32, count: usize) {
        let room = self.particle_cap.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            self.particles.push(Particle::spark(rng, pos, color));
        }
    }

    /// Record a floating text with a little horizontal jitter
    pub fn text(&mut self, rng: &mut Pcg32, pos: Vec2, text: impl Into<String>, kind: TextKind) {
        if !self.damage_numbers && matches!(kind, TextKind::Damage | TextKind::Crit) {
            return;
        }
        let jitter = (rng.random::<f32>() - 0.5) * 20.0;
        self.texts
            .push(DamageText::new(pos + Vec2::new(jitter, 0.0), text, kind));
    }

    /// Advance all effects one tick, dropping expired ones
    pub fn update(&mut self) {
        self.particles.retain_mut(Particle::update);
        self.texts.retain_mut(DamageText::update);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.texts.clear();
    }
}
