//! Audio cues
//!
//! The simulation emits [`GameEvent`]s; [`AudioManager`] maps them to cues
//! and forwards them to an [`AudioSink`] with the player's volume settings.
//! Synthesis itself lives behind the sink.

use thiserror::Error;

use crate::settings::Settings;
use crate::sim::{GameEvent, WeaponArchetype, WeaponFamily};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Melee swing
    Slash,
    /// Spread or summon volley
    Shoot,
    /// Flying sword cast
    SwordCast,
    /// Enemy shot knocked out of the air
    Deflect,
    /// Projectile or swing connects
    Hit,
    /// Critical hit
    CritHit,
    EnemyDeath,
    BossDeath,
    PlayerHurt,
    Revive,
    RoomClear,
    ClassAdvance,
    GameOver,
    Victory,
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Menu,
    Normal,
    Boss,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio backend unavailable")]
    Unavailable,
    #[error("audio backend failed: {0}")]
    Backend(String),
}

/// Output device for cues
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
    fn play_music(&mut self, track: MusicTrack, volume: f32) -> Result<(), AudioError>;
}

/// Discards every cue
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn play_music(&mut self, _track: MusicTrack, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Logs every cue at trace level (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        log::trace!("sfx {effect:?} @ {volume:.2}");
        Ok(())
    }

    fn play_music(&mut self, track: MusicTrack, volume: f32) -> Result<(), AudioError> {
        log::debug!("music {track:?} @ {volume:.2}");
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    current_track: Option<MusicTrack>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(NullAudio))
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            current_track: None,
        }
    }

    /// Pull volumes from the player's settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Play a sound effect; backend failures are logged and dropped
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        if let Err(err) = self.sink.play(effect, vol) {
            log::warn!("sound effect {effect:?} failed: {err}");
        }
    }

    /// Switch background music; repeated requests for the playing track are ignored
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.current_track == Some(track) {
            return;
        }
        self.current_track = Some(track);
        let vol = self.effective_volume(self.music_volume);
        if let Err(err) = self.sink.play_music(track, vol) {
            log::warn!("music {track:?} failed: {err}");
        }
    }

    /// Map one simulation event to its cue
    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Attack(weapon) => self.play(attack_cue(*weapon)),
            GameEvent::Deflect { .. } => self.play(SoundEffect::Deflect),
            GameEvent::Hit { crit: true, .. } => self.play(SoundEffect::CritHit),
            GameEvent::Hit { .. } => self.play(SoundEffect::Hit),
            GameEvent::EnemyKilled { boss: true, .. } => self.play(SoundEffect::BossDeath),
            GameEvent::EnemyKilled { .. } => self.play(SoundEffect::EnemyDeath),
            GameEvent::PlayerHurt { .. } => self.play(SoundEffect::PlayerHurt),
            GameEvent::Revived => self.play(SoundEffect::Revive),
            GameEvent::RoomCleared { .. } => self.play(SoundEffect::RoomClear),
            GameEvent::ClassAdvanced { .. } => self.play(SoundEffect::ClassAdvance),
            GameEvent::FloorStarted { boss, .. } => self.play_music(if *boss {
                MusicTrack::Boss
            } else {
                MusicTrack::Normal
            }),
            GameEvent::RunEnded { victory, .. } => {
                self.play(if *victory {
                    SoundEffect::Victory
                } else {
                    SoundEffect::GameOver
                });
                self.play_music(MusicTrack::Menu);
            }
            GameEvent::PhaseChanged { .. } | GameEvent::RunStarted { .. } => {}
        }
    }
}

fn attack_cue(weapon: WeaponArchetype) -> SoundEffect {
    match weapon.family() {
        WeaponFamily::MeleeArc => SoundEffect::Slash,
        WeaponFamily::FlyingSword => SoundEffect::SwordCast,
        WeaponFamily::Spread | WeaponFamily::Summon => SoundEffect::Shoot,
    }
}
