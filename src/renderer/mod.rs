//! Rendering seam
//!
//! A renderer receives one [`FrameSnapshot`] per animation frame. Drawing
//! backends live outside this crate; the shipped renderers are headless.

mod snapshot;

pub use snapshot::FrameSnapshot;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render surface lost")]
    SurfaceLost,
    #[error("render backend failed: {0}")]
    Backend(String),
}

pub trait Renderer {
    fn render(&mut self, frame: &FrameSnapshot<'_>) -> Result<(), RenderError>;
}

/// Draws nothing
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &FrameSnapshot<'_>) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Logs a one-line summary every `every` frames
#[derive(Debug)]
pub struct LogRenderer {
    every: u64,
    frames: u64,
}

impl Default for LogRenderer {
    fn default() -> Self {
        Self::new(60)
    }
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &FrameSnapshot<'_>) -> Result<(), RenderError> {
        self.frames += 1;
        if self.frames % self.every != 0 {
            return Ok(());
        }
        let hp = frame
            .player
            .map(|p| format!("{:.0}/{:.0}", p.hp, p.max_hp))
            .unwrap_or_else(|| "-".into());
        log::debug!(
            "floor {}/{} {:?} hp {hp} enemies {} projectiles {} kills {}",
            frame.floor,
            frame.total_floors,
            frame.phase,
            frame.enemies.len(),
            frame.projectiles.len(),
            frame.stats.kills,
        );
        Ok(())
    }
}
