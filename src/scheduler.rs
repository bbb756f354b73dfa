//! Fixed-step accumulator
//!
//! Decouples 60 Hz logic ticks from the host's animation-frame rate. Each
//! frame adds the clamped wall-clock delta to an accumulator and drains it in
//! whole logic steps, then renders once.

use crate::consts::{MAX_FRAME_MS, TICK_MS};
use crate::error::SimError;

/// Something the scheduler can drive
pub trait FixedStep {
    /// Whether logic steps should run this frame
    fn is_simulating(&self) -> bool;
    /// Advance one logic tick
    fn step(&mut self) -> Result<(), SimError>;
    /// Draw the current state
    fn render(&mut self);
    /// Called instead of stepping while not simulating
    fn idle(&mut self, elapsed_ms: f64);
    /// A step failed; stop simulating until resumed
    fn halt(&mut self, err: SimError);
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub steps: u32,
    pub rendered: bool,
    pub halted: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FixedStepScheduler {
    accumulator_ms: f64,
    last_time_ms: Option<f64>,
}

impl FixedStepScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time banked toward the next step
    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }

    /// Forget the previous timestamp (e.g. after the tab was hidden)
    pub fn reset(&mut self) {
        self.accumulator_ms = 0.0;
        self.last_time_ms = None;
    }

    /// Run one animation frame at `now_ms`
    pub fn frame<T: FixedStep + ?Sized>(&mut self, now_ms: f64, target: &mut T) -> FrameReport {
        let delta = match self.last_time_ms {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_time_ms = Some(now_ms);

        let mut report = FrameReport::default();
        if !target.is_simulating() {
            self.accumulator_ms = 0.0;
            target.idle(delta);
            return report;
        }

        self.accumulator_ms += delta;
        while self.accumulator_ms >= TICK_MS {
            self.accumulator_ms -= TICK_MS;
            if let Err(err) = target.step() {
                log::error!("logic tick failed, pausing: {err}");
                target.halt(err);
                self.accumulator_ms = 0.0;
                report.halted = true;
                break;
            }
            report.steps += 1;
            // A step may end the room or the run
            if !target.is_simulating() {
                self.accumulator_ms = 0.0;
                break;
            }
        }

        target.render();
        report.rendered = true;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Driven {
        simulating: bool,
        steps: u32,
        renders: u32,
        idle_ms: f64,
        fail_on: Option<u32>,
        stop_after: Option<u32>,
        halted: Option<SimError>,
    }

    impl FixedStep for Driven {
        fn is_simulating(&self) -> bool {
            self.simulating
        }

        fn step(&mut self) -> Result<(), SimError> {
            if self.fail_on == Some(self.steps) {
                return Err(SimError::NonFiniteState {
                    entity: "player",
                    tick: u64::from(self.steps),
                });
            }
            self.steps += 1;
            if self.stop_after == Some(self.steps) {
                self.simulating = false;
            }
            Ok(())
        }

        fn render(&mut self) {
            self.renders += 1;
        }

        fn idle(&mut self, elapsed_ms: f64) {
            self.idle_ms += elapsed_ms;
        }

        fn halt(&mut self, err: SimError) {
            self.simulating = false;
            self.halted = Some(err);
        }
    }

    fn driven() -> Driven {
        Driven {
            simulating: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_frame_runs_no_steps() {
        let mut s = FixedStepScheduler::new();
        let mut p = driven();
        let report = s.frame(1000.0, &mut p);
        assert_eq!(report.steps, 0);
        assert_eq!(p.renders, 1);
    }

    #[test]
    fn test_steps_match_elapsed_time() {
        let mut s = FixedStepScheduler::new();
        let mut p = driven();
        s.frame(0.0, &mut p);
        s.frame(50.0, &mut p);
        assert_eq!(p.steps, 3);
        assert!(s.accumulator_ms() < TICK_MS);
        assert_eq!(p.renders, 2);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut s = FixedStepScheduler::new();
        let mut p = driven();
        s.frame(0.0, &mut p);
        s.frame(5000.0, &mut p);
        // 200 ms at 60 Hz
        assert_eq!(p.steps, 12);
    }

    #[test]
    fn test_not_simulating_feeds_idle_and_resets() {
        let mut s = FixedStepScheduler::new();
        let mut p = driven();
        s.frame(0.0, &mut p);
        s.frame(10.0, &mut p);
        p.simulating = false;
        s.frame(110.0, &mut p);
        assert_eq!(p.idle_ms, 100.0);
        assert_eq!(s.accumulator_ms(), 0.0);
        assert_eq!(p.renders, 2);

        p.simulating = true;
        s.frame(115.0, &mut p);
        assert_eq!(p.steps, 0);
    }

    #[test]
    fn test_step_error_halts_and_still_renders() {
        let mut s = FixedStepScheduler::new();
        let mut p = driven();
        p.fail_on = Some(1);
        s.frame(0.0, &mut p);
        let report = s.frame(100.0, &mut p);
        assert!(report.halted && report.rendered);
        assert_eq!(p.steps, 1);
        assert!(p.halted.is_some());
        assert!(!p.simulating);
    }

    #[test]
    fn test_draining_stops_when_room_ends() {
        let mut s = FixedStepScheduler::new();
        let mut p = driven();
        p.stop_after = Some(2);
        s.frame(0.0, &mut p);
        s.frame(150.0, &mut p);
        assert_eq!(p.steps, 2);
        assert_eq!(s.accumulator_ms(), 0.0);
    }
}
