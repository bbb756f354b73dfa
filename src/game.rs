//! Engine facade
//!
//! [`Game`] owns the simulation state and its collaborators (renderer, audio,
//! progress store, input) and is what a host drives: one [`Game::frame`] per
//! animation frame plus the UI entry points. Simulation events are drained
//! after every step and command and fanned out to audio, persistence and the
//! UI queue.

use glam::Vec2;
use log::{info, warn};

use crate::audio::{AudioManager, AudioSink, NullAudio};
use crate::error::{CommandError, SimError};
use crate::persistence::{MemoryStore, Profile, ProgressStore};
use crate::platform::{Autopilot, InputState, KeyAction};
use crate::renderer::{FrameSnapshot, NullRenderer, Renderer};
use crate::scheduler::{FixedStep, FixedStepScheduler, FrameReport};
use crate::settings::Settings;
use crate::sim::{self, ClassId, GameEvent, GameState};
use crate::tuning::Tuning;

/// External collaborators handed to the engine
pub struct Collaborators {
    pub renderer: Box<dyn Renderer>,
    pub audio: Box<dyn AudioSink>,
    pub store: Box<dyn ProgressStore>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            renderer: Box::new(NullRenderer),
            audio: Box::new(NullAudio),
            store: Box::new(MemoryStore::default()),
        }
    }
}

/// Everything the scheduler drives
struct Runtime {
    state: GameState,
    renderer: Box<dyn Renderer>,
    audio: AudioManager,
    store: Box<dyn ProgressStore>,
    profile: Profile,
    settings: Settings,
    input: InputState,
    autopilot: Option<Autopilot>,
    last_error: Option<SimError>,
    ui_events: Vec<GameEvent>,
}

impl Runtime {
    /// Fan queued simulation events out to the collaborators
    fn dispatch_events(&mut self) {
        for event in self.state.arena.drain_events() {
            self.audio.handle(&event);
            match &event {
                GameEvent::RunStarted { .. } => self.load_profile(),
                GameEvent::RunEnded {
                    victory,
                    coins_earned,
                    ..
                } => self.save_profile(*victory, *coins_earned),
                _ => {}
            }
            if event.is_ui() {
                self.ui_events.push(event);
            }
        }
    }

    fn load_profile(&mut self) {
        match self.store.load() {
            Ok(profile) => self.profile = profile,
            Err(err) => warn!("could not load profile, keeping current totals: {err}"),
        }
    }

    fn save_profile(&mut self, victory: bool, coins_earned: u32) {
        self.profile.record_run(victory, coins_earned);
        if let Err(err) = self.store.save(&self.profile) {
            warn!("could not save profile: {err}");
        }
    }
}

impl FixedStep for Runtime {
    fn is_simulating(&self) -> bool {
        self.state.is_simulating()
    }

    fn step(&mut self) -> Result<(), SimError> {
        let input = match self.autopilot.as_mut() {
            Some(pilot) => pilot.next_input(&self.state),
            None => self.input.tick_input(),
        };
        let result = sim::tick(&mut self.state, &input);
        self.dispatch_events();
        result
    }

    fn render(&mut self) {
        let frame = FrameSnapshot::capture(&self.state);
        if let Err(err) = self.renderer.render(&frame) {
            warn!("render failed: {err}");
        }
    }

    /// Paused and between-room frames keep timers running but draw nothing
    fn idle(&mut self, elapsed_ms: f64) {
        self.state.advance_transition(elapsed_ms);
        self.dispatch_events();
    }

    fn halt(&mut self, err: SimError) {
        self.state.paused = true;
        self.last_error = Some(err);
    }
}

pub struct Game {
    scheduler: FixedStepScheduler,
    runtime: Runtime,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning, settings: Settings, collaborators: Collaborators) -> Self {
        let Collaborators {
            renderer,
            audio,
            mut store,
        } = collaborators;

        let profile = store.load().unwrap_or_else(|err| {
            warn!("could not load profile, starting fresh: {err}");
            Profile::default()
        });

        let mut state = GameState::new(seed, tuning);
        settings.apply_to_effects(&mut state.arena.effects);
        let mut audio = AudioManager::new(audio);
        audio.apply_settings(&settings);

        info!("engine ready (seed {seed}, {} runs on record)", profile.total_runs);
        Self {
            scheduler: FixedStepScheduler::new(),
            runtime: Runtime {
                state,
                renderer,
                audio,
                store,
                profile,
                settings,
                input: InputState::new(),
                autopilot: None,
                last_error: None,
                ui_events: Vec::new(),
            },
        }
    }

    /// Animation frame callback
    pub fn frame(&mut self, now_ms: f64) -> FrameReport {
        self.scheduler.frame(now_ms, &mut self.runtime)
    }

    pub fn state(&self) -> &GameState {
        &self.runtime.state
    }

    pub fn profile(&self) -> &Profile {
        &self.runtime.profile
    }

    pub fn settings(&self) -> &Settings {
        &self.runtime.settings
    }

    /// Failure that paused the simulation, if any
    pub fn last_error(&self) -> Option<&SimError> {
        self.runtime.last_error.as_ref()
    }

    /// Phase notifications queued since the last call
    pub fn take_ui_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.runtime.ui_events)
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        let rt = &mut self.runtime;
        settings.apply_to_effects(&mut rt.state.arena.effects);
        rt.audio.apply_settings(&settings);
        settings.save();
        rt.settings = settings;
    }

    /// Replace player input with scripted input
    pub fn set_autopilot(&mut self, autopilot: Option<Autopilot>) {
        self.runtime.autopilot = autopilot;
    }

    // === Input ===

    pub fn key_down(&mut self, key: &str) {
        if self.runtime.input.key_down(key) == KeyAction::TogglePause {
            let _ = self.toggle_pause();
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.runtime.input.key_up(key);
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.runtime.input.pointer_move(pos);
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.runtime.input.pointer_down(pos);
    }

    pub fn pointer_up(&mut self) {
        self.runtime.input.pointer_up();
    }

    /// Window lost focus: drop held input and pause
    pub fn blur(&mut self) {
        self.runtime.input.release_all();
        let _ = self.pause();
        self.scheduler.reset();
    }

    // === UI entry points ===

    fn command(
        &mut self,
        f: impl FnOnce(&mut GameState) -> Result<(), CommandError>,
    ) -> Result<(), CommandError> {
        let result = f(&mut self.runtime.state);
        if let Err(err) = &result {
            log::debug!("command rejected: {err}");
        }
        self.runtime.dispatch_events();
        result
    }

    pub fn start_run(&mut self) -> Result<(), CommandError> {
        self.command(GameState::start_run)
    }

    pub fn start_endless(&mut self) -> Result<(), CommandError> {
        self.command(GameState::start_endless)
    }

    pub fn select_class(&mut self, class: ClassId) -> Result<(), CommandError> {
        self.command(|s| s.select_class(class))
    }

    pub fn select_reward(&mut self, id: u32) -> Result<(), CommandError> {
        self.command(|s| s.select_reward(id))
    }

    pub fn take_rest_bonus(&mut self, index: usize) -> Result<(), CommandError> {
        self.command(|s| s.take_rest_bonus(index))
    }

    pub fn buy_item(&mut self, id: u32) -> Result<(), CommandError> {
        self.command(|s| s.buy_item(id))
    }

    pub fn leave_rest(&mut self) -> Result<(), CommandError> {
        self.command(GameState::leave_rest)
    }

    pub fn advance_class(&mut self, next: ClassId) -> Result<(), CommandError> {
        self.command(|s| s.advance_class(next))
    }

    pub fn end_run_victory(&mut self) -> Result<(), CommandError> {
        self.command(GameState::end_run_victory)
    }

    pub fn enter_endless(&mut self) -> Result<(), CommandError> {
        self.command(GameState::enter_endless)
    }

    pub fn pause(&mut self) -> Result<(), CommandError> {
        self.command(GameState::pause)
    }

    /// Resume play, clearing a halted tick's error
    pub fn resume(&mut self) -> Result<(), CommandError> {
        self.command(GameState::resume)?;
        self.runtime.last_error = None;
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<(), CommandError> {
        self.command(GameState::toggle_pause)
    }

    pub fn back_to_menu(&mut self) {
        let _ = self.command(|s| {
            s.back_to_menu();
            Ok(())
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderError;
    use crate::sim::GamePhase;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Shared-handle store so tests can inspect what was saved
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl ProgressStore for SharedStore {
        fn load(&mut self) -> Result<Profile, crate::persistence::PersistError> {
            self.0.borrow_mut().load()
        }

        fn save(&mut self, profile: &Profile) -> Result<(), crate::persistence::PersistError> {
            self.0.borrow_mut().save(profile)
        }
    }

    /// Counts frames handed to the renderer
    #[derive(Clone, Default)]
    struct CountingRenderer(Rc<Cell<u32>>);

    impl Renderer for CountingRenderer {
        fn render(&mut self, _frame: &FrameSnapshot<'_>) -> Result<(), RenderError> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    fn game_with(store: SharedStore) -> Game {
        Game::new(
            11,
            Tuning::default(),
            Settings::default(),
            Collaborators {
                store: Box::new(store),
                ..Default::default()
            },
        )
    }

    fn game() -> Game {
        game_with(SharedStore::default())
    }

    fn run_frames(game: &mut Game, from_ms: f64, frames: u32) -> f64 {
        let mut now = from_ms;
        for _ in 0..frames {
            now += 16.0;
            game.frame(now);
        }
        now
    }

    #[test]
    fn test_commands_queue_phase_events() {
        let mut g = game();
        g.start_run().unwrap();
        g.select_class(ClassId::Warrior).unwrap();
        let events = g.take_ui_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::PhaseChanged {
                to: GamePhase::Playing,
                ..
            }
        )));
        assert!(g.take_ui_events().is_empty());
    }

    #[test]
    fn test_rejected_command_leaves_phase() {
        let mut g = game();
        assert!(g.select_reward(1).is_err());
        assert_eq!(g.state().phase, GamePhase::Menu);
    }

    #[test]
    fn test_frames_advance_ticks_while_playing() {
        let mut g = game();
        g.start_run().unwrap();
        g.select_class(ClassId::Mage).unwrap();
        g.frame(0.0);
        run_frames(&mut g, 0.0, 30);
        assert!(g.state().time_ticks >= 25);
    }

    #[test]
    fn test_escape_pauses_simulation() {
        let mut g = game();
        g.start_run().unwrap();
        g.select_class(ClassId::Mage).unwrap();
        g.key_down("Escape");
        assert!(g.state().paused);
        g.frame(0.0);
        run_frames(&mut g, 0.0, 10);
        assert_eq!(g.state().time_ticks, 0);
        g.key_down("Escape");
        assert!(!g.state().paused);
    }

    #[test]
    fn test_paused_frames_are_not_rendered() {
        let renders = CountingRenderer::default();
        let mut g = Game::new(
            11,
            Tuning::default(),
            Settings::default(),
            Collaborators {
                renderer: Box::new(renders.clone()),
                ..Default::default()
            },
        );
        g.start_run().unwrap();
        g.select_class(ClassId::Mage).unwrap();
        g.frame(0.0);
        let now = run_frames(&mut g, 0.0, 5);
        assert_eq!(renders.0.get(), 6);

        g.key_down("Escape");
        let now = run_frames(&mut g, now, 10);
        assert_eq!(renders.0.get(), 6);
        assert!(!g.frame(now + 16.0).rendered);

        g.key_down("Escape");
        assert!(g.frame(now + 32.0).rendered);
        assert_eq!(renders.0.get(), 7);
    }

    #[test]
    fn test_halt_pauses_and_records_error() {
        let mut g = game();
        g.start_run().unwrap();
        g.select_class(ClassId::Ranger).unwrap();
        g.runtime.state.player.as_mut().unwrap().body.pos = Vec2::NAN;
        g.frame(0.0);
        let report = g.frame(20.0);
        assert!(report.halted);
        assert!(g.state().paused);
        assert!(g.last_error().is_some());

        g.runtime.state.player.as_mut().unwrap().body.pos = Vec2::new(100.0, 100.0);
        g.resume().unwrap();
        assert!(g.last_error().is_none());
    }

    #[test]
    fn test_run_end_saves_profile() {
        let store = SharedStore::default();
        let mut g = game_with(store.clone());
        g.start_run().unwrap();
        g.select_class(ClassId::Warrior).unwrap();
        g.runtime.state.game_over();
        g.runtime.dispatch_events();

        let saved = store.0.borrow().profile.clone().unwrap();
        assert_eq!(saved.total_runs, 1);
        assert_eq!(g.profile().total_runs, 1);
        assert_eq!(g.state().phase, GamePhase::End { victory: false });
    }

    #[test]
    fn test_transition_runs_on_wall_time() {
        let mut g = game();
        g.start_run().unwrap();
        g.select_class(ClassId::Warrior).unwrap();
        g.runtime.state.spawner.clear();
        g.runtime.state.arena.enemies.clear();
        g.frame(0.0);
        g.frame(20.0);
        assert_eq!(g.state().phase, GamePhase::Transition);

        run_frames(&mut g, 20.0, 40);
        assert_eq!(g.state().phase, GamePhase::Reward);
    }

    #[test]
    fn test_autopilot_drives_input() {
        let mut g = game();
        g.set_autopilot(Some(Autopilot::new()));
        g.start_run().unwrap();
        g.select_class(ClassId::Ranger).unwrap();
        g.frame(0.0);
        run_frames(&mut g, 0.0, 120);
        assert!(g.state().time_ticks > 100);
    }
}
