//! Keyboard and pointer state
//!
//! Browser callbacks feed raw key names and pointer coordinates in; the engine
//! pulls one [`TickInput`] out per logic tick.

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

/// Side effect of a key press that is not plain movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    TogglePause,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Held keys, lowercased
    pressed: HashSet<String>,
    /// Pointer position in arena coordinates
    pointer: Option<Vec2>,
    pointer_down: bool,
    /// Dash requested since the last tick
    dash_queued: bool,
}

fn normalize_key(key: &str) -> String {
    match key {
        " " => "space".to_string(),
        other => other.to_lowercase(),
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) -> KeyAction {
        let key = normalize_key(key);
        match key.as_str() {
            "escape" => return KeyAction::TogglePause,
            // Edge triggered, auto-repeat is ignored
            "space" if !self.pressed.contains("space") => self.dash_queued = true,
            _ => {}
        }
        self.pressed.insert(key);
        KeyAction::None
    }

    pub fn key_up(&mut self, key: &str) {
        self.pressed.remove(&normalize_key(key));
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
        self.pointer_down = true;
    }

    pub fn pointer_up(&mut self) {
        self.pointer_down = false;
    }

    /// Drop everything held (window lost focus)
    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.pointer_down = false;
        self.dash_queued = false;
    }

    fn held(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.pressed.contains(*k))
    }

    /// Build the input for the next tick, consuming a queued dash
    pub fn tick_input(&mut self) -> TickInput {
        TickInput {
            up: self.held(&["w", "arrowup"]),
            down: self.held(&["s", "arrowdown"]),
            left: self.held(&["a", "arrowleft"]),
            right: self.held(&["d", "arrowright"]),
            dash: std::mem::take(&mut self.dash_queued),
            fire: self.pointer_down,
            aim: self.pointer,
        }
    }
}
