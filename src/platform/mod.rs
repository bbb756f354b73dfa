//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging setup
//! - Input events (keyboard map and pointer state)
//! - Scripted input for headless runs

pub mod autopilot;
pub mod input;

pub use autopilot::Autopilot;
pub use input::{InputState, KeyAction};

/// Install the logger for the current target
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("logger already initialised");
    }
}

/// Install the logger for the current target (`RUST_LOG` controls the level)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
