//! Abyss Arena headless runner
//!
//! Plays one run with the autopilot at a simulated 60 fps, auto-picking
//! rewards, rest bonuses and class advancements, then prints the final frame
//! as JSON.
//!
//! Run with `--help` for the available flags.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use abyss_arena::audio::LogAudio;
    use abyss_arena::game::{Collaborators, Game};
    use abyss_arena::persistence::JsonFileStore;
    use abyss_arena::platform::{self, Autopilot};
    use abyss_arena::renderer::{FrameSnapshot, LogRenderer};
    use abyss_arena::sim::{ClassId, GamePhase, REST_BONUSES, SHOP_ITEMS};
    use abyss_arena::{Settings, Tuning};
    use anyhow::{Context, Result};
    use clap::{Parser, ValueEnum};

    /// Simulated frame length
    const FRAME_MS: f64 = 16.0;

    #[derive(Parser, Debug)]
    #[command(name = "abyss-arena")]
    #[command(about = "Play one autopiloted Abyss Arena run and print the final frame as JSON")]
    struct Cli {
        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,
        /// Starting class
        #[arg(long, value_enum, default_value_t = CliClass::Warrior)]
        class: CliClass,
        /// Balance overrides as JSON
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Lifetime profile file
        #[arg(long, default_value = "abyss-arena-profile.json")]
        profile: PathBuf,
        /// Give up after this many frames
        #[arg(long, default_value_t = 60 * 60 * 30)]
        frames: u64,
    }

    #[derive(Clone, Copy, Debug, ValueEnum)]
    enum CliClass {
        Warrior,
        Mage,
        Ranger,
        Tamer,
    }

    impl From<CliClass> for ClassId {
        fn from(value: CliClass) -> Self {
            match value {
                CliClass::Warrior => ClassId::Warrior,
                CliClass::Mage => ClassId::Mage,
                CliClass::Ranger => ClassId::Ranger,
                CliClass::Tamer => ClassId::Tamer,
            }
        }
    }

    /// Make whatever choice the current between-rooms screen asks for
    fn advance_menus(game: &mut Game) {
        let state = game.state();
        let result = match state.phase {
            GamePhase::Reward => match state.reward_offer.choices.first().copied() {
                Some(id) => game.select_reward(id),
                None => Ok(()),
            },
            GamePhase::Rest => {
                if !state.rest.bonus_claimed && !REST_BONUSES.is_empty() {
                    game.take_rest_bonus(0)
                } else {
                    let coins = state.player.as_ref().map_or(0, |p| p.coins);
                    let affordable = SHOP_ITEMS
                        .iter()
                        .find(|item| item.price <= coins && !state.rest.sold.contains(&item.id))
                        .map(|item| item.id);
                    match affordable {
                        Some(id) => game.buy_item(id),
                        None => game.leave_rest(),
                    }
                }
            }
            GamePhase::ClassAdvance => {
                let next = state
                    .player
                    .as_ref()
                    .and_then(|p| p.class.def().advances.first().copied());
                match next {
                    Some(next) => game.advance_class(next),
                    None => Ok(()),
                }
            }
            GamePhase::Victory => game.end_run_victory(),
            _ => Ok(()),
        };
        if let Err(err) = result {
            log::warn!("autopilot menu choice rejected: {err}");
        }
    }

    pub fn run() -> Result<()> {
        platform::init_logging();
        let cli = Cli::parse();
        let seed = cli.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("failed loading tuning {}", path.display()))?,
            None => Tuning::default(),
        };
        log::info!("Abyss Arena (headless) starting, seed {seed}");

        let mut game = Game::new(
            seed,
            tuning,
            Settings::load(),
            Collaborators {
                renderer: Box::new(LogRenderer::default()),
                audio: Box::new(LogAudio),
                store: Box::new(JsonFileStore::new(&cli.profile)),
            },
        );
        game.set_autopilot(Some(Autopilot::new()));
        game.start_run()?;
        game.select_class(cli.class.into())?;

        let mut now = 0.0;
        for _ in 0..cli.frames {
            game.frame(now);
            now += FRAME_MS;

            if let Some(err) = game.last_error() {
                log::error!("run stopped: {err}");
                break;
            }
            if matches!(game.state().phase, GamePhase::End { .. }) {
                break;
            }
            advance_menus(&mut game);
            for event in game.take_ui_events() {
                log::debug!("ui: {event:?}");
            }
        }

        let frame = FrameSnapshot::capture(game.state());
        let json = serde_json::to_string_pretty(&frame).context("failed to serialize final frame")?;
        println!("{json}");
        log::info!(
            "profile: {} runs, {} victories, {} coins",
            game.profile().total_runs,
            game.profile().victories,
            game.profile().coins
        );
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::CommandFactory;

        #[test]
        fn test_cli_definition_is_valid() {
            Cli::command().debug_assert();
        }

        #[test]
        fn test_cli_parses_class_and_defaults() {
            let cli = Cli::try_parse_from(["abyss-arena", "--class", "tamer", "--seed", "7"]).unwrap();
            assert_eq!(ClassId::from(cli.class), ClassId::Tamer);
            assert_eq!(cli.seed, Some(7));
            assert_eq!(cli.frames, 60 * 60 * 30);
            assert!(cli.tuning.is_none());
        }

        #[test]
        fn test_cli_rejects_advanced_class() {
            assert!(Cli::try_parse_from(["abyss-arena", "--class", "paladin"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts embed the library and drive `Game::frame` themselves
}
