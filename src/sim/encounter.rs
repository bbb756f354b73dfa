//! Floor and room flow
//!
//! Entry points called by the UI plus the transitions the tick triggers
//! (room cleared, player death). Every entry point validates the phase first
//! and leaves the state untouched on error.

use glam::Vec2;
use log::{debug, info};

use super::classes::ClassId;
use super::entity::{Enemy, EnemyArchetype, Player};
use super::events::GameEvent;
use super::rewards::{self, REST_BONUSES};
use super::spawn::{self, SpawnKind};
use super::state::{GamePhase, GameState, RestVisit, RewardOffer};
use crate::consts::*;
use crate::error::CommandError;

impl GameState {
    fn expect_phase(&self, expected: GamePhase) -> Result<(), CommandError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(CommandError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn player_mut(&mut self) -> Result<&mut Player, CommandError> {
        self.player.as_mut().ok_or(CommandError::NoActivePlayer)
    }

    // === Run lifecycle ===

    /// Open class selection for a normal run
    pub fn start_run(&mut self) -> Result<(), CommandError> {
        self.begin_class_select(false)
    }

    /// Open class selection for a run that never ends in victory
    pub fn start_endless(&mut self) -> Result<(), CommandError> {
        self.begin_class_select(true)
    }

    fn begin_class_select(&mut self, endless: bool) -> Result<(), CommandError> {
        if !matches!(self.phase, GamePhase::Menu | GamePhase::End { .. }) {
            return Err(CommandError::WrongPhase {
                expected: GamePhase::Menu,
                actual: self.phase,
            });
        }
        self.endless = endless;
        self.set_phase(GamePhase::ClassSelect);
        Ok(())
    }

    /// Spawn the player with a starting class and enter floor 1
    pub fn select_class(&mut self, class: ClassId) -> Result<(), CommandError> {
        self.expect_phase(GamePhase::ClassSelect)?;
        if !ClassId::STARTERS.contains(&class) {
            return Err(CommandError::NotAStarter(class));
        }

        let center = Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0);
        self.player = Some(Player::new(center, &class.def()));
        self.class = Some(class);
        self.floor = 0;
        self.paused = false;
        self.arena.reset();
        self.spawner.clear();
        info!("run started as {class:?} (endless: {})", self.endless);
        self.arena.emit(GameEvent::RunStarted {
            class,
            endless: self.endless,
        });
        self.next_room();
        Ok(())
    }

    /// Leave the run for the title screen
    pub fn back_to_menu(&mut self) {
        self.player = None;
        self.class = None;
        self.paused = false;
        self.arena.clear_room();
        self.arena.effects.clear();
        self.spawner.clear();
        self.set_phase(GamePhase::Menu);
    }

    // === Between rooms ===

    pub fn select_reward(&mut self, id: u32) -> Result<(), CommandError> {
        self.expect_phase(GamePhase::Reward)?;
        let reward = rewards::find_reward(id).ok_or(CommandError::UnknownReward(id))?;
        if !self.reward_offer.choices.contains(&id) {
            return Err(CommandError::RewardNotOffered(id));
        }
        let player = self.player_mut()?;
        reward.effect.apply(player);
        debug!("reward {} taken", reward.name);
        self.reward_offer = RewardOffer::default();
        self.next_room();
        Ok(())
    }

    /// Claim one of the free rest bonuses (once per visit)
    pub fn take_rest_bonus(&mut self, index: usize) -> Result<(), CommandError> {
        self.expect_phase(GamePhase::Rest)?;
        let bonus = REST_BONUSES
            .get(index)
            .ok_or(CommandError::UnknownBonus(index))?;
        if self.rest.bonus_claimed {
            return Err(CommandError::BonusClaimed);
        }
        let player = self.player_mut()?;
        bonus.effect.apply(player);
        self.rest.bonus_claimed = true;
        Ok(())
    }

    /// Buy a shop item; each item sells once per visit
    pub fn buy_item(&mut self, id: u32) -> Result<(), CommandError> {
        self.expect_phase(GamePhase::Rest)?;
        let item = rewards::find_shop_item(id).ok_or(CommandError::UnknownItem(id))?;
        if self.rest.sold.contains(&id) {
            return Err(CommandError::SoldOut(id));
        }
        let player = self.player.as_mut().ok_or(CommandError::NoActivePlayer)?;
        if player.coins < item.price {
            return Err(CommandError::InsufficientCoins {
                price: item.price,
                balance: player.coins,
            });
        }
        player.coins -= item.price;
        item.effect.apply(player);
        self.rest.sold.push(id);
        debug!("bought {} for {}", item.name, item.price);
        Ok(())
    }

    pub fn leave_rest(&mut self) -> Result<(), CommandError> {
        self.expect_phase(GamePhase::Rest)?;
        self.next_room();
        Ok(())
    }

    /// Take a class advancement offered after a boss floor
    pub fn advance_class(&mut self, next: ClassId) -> Result<(), CommandError> {
        self.expect_phase(GamePhase::ClassAdvance)?;
        let player = self.player.as_mut().ok_or(CommandError::NoActivePlayer)?;
        let from = player.class;
        if !from.advances_into(next) {
            return Err(CommandError::NotAnAdvancement(next));
        }
        player.advance_class(&next.def());
        self.class = Some(next);
        info!("class advanced {from:?} -> {next:?}");
        self.arena.emit(GameEvent::ClassAdvanced { from, to: next });
        self.enter_between_rooms();
        Ok(())
    }

    // === Victory ===

    /// Cash out after the final floor
    pub fn end_run_victory(&mut self) -> Result<(), CommandError> {
        self.expect_phase(GamePhase::Victory)?;
        self.finish_run(true);
        Ok(())
    }

    /// Keep climbing past the final floor
    pub fn enter_endless(&mut self) -> Result<(), CommandError> {
        self.expect_phase(GamePhase::Victory)?;
        self.endless = true;
        self.floor = self.tuning.total_floors;
        self.next_room();
        Ok(())
    }

    // === Pause ===

    pub fn pause(&mut self) -> Result<(), CommandError> {
        self.expect_phase(GamePhase::Playing)?;
        self.paused = true;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), CommandError> {
        self.expect_phase(GamePhase::Playing)?;
        self.paused = false;
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<(), CommandError> {
        self.expect_phase(GamePhase::Playing)?;
        self.paused = !self.paused;
        Ok(())
    }

    // === Transitions driven by the simulation ===

    /// Advance to the next floor, or to victory past the last one
    pub fn next_room(&mut self) {
        self.floor += 1;
        if self.floor > self.tuning.total_floors && !self.endless {
            info!("final floor cleared");
            self.set_phase(GamePhase::Victory);
            return;
        }
        self.set_phase(GamePhase::Playing);
        self.start_combat_room();
    }

    fn start_combat_room(&mut self) {
        let boss = self.is_boss_floor();
        self.arena.clear_room();
        self.spawner
            .plan_room(self.time_ticks, self.floor, boss, &self.tuning);
        debug!(
            "floor {} started ({} spawns queued, boss: {boss})",
            self.floor,
            self.spawner.pending()
        );
        self.arena.emit(GameEvent::FloorStarted {
            floor: self.floor,
            boss,
        });
    }

    /// Materialize every spawn due this tick
    pub fn spawn_due(&mut self) {
        let player_pos = self.player.as_ref().map(Player::pos);
        for kind in self.spawner.poll(self.time_ticks) {
            let id = self.arena.next_entity_id();
            let archetype = EnemyArchetype::roll(&mut self.arena.rng, self.floor);
            let enemy = match kind {
                SpawnKind::Boss => {
                    let pos = spawn::farthest_corner(player_pos, self.tuning.boss_corner_inset);
                    Enemy::boss(id, pos, self.floor, archetype)
                }
                SpawnKind::Minion => {
                    let pos = spawn::perimeter_position(
                        &mut self.arena.rng,
                        player_pos,
                        self.tuning.spawn_min_distance,
                        self.tuning.spawn_attempts,
                    );
                    Enemy::minion(id, pos, self.floor, archetype)
                }
            };
            debug!("spawned {kind:?} {archetype:?} at {:?}", enemy.pos());
            self.arena.enemies.push(enemy);
        }
    }

    /// Playing, nothing left to spawn and nothing alive
    pub fn is_room_cleared(&self) -> bool {
        self.phase == GamePhase::Playing
            && !self.spawner.is_spawning()
            && self.arena.live_enemies() == 0
    }

    pub fn on_room_cleared(&mut self) {
        self.arena.stats.floors_cleared += 1;
        self.arena.emit(GameEvent::RoomCleared { floor: self.floor });
        self.transition_ms = 0.0;
        self.set_phase(GamePhase::Transition);
    }

    /// Count wall time spent in the transition screen
    pub fn advance_transition(&mut self, elapsed_ms: f64) {
        if self.phase != GamePhase::Transition {
            return;
        }
        self.transition_ms += elapsed_ms;
        if self.transition_ms >= self.tuning.transition_ms {
            self.finish_transition();
        }
    }

    fn finish_transition(&mut self) {
        let can_advance = self.player.as_ref().is_some_and(|p| p.class.can_advance());
        if self.is_boss_floor() && can_advance {
            self.set_phase(GamePhase::ClassAdvance);
        } else {
            self.enter_between_rooms();
        }
    }

    fn enter_between_rooms(&mut self) {
        if self.tuning.is_rest_floor(self.floor) {
            self.rest = RestVisit::default();
            self.set_phase(GamePhase::Rest);
        } else {
            self.reward_offer = RewardOffer {
                choices: rewards::roll_offer(&mut self.arena.rng, self.tuning.reward_choices),
            };
            self.set_phase(GamePhase::Reward);
        }
    }

    /// The player died with no revive left
    pub fn game_over(&mut self) {
        self.finish_run(false);
    }

    fn finish_run(&mut self, victory: bool) {
        self.spawner.clear();
        self.paused = false;
        let coins_earned = self.arena.stats.coins_earned;
        info!(
            "run ended on floor {} (victory: {victory}, kills: {}, coins: {coins_earned})",
            self.floor, self.arena.stats.kills
        );
        self.arena.emit(GameEvent::RunEnded {
            victory,
            floor: self.floor,
            coins_earned,
        });
        self.set_phase(GamePhase::End { victory });
    }
}
