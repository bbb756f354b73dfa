//! Error types for the simulation core and its entry points.
//!
//! Collaborator failures (rendering, audio) have their own error types next to
//! their traits and are always swallowed at the call site.

use thiserror::Error;

use crate::sim::{ClassId, GamePhase};

/// Failure detected while advancing a logic tick.
///
/// The scheduler treats any of these as a pause-and-report condition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// An entity ended the tick with a NaN or infinite coordinate.
    #[error("non-finite {entity} state after tick {tick}")]
    NonFiniteState { entity: &'static str, tick: u64 },
}

/// Rejected engine command (UI entry point called at the wrong time or with bad data).
///
/// Commands that fail leave the game state untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("command requires phase {expected:?}, current phase is {actual:?}")]
    WrongPhase {
        expected: GamePhase,
        actual: GamePhase,
    },
    #[error("no active player")]
    NoActivePlayer,
    #[error("unknown reward id {0}")]
    UnknownReward(u32),
    #[error("reward {0} was not offered")]
    RewardNotOffered(u32),
    #[error("unknown shop item id {0}")]
    UnknownItem(u32),
    #[error("unknown rest bonus index {0}")]
    UnknownBonus(usize),
    #[error("{0:?} is not a starting class")]
    NotAStarter(ClassId),
    #[error("{0:?} is not an advancement of the current class")]
    NotAnAdvancement(ClassId),
    #[error("item costs {price} coins, balance is {balance}")]
    InsufficientCoins { price: u32, balance: u32 },
    #[error("shop item {0} is sold out")]
    SoldOut(u32),
    #[error("rest bonus already claimed")]
    BonusClaimed,
}
