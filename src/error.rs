//! Error types for the checked entry points.
//!
//! The move generator, evaluator and reviewer are pure functions over
//! well-formed input and panic on contract violations instead. These errors
//! cover data crossing a boundary (deserialized boards and dice) and the
//! driver-facing state machines (cube and game).

use crate::backgammon::Player;

/// A board rejected while converting from raw data.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board must have 26 entries, got {0}")]
    WrongLength(usize),

    #[error("bar count for {player} is negative: {count}")]
    NegativeBar { player: Player, count: i8 },

    #[error("{player} has {count} checkers on the board, more than 15")]
    TooManyCheckers { player: Player, count: u32 },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("die value {0} is outside 1..=6")]
    OutOfRange(u8),

    #[error("cannot parse dice from {0:?}")]
    Unparsable(String),
}

/// Cube transitions requested out of order.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CubeError {
    #[error("{player} may not offer a double while the cube is owned by {owner}")]
    NotCubeOwner { player: Player, owner: Player },

    #[error("a double offered by {0} is already pending")]
    OfferPending(Player),

    #[error("no double has been offered")]
    NoPendingOffer,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("the game is already over")]
    GameOver,

    #[error("cannot {action} during the {phase} phase")]
    WrongPhase {
        action: &'static str,
        phase: &'static str,
    },

    #[error("illegal move {0} for the current roll")]
    IllegalMove(String),

    #[error(transparent)]
    Cube(#[from] CubeError),
}

/// Result type alias for game driver operations
pub type GameResult<T> = Result<T, GameError>;
