use serde::{Deserialize, Serialize};

use crate::backgammon::{BLACK_BAR, WHITE_BAR};

/// White owns positive counts and moves from index 23 down to 0.
/// Black owns negative counts and moves from index 0 up to 23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::White, Player::Black];

    pub fn opposite(&self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Sign of this player's checker counts on a point.
    pub fn sign(&self) -> i8 {
        match self {
            Player::White => 1,
            Player::Black => -1,
        }
    }

    pub fn bar_index(&self) -> usize {
        match self {
            Player::White => WHITE_BAR,
            Player::Black => BLACK_BAR,
        }
    }

    /// White maximizes the evaluation, black minimizes it.
    pub fn is_maximizing(&self) -> bool {
        matches!(self, Player::White)
    }

    /// Distance a checker on `index` still has to travel before it is borne off.
    pub fn distance(&self, index: usize) -> u32 {
        match self {
            Player::White => index as u32 + 1,
            Player::Black => 24 - index as u32,
        }
    }

    /// Index range of this player's home board.
    pub fn home_board(&self) -> std::ops::Range<usize> {
        match self {
            Player::White => 0..6,
            Player::Black => 18..24,
        }
    }

    /// Point a checker lands on when entering from the bar with `die`.
    pub fn entry_point(&self, die: u8) -> usize {
        match self {
            Player::White => 24 - die as usize,
            Player::Black => die as usize - 1,
        }
    }

    /// Destination of a regular move of `die` pips from `from`, `None` if it leaves the board.
    pub fn target(&self, from: usize, die: u8) -> Option<usize> {
        match self {
            Player::White => from.checked_sub(die as usize),
            Player::Black => Some(from + die as usize).filter(|&to| to < 24),
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::White => write!(f, "white"),
            Player::Black => write!(f, "black"),
        }
    }
}
