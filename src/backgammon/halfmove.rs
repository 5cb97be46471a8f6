use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::backgammon::Position;

/// One checker moved by one die. `from` is a point index (0-23) or a bar
/// index, `to` is a point index or [`crate::backgammon::BEAR_OFF`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HalfMove {
    pub from: u8,
    pub to: u8,
    pub die: u8,
    /// The destination held exactly one opposing checker before the move.
    pub is_hit: bool,
}

impl HalfMove {
    pub fn new(from: usize, to: usize, die: u8, is_hit: bool) -> Self {
        HalfMove { from: from as u8, to: to as u8, die, is_hit }
    }

    pub fn source(&self) -> Position {
        Position::from_index(self.from)
    }

    pub fn destination(&self) -> Position {
        Position::from_index(self.to)
    }

    /// Moves are identified by their endpoints; the die is implied by them.
    pub fn same_path(&self, other: &HalfMove) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl std::fmt::Display for HalfMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.source().notation(), self.destination().notation())?;
        if self.is_hit {
            write!(f, "*")?;
        }
        Ok(())
    }
}

impl Debug for HalfMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -> {:?} ({})", self.source(), self.destination(), self.die)?;
        if self.is_hit {
            write!(f, " hit")?;
        }
        Ok(())
    }
}
