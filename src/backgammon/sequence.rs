use std::{fmt::Debug, ops::Deref};

use serde::{Deserialize, Serialize};

use crate::{backgammon::HalfMove, misc::TinyVec};

/// The moves played in one turn, in the order the dice were applied.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<HalfMove>", into = "Vec<HalfMove>")]
pub struct Sequence {
    half_moves: TinyVec<HalfMove, 4>,
}

impl Sequence {
    pub fn new() -> Self {
        Sequence { half_moves: TinyVec::new() }
    }

    pub fn push(&mut self, half_move: HalfMove) {
        self.half_moves.push(half_move);
    }

    pub fn pop(&mut self) -> Option<HalfMove> {
        self.half_moves.pop()
    }

    /// Dice values consumed by this sequence, in order.
    pub fn dice_used(&self) -> impl Iterator<Item = u8> + '_ {
        self.half_moves.iter().map(|m| m.die)
    }

    /// True if `prefix` matches the start of this sequence by from/to pairs.
    pub fn starts_with(&self, prefix: &[HalfMove]) -> bool {
        prefix.len() <= self.len()
            && self.iter().zip(prefix).all(|(a, b)| a.same_path(b))
    }

    /// Same moves in any order.
    pub fn unordered_equal(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut used: u8 = 0;
        for half_move in self.iter() {
            match other
                .iter()
                .enumerate()
                .position(|(i, hm)| hm == half_move && used & (1 << i) == 0)
            {
                Some(index) => used |= 1 << index,
                None => return false,
            }
        }
        true
    }
}

impl Deref for Sequence {
    type Target = TinyVec<HalfMove, 4>;

    fn deref(&self) -> &Self::Target {
        &self.half_moves
    }
}

impl From<&[HalfMove]> for Sequence {
    fn from(moves: &[HalfMove]) -> Self {
        Sequence { half_moves: TinyVec::from_slice(moves) }
    }
}

impl From<Vec<HalfMove>> for Sequence {
    fn from(moves: Vec<HalfMove>) -> Self {
        Sequence::from(moves.as_slice())
    }
}

impl From<Sequence> for Vec<HalfMove> {
    fn from(sequence: Sequence) -> Self {
        sequence.to_vec()
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "(no move)");
        }
        for (i, half_move) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", half_move)?;
        }
        Ok(())
    }
}

impl Debug for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sequence: ")?;
        for (i, half_move) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", half_move)?;
        }
        Ok(())
    }
}
