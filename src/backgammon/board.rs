use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::{
    backgammon::{BLACK_BAR, Player, WHITE_BAR},
    error::BoardError,
};

/// Checkers each player starts with.
pub const CHECKERS_PER_PLAYER: u32 = 15;

/// Board of 26 signed counts. Indices 0-23 are the points (white positive,
/// black negative), index 24 is white's bar and index 25 black's bar, both
/// stored as non-negative counts.
///
/// Boards are plain values: every transform in
/// [`crate::backgammon::movegen`] returns a new board instead of mutating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<i8>", try_from = "Vec<i8>")]
pub struct Board {
    cells: [i8; 26],
}

impl Board {
    /// Creates a new board with the default starting position.
    pub fn new() -> Self {
        let mut board = Board::empty();
        board[0] = -2;
        board[5] = 5;
        board[7] = 3;
        board[11] = -5;
        board[12] = 5;
        board[16] = -3;
        board[18] = -5;
        board[23] = 2;
        board
    }

    /// Creates an empty board with no checkers on it.
    pub fn empty() -> Self {
        Board { cells: [0; 26] }
    }

    /// Checkers `player` has on point `index` (0 if the point is empty or held by the opponent).
    pub fn count(&self, index: usize, player: Player) -> u8 {
        assert!(index < 24, "point index {index} out of range");
        let value = self.cells[index] * player.sign();
        value.max(0) as u8
    }

    pub fn bar(&self, player: Player) -> u8 {
        self.cells[player.bar_index()] as u8
    }

    /// Sum over `player`'s checkers of the distance still to travel; bar checkers count 25.
    pub fn pip_count(&self, player: Player) -> u32 {
        let on_points: u32 = (0..24)
            .map(|i| self.count(i, player) as u32 * player.distance(i))
            .sum();
        on_points + self.bar(player) as u32 * 25
    }

    /// Checkers `player` still has in play (points plus bar).
    pub fn checkers_in_play(&self, player: Player) -> u32 {
        let on_points: u32 = (0..24).map(|i| self.count(i, player) as u32).sum();
        on_points + self.bar(player) as u32
    }

    /// Every checker accounted for: in play plus borne off equals 15 for both players.
    pub fn is_consistent(&self, borne_off: &BorneOff) -> bool {
        Player::BOTH.iter().all(|&p| {
            self.checkers_in_play(p) + borne_off.get(p) as u32 == CHECKERS_PER_PLAYER
        }) && self.cells[WHITE_BAR] >= 0
            && self.cells[BLACK_BAR] >= 0
    }

    /// Text diagram from white's side, top row points 13-24, bottom row 12-1.
    pub fn to_fancy_string(&self, borne_off: &BorneOff) -> String {
        fn cell(v: i8) -> String {
            match v {
                0 => "  . ".to_string(),
                v if v > 0 => format!("{:>3}W", v),
                v => format!("{:>3}B", -v),
            }
        }
        let top: String = (12..24).map(|i| cell(self.cells[i])).collect();
        let bottom: String = (0..12).rev().map(|i| cell(self.cells[i])).collect();
        format!(
            " 13  14  15  16  17  18  19  20  21  22  23  24\n{top}\n{bottom}\n 12  11  10   9   8   7   6   5   4   3   2   1\n\
             bar W:{} B:{}  off W:{} B:{}  pips W:{} B:{}",
            self.bar(Player::White),
            self.bar(Player::Black),
            borne_off.white,
            borne_off.black,
            self.pip_count(Player::White),
            self.pip_count(Player::Black),
        )
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Index<usize> for Board {
    type Output = i8;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cells[index]
    }
}

impl IndexMut<usize> for Board {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.cells[index]
    }
}

impl From<Board> for Vec<i8> {
    fn from(board: Board) -> Self {
        board.cells.to_vec()
    }
}

impl TryFrom<Vec<i8>> for Board {
    type Error = BoardError;

    fn try_from(cells: Vec<i8>) -> Result<Self, Self::Error> {
        let cells: [i8; 26] = cells
            .try_into()
            .map_err(|v: Vec<i8>| BoardError::WrongLength(v.len()))?;
        let board = Board { cells };
        for player in Player::BOTH {
            let count = board.cells[player.bar_index()];
            if count < 0 {
                return Err(BoardError::NegativeBar { player, count });
            }
        }
        for player in Player::BOTH {
            let count = board.checkers_in_play(player);
            if count > CHECKERS_PER_PLAYER {
                return Err(BoardError::TooManyCheckers { player, count });
            }
        }
        Ok(board)
    }
}

/// Checkers each player has borne off, 0..=15.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorneOff {
    pub white: u8,
    pub black: u8,
}

impl BorneOff {
    pub fn new() -> Self {
        BorneOff::default()
    }

    pub fn get(&self, player: Player) -> u8 {
        match player {
            Player::White => self.white,
            Player::Black => self.black,
        }
    }

    pub fn get_mut(&mut self, player: Player) -> &mut u8 {
        match player {
            Player::White => &mut self.white,
            Player::Black => &mut self.black,
        }
    }
}
