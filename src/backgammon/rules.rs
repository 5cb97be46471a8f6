//! Rule predicates shared by the move generator, the evaluator and the game driver.

use serde::{Deserialize, Serialize};

use crate::backgammon::{BEAR_OFF, Board, BorneOff, CHECKERS_PER_PLAYER, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinType {
    Normal,
    Gammon,
    Backgammon,
}

impl WinType {
    /// Points before the cube multiplier.
    pub fn multiplier(&self) -> u32 {
        match self {
            WinType::Normal => 1,
            WinType::Gammon => 2,
            WinType::Backgammon => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Ongoing,
    Won { winner: Player, win_type: WinType },
}

/// A destination is blocked if it holds two or more opposing checkers.
/// Bearing off is never blocked.
pub fn is_blocked(board: &Board, to: usize, player: Player) -> bool {
    if to == BEAR_OFF {
        return false;
    }
    board.count(to, player.opposite()) >= 2
}

pub fn has_bar(board: &Board, player: Player) -> bool {
    board.bar(player) > 0
}

/// Nothing on the bar and nothing outside the home board.
pub fn can_bear_off(board: &Board, player: Player) -> bool {
    if has_bar(board, player) {
        return false;
    }
    let home = player.home_board();
    (0..24)
        .filter(|i| !home.contains(i))
        .all(|i| board.count(i, player) == 0)
}

pub fn has_won(borne_off: &BorneOff, player: Player) -> bool {
    borne_off.get(player) as u32 >= CHECKERS_PER_PLAYER
}

/// Classifies a finished game from the loser's position.
pub fn win_type(board: &Board, borne_off: &BorneOff, winner: Player) -> WinType {
    let loser = winner.opposite();
    if borne_off.get(loser) > 0 {
        return WinType::Normal;
    }
    let in_winners_home = winner.home_board().any(|i| board.count(i, loser) > 0);
    if has_bar(board, loser) || in_winners_home {
        WinType::Backgammon
    } else {
        WinType::Gammon
    }
}

pub fn point_value(win_type: WinType, cube_value: u32) -> u32 {
    win_type.multiplier() * cube_value
}

pub fn outcome(board: &Board, borne_off: &BorneOff) -> GameOutcome {
    for winner in Player::BOTH {
        if has_won(borne_off, winner) {
            return GameOutcome::Won { winner, win_type: win_type(board, borne_off, winner) };
        }
    }
    GameOutcome::Ongoing
}
