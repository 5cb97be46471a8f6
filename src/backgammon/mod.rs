mod board;
pub use board::{Board, BorneOff, CHECKERS_PER_PLAYER};

mod player;
pub use player::Player;

mod position;
pub use position::Position;

mod halfmove;
pub use halfmove::HalfMove;

mod sequence;
pub use sequence::Sequence;

mod dice;
pub use dice::Dice;

pub mod rules;
pub use rules::{GameOutcome, WinType};

pub mod movegen;

/// Raw index of white's bar in a [`Board`].
pub const WHITE_BAR: usize = 24;
/// Raw index of black's bar in a [`Board`].
pub const BLACK_BAR: usize = 25;
/// Destination index of a bear-off move, never stored on the board.
pub const BEAR_OFF: usize = 26;
