use std::fmt::Debug;

use crate::backgammon::{BEAR_OFF, BLACK_BAR, WHITE_BAR};

/// Decoded form of the raw indices stored in a [`crate::backgammon::HalfMove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Bar,
    Off,
    Point(u8),
}

impl Position {
    /// Decodes a raw index (0-23 points, 24/25 bars, 26 bear-off).
    pub fn from_index(index: u8) -> Self {
        match index as usize {
            WHITE_BAR | BLACK_BAR => Position::Bar,
            BEAR_OFF => Position::Off,
            i if i < 24 => Position::Point(index),
            _ => panic!("invalid position index {index}"),
        }
    }

    /// Conventional notation, points numbered 1-24 from white's side.
    pub fn notation(&self) -> String {
        match self {
            Position::Bar => "bar".to_string(),
            Position::Off => "off".to_string(),
            Position::Point(i) => (i + 1).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_reserved_indices() {
        assert_eq!(Position::from_index(24), Position::Bar);
        assert_eq!(Position::from_index(25), Position::Bar);
        assert_eq!(Position::from_index(26), Position::Off);
        assert_eq!(Position::from_index(0), Position::Point(0));
        assert_eq!(Position::from_index(23).notation(), "24");
    }

    #[test]
    #[should_panic]
    fn rejects_out_of_range() {
        Position::from_index(27);
    }
}
