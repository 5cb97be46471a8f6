use std::{fmt::Debug, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{error::DiceError, misc::TinyVec};

/// A roll of two dice. Doubles are played four times, see [`Dice::values`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[u8; 2]", try_from = "[u8; 2]")]
pub struct Dice {
    die1: u8,
    die2: u8,
}

impl Dice {
    /// Every distinct roll, ignoring order.
    pub const ALL: [Self; 21] = [
        Dice::from_numbers(1, 1), Dice::from_numbers(1, 2), Dice::from_numbers(1, 3),
        Dice::from_numbers(1, 4), Dice::from_numbers(1, 5), Dice::from_numbers(1, 6),
        Dice::from_numbers(2, 2), Dice::from_numbers(2, 3), Dice::from_numbers(2, 4),
        Dice::from_numbers(2, 5), Dice::from_numbers(2, 6),
        Dice::from_numbers(3, 3), Dice::from_numbers(3, 4), Dice::from_numbers(3, 5),
        Dice::from_numbers(3, 6),
        Dice::from_numbers(4, 4), Dice::from_numbers(4, 5), Dice::from_numbers(4, 6),
        Dice::from_numbers(5, 5), Dice::from_numbers(5, 6),
        Dice::from_numbers(6, 6),
    ];

    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let die1 = rng.random_range(1..=6);
        let die2 = rng.random_range(1..=6);
        Dice::from_numbers(die1, die2)
    }

    /// Panics if either die is outside 1..=6. Use [`Dice::try_new`] for untrusted input.
    pub const fn from_numbers(die1: u8, die2: u8) -> Self {
        assert!(die1 >= 1 && die1 <= 6 && die2 >= 1 && die2 <= 6, "die value outside 1..=6");
        Dice { die1, die2 }
    }

    pub fn try_new(die1: u8, die2: u8) -> Result<Self, DiceError> {
        for die in [die1, die2] {
            if !(1..=6).contains(&die) {
                return Err(DiceError::OutOfRange(die));
            }
        }
        Ok(Dice { die1, die2 })
    }

    pub fn die1(&self) -> u8 {
        self.die1
    }

    pub fn die2(&self) -> u8 {
        self.die2
    }

    pub fn is_double(&self) -> bool {
        self.die1 == self.die2
    }

    /// The dice values available this turn: two for a regular roll, four for a double.
    pub fn values(&self) -> TinyVec<u8, 4> {
        if self.is_double() {
            TinyVec::from_slice(&[self.die1; 4])
        } else {
            TinyVec::from_slice(&[self.die1, self.die2])
        }
    }
}

impl From<Dice> for [u8; 2] {
    fn from(dice: Dice) -> Self {
        [dice.die1, dice.die2]
    }
}

impl TryFrom<[u8; 2]> for Dice {
    type Error = DiceError;

    fn try_from([die1, die2]: [u8; 2]) -> Result<Self, Self::Error> {
        Dice::try_new(die1, die2)
    }
}

impl FromStr for Dice {
    type Err = DiceError;

    /// Parses `"6-2"`, `"6,2"` or `"62"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<u8> = s
            .chars()
            .filter(|c| !matches!(c, '-' | ',' | ' '))
            .map(|c| c.to_digit(10).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(|| DiceError::Unparsable(s.to_string()))?;
        match digits.as_slice() {
            &[die1, die2] => Dice::try_new(die1, die2),
            _ => Err(DiceError::Unparsable(s.to_string())),
        }
    }
}

impl std::fmt::Display for Dice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.die1, self.die2)
    }
}

impl Debug for Dice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_double() {
            write!(f, "Double({})", self.die1)
        } else {
            write!(f, "Dice({} | {})", self.die1, self.die2)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_dice() {
        for i in 1..=6 {
            for j in 1..=6 {
                let dice = Dice::from_numbers(i, j);
                assert_eq!(dice.die1(), i);
                assert_eq!(dice.die2(), j);
                if i == j {
                    assert!(dice.is_double());
                    assert_eq!(&*dice.values(), &[i; 4]);
                } else {
                    assert!(!dice.is_double());
                    assert_eq!(&*dice.values(), &[i, j]);
                }
            }
        }
    }

    #[test]
    fn test_dice_roll() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 1..=100 {
            let dice = Dice::roll(&mut rng);
            assert!(dice.die1() >= 1 && dice.die1() <= 6);
            assert!(dice.die2() >= 1 && dice.die2() <= 6);
        }
    }

    #[test]
    fn all_rolls_are_distinct() {
        for (i, a) in Dice::ALL.iter().enumerate() {
            for b in &Dice::ALL[i + 1..] {
                assert_ne!([a.die1(), a.die2()], [b.die1(), b.die2()]);
            }
        }
    }

    #[test]
    fn parse_and_validate() {
        assert_eq!("6-2".parse::<Dice>(), Ok(Dice::from_numbers(6, 2)));
        assert_eq!("33".parse::<Dice>(), Ok(Dice::from_numbers(3, 3)));
        assert_eq!("7-1".parse::<Dice>(), Err(DiceError::OutOfRange(7)));
        assert!("x".parse::<Dice>().is_err());
        assert!(serde_json::from_str::<Dice>("[0, 3]").is_err());
        let dice: Dice = serde_json::from_str("[5, 4]").unwrap();
        assert_eq!(dice, Dice::from_numbers(5, 4));
    }
}
