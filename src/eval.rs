//! Static position evaluation. Positive scores favour white.

use crate::backgammon::{Board, BorneOff, Player};

pub const BLOT_WEIGHT: f32 = 8.0;
pub const ANCHOR_WEIGHT: f32 = 4.0;
/// Per point of a run of at least two consecutive anchors.
pub const PRIME_WEIGHT: f32 = 6.0;
pub const BAR_WEIGHT: f32 = 15.0;
pub const BORNE_OFF_WEIGHT: f32 = 10.0;

/// The individual terms of [`evaluate`], each already signed from white's side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Evaluation {
    pub pips: f32,
    pub blots: f32,
    pub anchors: f32,
    pub primes: f32,
    pub bar: f32,
    pub borne_off: f32,
}

impl Evaluation {
    pub fn total(&self) -> f32 {
        self.pips + self.blots + self.anchors + self.primes + self.bar + self.borne_off
    }
}

fn blots(board: &Board, player: Player) -> u32 {
    (0..24).filter(|&i| board.count(i, player) == 1).count() as u32
}

fn anchors(board: &Board, player: Player) -> u32 {
    (0..24).filter(|&i| board.count(i, player) >= 2).count() as u32
}

/// Points that belong to a run of two or more consecutive anchors.
fn prime_points(board: &Board, player: Player) -> u32 {
    let mut total = 0;
    let mut run = 0;
    for i in 0..24 {
        if board.count(i, player) >= 2 {
            run += 1;
        } else {
            if run >= 2 {
                total += run;
            }
            run = 0;
        }
    }
    if run >= 2 {
        total += run;
    }
    total
}

/// `f(favoured) - f(other)`.
fn diff(favoured: Player, f: impl Fn(Player) -> u32) -> f32 {
    f(favoured) as f32 - f(favoured.opposite()) as f32
}

pub fn evaluate_terms(board: &Board, borne_off: &BorneOff) -> Evaluation {
    let (white, black) = (Player::White, Player::Black);

    Evaluation {
        pips: diff(black, |p| board.pip_count(p)),
        blots: diff(black, |p| blots(board, p)) * BLOT_WEIGHT,
        anchors: diff(white, |p| anchors(board, p)) * ANCHOR_WEIGHT,
        primes: diff(white, |p| prime_points(board, p)) * PRIME_WEIGHT,
        bar: diff(black, |p| board.bar(p) as u32) * BAR_WEIGHT,
        borne_off: diff(white, |p| borne_off.get(p) as u32) * BORNE_OFF_WEIGHT,
    }
}

/// Deterministic heuristic score of a position, positive favouring white.
pub fn evaluate(board: &Board, borne_off: &BorneOff) -> f32 {
    evaluate_terms(board, borne_off).total()
}

/// [`evaluate`] seen from `player`'s side: higher is better for `player`.
pub fn evaluate_for(board: &Board, borne_off: &BorneOff, player: Player) -> f32 {
    let score = evaluate(board, borne_off);
    if player.is_maximizing() { score } else { -score }
}
