//! Post-game review.
//!
//! Each recorded turn is replayed from its pre-turn position: the reviewing
//! strategy picks its own sequence, both that and the played sequence are
//! scored with the evaluator, and the shortfall of the played move is mapped
//! onto a five step rating.
//!
//! Review runs as a resumable batch iterator ([`ReviewSession::next_batch`])
//! so a host can interleave it with other work or drop it half way through.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    backgammon::{Board, BorneOff, Dice, Player, Sequence, movegen::get_legal_move_sequences},
    engine::{Strategy, score_sequence},
};

/// Default number of turns graded per [`ReviewSession::next_batch`] call.
pub const DEFAULT_BATCH_SIZE: usize = 8;

/// A turn as it was played. Snapshots are taken before the first move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub player: Player,
    pub dice: Dice,
    pub board_before: Board,
    pub borne_off_before: BorneOff,
    pub cube_value: u32,
    pub moves: Sequence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Best,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
}

impl Rating {
    /// Inclusive upper bounds of the score shortfall, ascending.
    pub const THRESHOLDS: [(f32, Rating); 4] = [
        (3.0, Rating::Best),
        (8.0, Rating::Good),
        (18.0, Rating::Inaccuracy),
        (35.0, Rating::Mistake),
    ];

    pub fn from_score_diff(score_diff: f32) -> Rating {
        Self::THRESHOLDS
            .iter()
            .find(|(limit, _)| score_diff <= *limit)
            .map_or(Rating::Blunder, |&(_, rating)| rating)
    }

    /// Counts towards accuracy.
    pub fn is_accurate(&self) -> bool {
        matches!(self, Rating::Best | Rating::Good)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Rating::Best => "best",
            Rating::Good => "good",
            Rating::Inaccuracy => "inaccuracy",
            Rating::Mistake => "mistake",
            Rating::Blunder => "blunder",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnGrade {
    #[serde(flatten)]
    pub turn: TurnRecord,
    pub best_seq: Sequence,
    /// Non-negative evaluation lost by the played sequence, from the mover's side.
    pub score_diff: f32,
    pub rating: Rating,
}

/// Percentage of each player's turns rated best or good.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accuracy {
    pub white: f32,
    pub black: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameReview {
    pub grades: Vec<TurnGrade>,
    pub accuracy: Accuracy,
}

pub fn grade_turn<S: Strategy + ?Sized>(turn: &TurnRecord, ai: &mut S) -> TurnGrade {
    let board = &turn.board_before;
    let borne_off = &turn.borne_off_before;
    let sequences = get_legal_move_sequences(board, borne_off, &turn.dice.values(), turn.player);
    let best_seq = ai.choose_sequence(&sequences, board, borne_off, turn.player);

    let best_score = score_sequence(&best_seq, board, borne_off, turn.player);
    let played_score = score_sequence(&turn.moves, board, borne_off, turn.player);
    let score_diff = (best_score - played_score).max(0.0);

    TurnGrade {
        turn: turn.clone(),
        best_seq,
        score_diff,
        rating: Rating::from_score_diff(score_diff),
    }
}

fn player_accuracy(grades: &[TurnGrade], player: Player) -> f32 {
    let (turns, accurate) = grades
        .iter()
        .filter(|g| g.turn.player == player)
        .fold((0u32, 0u32), |(n, ok), g| (n + 1, ok + g.rating.is_accurate() as u32));
    if turns == 0 {
        100.0
    } else {
        accurate as f32 / turns as f32 * 100.0
    }
}

pub fn accuracy(grades: &[TurnGrade]) -> Accuracy {
    Accuracy {
        white: player_accuracy(grades, Player::White),
        black: player_accuracy(grades, Player::Black),
    }
}

/// Grades a turn history a batch at a time.
pub struct ReviewSession<'a, S: Strategy + ?Sized> {
    turns: &'a [TurnRecord],
    ai: &'a mut S,
    batch_size: usize,
    grades: Vec<TurnGrade>,
}

impl<'a, S: Strategy + ?Sized> ReviewSession<'a, S> {
    pub fn new(turns: &'a [TurnRecord], ai: &'a mut S) -> Self {
        Self::with_batch_size(turns, ai, DEFAULT_BATCH_SIZE)
    }

    pub fn with_batch_size(turns: &'a [TurnRecord], ai: &'a mut S, batch_size: usize) -> Self {
        ReviewSession { turns, ai, batch_size: batch_size.max(1), grades: Vec::with_capacity(turns.len()) }
    }

    pub fn is_done(&self) -> bool {
        self.grades.len() == self.turns.len()
    }

    /// Turns graded so far and the total number of turns.
    pub fn progress(&self) -> (usize, usize) {
        (self.grades.len(), self.turns.len())
    }

    /// Grades the next batch. Returns the grades produced by this call and
    /// whether the whole history has now been graded.
    pub fn next_batch(&mut self) -> (&[TurnGrade], bool) {
        let start = self.grades.len();
        let end = (start + self.batch_size).min(self.turns.len());
        let turns = self.turns;
        for turn in &turns[start..end] {
            let grade = grade_turn(turn, &mut *self.ai);
            debug!(player = %turn.player, dice = %turn.dice, rating = %grade.rating, diff = grade.score_diff, "turn graded");
            self.grades.push(grade);
        }
        info!(graded = end, total = self.turns.len(), "review batch done");
        (&self.grades[start..end], self.is_done())
    }

    /// Accuracy over the grades collected so far.
    pub fn finish(self) -> GameReview {
        let accuracy = accuracy(&self.grades);
        GameReview { grades: self.grades, accuracy }
    }
}

/// Runs a [`ReviewSession`] to completion.
pub fn review_game<S: Strategy + ?Sized>(turns: &[TurnRecord], ai: &mut S) -> GameReview {
    let mut session = ReviewSession::new(turns, ai);
    while !session.is_done() {
        session.next_batch();
    }
    session.finish()
}
