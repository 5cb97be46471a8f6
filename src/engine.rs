use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    backgammon::{Board, BorneOff, Player, Sequence, movegen::apply_sequence},
    eval::evaluate_for,
};

/// Upper bound of the tie-break noise added to each candidate's score.
pub const DEFAULT_NOISE: f32 = 0.25;

/// Picks one of the legal sequences for a turn. Live play and the game
/// reviewer both go through this trait, so any implementation can stand in
/// for the other.
pub trait Strategy {
    /// Returns an empty sequence when `sequences` is empty.
    fn choose_sequence(
        &mut self,
        sequences: &[Sequence],
        board: &Board,
        borne_off: &BorneOff,
        player: Player,
    ) -> Sequence;

    fn name(&self) -> &'static str;
}

/// Score of the position reached by playing `sequence`, from `player`'s side.
pub fn score_sequence(sequence: &Sequence, board: &Board, borne_off: &BorneOff, player: Player) -> f32 {
    let (board, borne_off) = apply_sequence(board, borne_off, sequence, player);
    evaluate_for(&board, &borne_off, player)
}

/// One-ply greedy play: the sequence whose resulting position evaluates best.
/// Exact ties are broken by a small random perturbation.
#[derive(Debug, Clone)]
pub struct GreedyStrategy<R = StdRng> {
    rng: R,
    noise: f32,
}

impl GreedyStrategy<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for GreedyStrategy<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> GreedyStrategy<R> {
    pub fn with_rng(rng: R) -> Self {
        GreedyStrategy { rng, noise: DEFAULT_NOISE }
    }

    /// Sets the noise magnitude, clamped to `0.0..=DEFAULT_NOISE`.
    pub fn with_noise(mut self, noise: f32) -> Self {
        self.noise = noise.clamp(0.0, DEFAULT_NOISE);
        self
    }
}

impl<R: Rng> Strategy for GreedyStrategy<R> {
    fn choose_sequence(
        &mut self,
        sequences: &[Sequence],
        board: &Board,
        borne_off: &BorneOff,
        player: Player,
    ) -> Sequence {
        let Some(&first) = sequences.first() else {
            return Sequence::new();
        };

        let scores: Vec<f32> = sequences
            .par_iter()
            .map(|s| score_sequence(s, board, borne_off, player))
            .collect();

        let mut best = first;
        let mut best_score = f32::NEG_INFINITY;
        for (sequence, score) in sequences.iter().zip(scores) {
            let jitter = if self.noise > 0.0 {
                self.rng.random_range(-self.noise..=self.noise)
            } else {
                0.0
            };
            let score = score + jitter;
            if score > best_score {
                best_score = score;
                best = *sequence;
            }
        }
        best
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}

/// Uniformly random choice among the legal sequences.
#[derive(Debug, Clone)]
pub struct RandomStrategy<R = StdRng> {
    rng: R,
}

impl RandomStrategy<StdRng> {
    pub fn new() -> Self {
        RandomStrategy { rng: StdRng::from_os_rng() }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomStrategy { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomStrategy<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomStrategy<R> {
    pub fn with_rng(rng: R) -> Self {
        RandomStrategy { rng }
    }
}

impl<R: Rng> Strategy for RandomStrategy<R> {
    fn choose_sequence(
        &mut self,
        sequences: &[Sequence],
        _board: &Board,
        _borne_off: &BorneOff,
        _player: Player,
    ) -> Sequence {
        sequences.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backgammon::{HalfMove, movegen::get_legal_move_sequences};

    #[test]
    fn empty_input_gives_empty_sequence() {
        let board = Board::new();
        let off = BorneOff::new();
        assert!(GreedyStrategy::seeded(1).choose_sequence(&[], &board, &off, Player::White).is_empty());
        assert!(RandomStrategy::seeded(1).choose_sequence(&[], &board, &off, Player::Black).is_empty());
    }

    #[test]
    fn greedy_takes_the_hit() {
        // White can hit the black blot on index 6 or run to index 9.
        let mut board = Board::empty();
        board[12] = 1;
        board[6] = -1;
        board[20] = -2;
        let off = BorneOff::new();
        let hit = Sequence::from(vec![HalfMove::new(12, 6, 6, true)]);
        let run = Sequence::from(vec![HalfMove::new(12, 9, 3, false)]);
        let mut greedy = GreedyStrategy::seeded(3);
        for _ in 0..20 {
            let chosen = greedy.choose_sequence(&[run, hit], &board, &off, Player::White);
            assert_eq!(chosen, hit);
        }
        assert!(score_sequence(&hit, &board, &off, Player::White) > score_sequence(&run, &board, &off, Player::White));
    }

    #[test]
    fn greedy_plays_for_black_too() {
        let mut board = Board::empty();
        board[5] = -1;
        board[11] = 1;
        let off = BorneOff::new();
        let sequences = get_legal_move_sequences(&board, &off, &[6, 1], Player::Black);
        let chosen = GreedyStrategy::seeded(9).choose_sequence(&sequences, &board, &off, Player::Black);
        assert!(chosen.iter().any(|m| m.is_hit), "{chosen}");
    }

    #[test]
    fn zero_noise_keeps_first_of_equal_scores() {
        let board = Board::new();
        let off = BorneOff::new();
        let a = Sequence::from(vec![HalfMove::new(12, 6, 6, false)]);
        let mut greedy = GreedyStrategy::seeded(0).with_noise(0.0);
        assert_eq!(greedy.choose_sequence(&[a, a], &board, &off, Player::White), a);
    }

    #[test]
    fn random_strategy_returns_a_candidate() {
        let board = Board::new();
        let off = BorneOff::new();
        let sequences = get_legal_move_sequences(&board, &off, &[4, 2], Player::White);
        let mut random = RandomStrategy::seeded(5);
        for _ in 0..50 {
            let chosen = random.choose_sequence(&sequences, &board, &off, Player::White);
            assert!(sequences.contains(&chosen));
        }
    }
}
