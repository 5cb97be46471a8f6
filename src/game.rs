//! Owned game state driving turns on top of the pure rules core.
//!
//! [`Game`] is the single mutable object of a match: it rolls, accepts moves
//! one at a time (validated against the maximal sequences for the roll),
//! records each finished turn for later review and runs the doubling cube.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    backgammon::{
        Board, BorneOff, Dice, GameOutcome, HalfMove, Player, Sequence, WinType,
        movegen::{apply_move_to_board, apply_sequence, get_legal_move_sequences, get_valid_next_moves},
        rules::{has_won, outcome, point_value},
    },
    cube::{Cube, DoublingCube},
    engine::Strategy,
    error::{GameError, GameResult},
    review::TurnRecord,
};

/// Turns after which a self-played game is abandoned.
pub const MAX_TURNS: usize = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The active player may offer the cube or roll.
    Rolling,
    Moving,
    DoubleOffered,
    Finished,
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Rolling => "rolling",
            Phase::Moving => "moving",
            Phase::DoubleOffered => "double offered",
            Phase::Finished => "finished",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    BearOff(WinType),
    DoubleDeclined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Player,
    pub ending: Ending,
    pub points: u32,
}

/// A finished (or abandoned) game: its result and every turn played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub outcome: Option<Outcome>,
    pub turns: Vec<TurnRecord>,
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    borne_off: BorneOff,
    active_player: Player,
    phase: Phase,
    cube: DoublingCube,
    dice: Option<Dice>,
    legal: Vec<Sequence>,
    played: Sequence,
    turn_start: (Board, BorneOff),
    history: Vec<TurnRecord>,
    outcome: Option<Outcome>,
}

impl Game {
    pub fn new(first: Player) -> Self {
        Self::from_position(Board::new(), BorneOff::new(), first)
    }

    /// Starts from an arbitrary position with `first` to roll.
    pub fn from_position(board: Board, borne_off: BorneOff, first: Player) -> Self {
        Game {
            board,
            borne_off,
            active_player: first,
            phase: Phase::Rolling,
            cube: DoublingCube::new(),
            dice: None,
            legal: Vec::new(),
            played: Sequence::new(),
            turn_start: (board, borne_off),
            history: Vec::new(),
            outcome: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn borne_off(&self) -> &BorneOff {
        &self.borne_off
    }

    pub fn active_player(&self) -> Player {
        self.active_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dice(&self) -> Option<Dice> {
        self.dice
    }

    pub fn cube(&self) -> Cube {
        self.cube.cube()
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Maximal sequences for the current roll, empty outside the moving phase.
    pub fn legal_sequences(&self) -> &[Sequence] {
        &self.legal
    }

    /// Moves already made this turn.
    pub fn played(&self) -> &Sequence {
        &self.played
    }

    pub fn valid_next_moves(&self) -> Vec<HalfMove> {
        if self.phase != Phase::Moving {
            return Vec::new();
        }
        get_valid_next_moves(&self.legal, &self.played)
    }

    pub fn into_record(self) -> GameRecord {
        GameRecord { outcome: self.outcome, turns: self.history }
    }

    fn expect_phase(&self, expected: Phase, action: &'static str) -> GameResult<()> {
        if self.phase == Phase::Finished {
            return Err(GameError::GameOver);
        }
        if self.phase != expected {
            return Err(GameError::WrongPhase { action, phase: self.phase.name() });
        }
        Ok(())
    }

    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameResult<Dice> {
        self.expect_phase(Phase::Rolling, "roll")?;
        let dice = Dice::roll(rng);
        self.set_dice(dice)?;
        Ok(dice)
    }

    /// Starts the active player's turn with a given roll. A roll with no
    /// legal play is recorded as a pass and the turn moves on at once.
    pub fn set_dice(&mut self, dice: Dice) -> GameResult<()> {
        self.expect_phase(Phase::Rolling, "roll")?;
        self.dice = Some(dice);
        self.turn_start = (self.board, self.borne_off);
        self.played = Sequence::new();
        self.legal = get_legal_move_sequences(&self.board, &self.borne_off, &dice.values(), self.active_player);
        self.phase = Phase::Moving;
        debug!(player = %self.active_player, %dice, sequences = self.legal.len(), "rolled");

        if self.legal.iter().all(|s| s.is_empty()) {
            info!(player = %self.active_player, %dice, "no legal move, turn passes");
            self.finish_turn();
        }
        Ok(())
    }

    /// Plays one checker. The move is matched by its from/to points against
    /// the moves that keep a maximal sequence reachable.
    pub fn play_move(&mut self, from: usize, to: usize) -> GameResult<HalfMove> {
        self.expect_phase(Phase::Moving, "move")?;
        let half_move = self
            .valid_next_moves()
            .into_iter()
            .find(|m| m.from as usize == from && m.to as usize == to)
            .ok_or_else(|| GameError::IllegalMove(format!("{from}->{to}")))?;

        self.commit_move(half_move);
        Ok(half_move)
    }

    fn commit_move(&mut self, half_move: HalfMove) {
        (self.board, self.borne_off) =
            apply_move_to_board(&self.board, &self.borne_off, &half_move, self.active_player);
        self.played.push(half_move);

        if has_won(&self.borne_off, self.active_player) || self.valid_next_moves().is_empty() {
            self.finish_turn();
        }
    }

    /// Plays a whole turn. `sequence` must be one of the legal sequences and
    /// extend the moves already made this turn.
    pub fn play_sequence(&mut self, sequence: &Sequence) -> GameResult<()> {
        self.expect_phase(Phase::Moving, "move")?;
        let played = self.played.len();
        let is_legal = sequence.len() >= played
            && sequence[..played] == self.played[..]
            && self.legal.contains(sequence);
        if !is_legal {
            return Err(GameError::IllegalMove(sequence.to_string()));
        }
        for &half_move in &sequence[played..] {
            self.commit_move(half_move);
        }
        Ok(())
    }

    /// Takes back the last move of the current turn.
    pub fn undo_move(&mut self) -> GameResult<()> {
        self.expect_phase(Phase::Moving, "undo")?;
        if self.played.pop().is_none() {
            return Ok(());
        }
        let (board, borne_off) = self.turn_start;
        (self.board, self.borne_off) = apply_sequence(&board, &borne_off, &self.played, self.active_player);
        Ok(())
    }

    /// Moves a turn still needs; zero once a maximal sequence has been played.
    pub fn moves_left(&self) -> usize {
        let longest = self.legal.iter().map(|s| s.len()).max().unwrap_or(0);
        longest.saturating_sub(self.played.len())
    }

    fn finish_turn(&mut self) {
        let Some(dice) = self.dice.take() else {
            return;
        };
        let (board_before, borne_off_before) = self.turn_start;
        self.history.push(TurnRecord {
            player: self.active_player,
            dice,
            board_before,
            borne_off_before,
            cube_value: self.cube.value(),
            moves: self.played,
        });
        debug!(player = %self.active_player, %dice, moves = %self.played, "turn committed");
        self.legal.clear();
        self.played = Sequence::new();

        if let GameOutcome::Won { winner, win_type } = outcome(&self.board, &self.borne_off) {
            self.end_game(Outcome {
                winner,
                ending: Ending::BearOff(win_type),
                points: point_value(win_type, self.cube.value()),
            });
            return;
        }

        self.active_player = self.active_player.opposite();
        self.phase = Phase::Rolling;
    }

    fn end_game(&mut self, outcome: Outcome) {
        info!(winner = %outcome.winner, ending = ?outcome.ending, points = outcome.points, "game over");
        self.outcome = Some(outcome);
        self.phase = Phase::Finished;
    }

    /// Only the player to roll may double, before rolling.
    pub fn can_offer_double(&self) -> bool {
        self.phase == Phase::Rolling && self.cube.can_offer(self.active_player)
    }

    pub fn offer_double(&mut self) -> GameResult<()> {
        self.expect_phase(Phase::Rolling, "offer a double")?;
        self.cube.offer_double(self.active_player)?;
        self.phase = Phase::DoubleOffered;
        Ok(())
    }

    /// The opponent takes; the same player then rolls.
    pub fn accept_double(&mut self) -> GameResult<Cube> {
        self.expect_phase(Phase::DoubleOffered, "accept a double")?;
        let cube = self.cube.accept_double()?;
        self.phase = Phase::Rolling;
        Ok(cube)
    }

    /// The opponent passes and the game ends at the current stake.
    pub fn decline_double(&mut self) -> GameResult<Outcome> {
        self.expect_phase(Phase::DoubleOffered, "decline a double")?;
        let resignation = self.cube.decline_double()?;
        let outcome = Outcome {
            winner: resignation.winner,
            ending: Ending::DoubleDeclined,
            points: resignation.points,
        };
        self.end_game(outcome);
        Ok(outcome)
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new(Player::White)
    }
}

/// Plays a game between two strategies without the cube.
pub fn play_game<R: Rng + ?Sized>(
    white: &mut dyn Strategy,
    black: &mut dyn Strategy,
    rng: &mut R,
) -> GameResult<GameRecord> {
    let mut game = Game::new(Player::White);
    while game.phase() != Phase::Finished && game.history().len() < MAX_TURNS {
        game.roll(rng)?;
        if game.phase() != Phase::Moving {
            continue;
        }
        let player = game.active_player();
        let strategy: &mut dyn Strategy = match player {
            Player::White => &mut *white,
            Player::Black => &mut *black,
        };
        let sequence = strategy.choose_sequence(game.legal_sequences(), game.board(), game.borne_off(), player);
        game.play_sequence(&sequence)?;
    }
    Ok(game.into_record())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        backgammon::{BEAR_OFF, WHITE_BAR},
        engine::{GreedyStrategy, RandomStrategy},
        error::CubeError,
    };

    #[test]
    fn move_by_move_turn_is_recorded() {
        let mut game = Game::new(Player::White);
        game.set_dice(Dice::from_numbers(3, 1)).unwrap();
        assert_eq!(game.phase(), Phase::Moving);
        assert_eq!(game.moves_left(), 2);

        assert!(matches!(game.play_move(12, 0), Err(GameError::IllegalMove(_))));
        let first = game.play_move(7, 4).unwrap();
        assert_eq!(first.die, 3);
        assert_eq!(game.phase(), Phase::Moving);
        game.play_move(5, 4).unwrap();

        assert_eq!(game.phase(), Phase::Rolling);
        assert_eq!(game.active_player(), Player::Black);
        assert_eq!(game.board()[4], 2);
        let record = &game.history()[0];
        assert_eq!(record.player, Player::White);
        assert_eq!(record.board_before, Board::new());
        assert_eq!(record.moves.len(), 2);
    }

    #[test]
    fn undo_restores_the_turn_start() {
        let mut game = Game::new(Player::White);
        game.set_dice(Dice::from_numbers(6, 4)).unwrap();
        game.play_move(23, 17).unwrap();
        game.undo_move().unwrap();
        assert_eq!(*game.board(), Board::new());
        assert!(game.played().is_empty());
    }

    #[test]
    fn blocked_entry_passes_the_turn() {
        let mut board = Board::empty();
        board[WHITE_BAR] = 1;
        board[10] = 14;
        for i in 18..24 {
            board[i] = -2;
        }
        board[0] = -3;
        let mut game = Game::from_position(board, BorneOff::new(), Player::White);
        game.set_dice(Dice::from_numbers(4, 2)).unwrap();
        assert_eq!(game.active_player(), Player::Black);
        assert_eq!(game.phase(), Phase::Rolling);
        assert!(game.history()[0].moves.is_empty());
    }

    #[test]
    fn bearing_off_last_checker_wins_with_cube_value() {
        let mut board = Board::empty();
        board[2] = 1;
        board[12] = -15;
        let borne_off = BorneOff { white: 14, black: 0 };
        let mut game = Game::from_position(board, borne_off, Player::White);
        game.offer_double().unwrap();
        game.accept_double().unwrap();
        game.set_dice(Dice::from_numbers(5, 3)).unwrap();
        game.play_move(2, BEAR_OFF).unwrap();

        assert_eq!(game.phase(), Phase::Finished);
        let outcome = game.outcome().unwrap();
        assert_eq!(outcome.winner, Player::White);
        assert_eq!(outcome.ending, Ending::BearOff(WinType::Gammon));
        assert_eq!(outcome.points, 4);
        assert_eq!(game.roll(&mut StdRng::seed_from_u64(0)), Err(GameError::GameOver));
    }

    #[test]
    fn declined_double_ends_the_game() {
        let mut game = Game::new(Player::Black);
        assert!(game.can_offer_double());
        game.offer_double().unwrap();
        assert!(matches!(game.set_dice(Dice::from_numbers(1, 2)), Err(GameError::WrongPhase { .. })));
        let outcome = game.decline_double().unwrap();
        assert_eq!(outcome, Outcome { winner: Player::Black, ending: Ending::DoubleDeclined, points: 1 });
        assert_eq!(game.phase(), Phase::Finished);
    }

    #[test]
    fn cube_owner_rules_apply_in_game() {
        let mut game = Game::new(Player::White);
        game.offer_double().unwrap();
        game.accept_double().unwrap();
        assert_eq!(game.cube(), Cube { value: 2, owner: Some(Player::Black) });
        assert_eq!(game.active_player(), Player::White);
        assert!(!game.can_offer_double());
        assert_eq!(
            game.offer_double(),
            Err(GameError::Cube(CubeError::NotCubeOwner { player: Player::White, owner: Player::Black }))
        );
    }

    #[test]
    fn illegal_sequence_is_rejected_without_side_effects() {
        let mut game = Game::new(Player::White);
        game.set_dice(Dice::from_numbers(6, 5)).unwrap();
        let bogus = Sequence::from(vec![HalfMove::new(23, 17, 6, false), HalfMove::new(5, 0, 5, false)]);
        assert!(game.play_sequence(&bogus).is_err());
        assert_eq!(*game.board(), Board::new());
    }

    #[test]
    fn self_play_finishes() {
        let mut rng = StdRng::seed_from_u64(11);
        let record = play_game(&mut GreedyStrategy::seeded(1), &mut RandomStrategy::seeded(2), &mut rng).unwrap();
        let outcome = record.outcome.expect("game should finish");
        assert!(outcome.points >= 1);
        assert!(!record.turns.is_empty());
    }
}
