//! End to end: self-play, record to JSON, read back, review; plus cube play
//! through the game driver.

use backgammon_core::backgammon::{BEAR_OFF, Board, BorneOff, Dice, Player, WinType};
use backgammon_core::cube::Cube;
use backgammon_core::engine::{GreedyStrategy, RandomStrategy};
use backgammon_core::game::{Ending, Game, GameRecord, Outcome, Phase, play_game};
use backgammon_core::review::{Rating, ReviewSession, review_game};
use rand::{SeedableRng, rngs::StdRng};

fn greedy_vs_random(seed: u64) -> GameRecord {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut white = GreedyStrategy::seeded(seed).with_noise(0.0);
    let mut black = RandomStrategy::seeded(seed + 1);
    play_game(&mut white, &mut black, &mut rng).unwrap()
}

/// Plays the first legal sequence for `dice`, if the roll is not a pass.
fn play_first(game: &mut Game, dice: Dice) {
    game.set_dice(dice).unwrap();
    if game.phase() == Phase::Moving {
        let sequence = game.legal_sequences()[0];
        game.play_sequence(&sequence).unwrap();
    }
}

// =============================================================================
// Record and review
// =============================================================================

#[test]
fn record_survives_json() {
    let record = greedy_vs_random(21);
    let json = serde_json::to_string(&record).unwrap();
    let back: GameRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}

#[test]
fn greedy_agrees_with_itself_in_review() {
    let record = greedy_vs_random(5);
    let mut reviewer = GreedyStrategy::seeded(99).with_noise(0.0);
    let review = review_game(&record.turns, &mut reviewer);

    assert_eq!(review.grades.len(), record.turns.len());
    for grade in review.grades.iter().filter(|g| g.turn.player == Player::White) {
        assert_eq!(grade.rating, Rating::Best, "{}", grade.turn.moves);
        assert_eq!(grade.score_diff, 0.0);
    }
    assert_eq!(review.accuracy.white, 100.0);
    assert!((0.0..=100.0).contains(&review.accuracy.black));
}

#[test]
fn score_diffs_are_never_negative() {
    let record = greedy_vs_random(8);
    let review = review_game(&record.turns, &mut GreedyStrategy::seeded(1));
    assert!(review.grades.iter().all(|g| g.score_diff >= 0.0));
    assert!(review.grades.iter().all(|g| g.rating == Rating::from_score_diff(g.score_diff)));
}

#[test]
fn batched_review_matches_one_shot_review() {
    let record = greedy_vs_random(13);
    let mut reviewer = GreedyStrategy::seeded(4).with_noise(0.0);
    let mut session = ReviewSession::with_batch_size(&record.turns, &mut reviewer, 5);

    let mut batches = 0;
    loop {
        let (grades, done) = session.next_batch();
        assert!(grades.len() <= 5);
        batches += 1;
        if done {
            break;
        }
    }
    assert_eq!(session.progress(), (record.turns.len(), record.turns.len()));
    assert_eq!(batches, record.turns.len().div_ceil(5).max(1));
    let batched = session.finish();

    let once = review_game(&record.turns, &mut GreedyStrategy::seeded(4).with_noise(0.0));
    assert_eq!(batched, once);
}

// =============================================================================
// Cube and scoring through the game driver
// =============================================================================

#[test]
fn cube_turns_over_twice_then_a_drop_scores_four() {
    let mut game = Game::new(Player::White);

    game.offer_double().unwrap();
    assert_eq!(game.phase(), Phase::DoubleOffered);
    assert_eq!(game.accept_double().unwrap(), Cube { value: 2, owner: Some(Player::Black) });
    play_first(&mut game, Dice::from_numbers(3, 1));

    assert_eq!(game.active_player(), Player::Black);
    game.offer_double().unwrap();
    assert_eq!(game.accept_double().unwrap(), Cube { value: 4, owner: Some(Player::White) });
    play_first(&mut game, Dice::from_numbers(6, 4));

    assert_eq!(game.active_player(), Player::White);
    play_first(&mut game, Dice::from_numbers(5, 2));
    assert!(!game.can_offer_double());
    play_first(&mut game, Dice::from_numbers(4, 3));

    assert!(game.can_offer_double());
    game.offer_double().unwrap();
    let outcome = game.decline_double().unwrap();
    assert_eq!(outcome, Outcome { winner: Player::White, ending: Ending::DoubleDeclined, points: 4 });

    let record = game.into_record();
    assert_eq!(record.turns.len(), 4);
    assert_eq!(record.turns[1].cube_value, 4);
}

fn bear_off_last_checker(board: Board, black_off: u8) -> Outcome {
    let mut game = Game::from_position(board, BorneOff { white: 14, black: black_off }, Player::White);
    game.set_dice(Dice::from_numbers(2, 1)).unwrap();
    game.play_move(0, BEAR_OFF).unwrap();
    assert_eq!(game.phase(), Phase::Finished);
    game.outcome().unwrap()
}

#[test]
fn win_types_follow_the_losers_checkers() {
    let mut board = Board::empty();
    board[0] = 1;
    board[12] = -14;
    let normal = bear_off_last_checker(board, 1);
    assert_eq!(normal.ending, Ending::BearOff(WinType::Normal));
    assert_eq!(normal.points, 1);

    board[12] = -15;
    let gammon = bear_off_last_checker(board, 0);
    assert_eq!(gammon.ending, Ending::BearOff(WinType::Gammon));
    assert_eq!(gammon.points, 2);

    board[12] = -14;
    board[3] = -1;
    let backgammon = bear_off_last_checker(board, 0);
    assert_eq!(backgammon.ending, Ending::BearOff(WinType::Backgammon));
    assert_eq!(backgammon.points, 3);
}
