//! Legal move generation.
//!
//! Every function here is pure: positions come in by reference and new
//! positions are returned by value. A turn's legal plays are enumerated as
//! maximal [`Sequence`]s, i.e. the plays that use as many dice as the
//! position allows.

use hashbrown::HashSet;

use crate::{
    backgammon::{
        BEAR_OFF, Board, BorneOff, HalfMove, Player, Sequence,
        rules::{can_bear_off, has_bar, is_blocked},
    },
    misc::TinyVec,
};

fn assert_die(die: u8) {
    assert!((1..=6).contains(&die), "die value {die} outside 1..=6");
}

fn is_blot(board: &Board, to: usize, player: Player) -> bool {
    board.count(to, player.opposite()) == 1
}

/// `player` has a checker in the home board further from the exit than `from`.
fn has_checker_further(board: &Board, from: usize, player: Player) -> bool {
    let distance = player.distance(from);
    player
        .home_board()
        .filter(|&i| player.distance(i) > distance)
        .any(|i| board.count(i, player) > 0)
}

/// Legal moves of a single checker by `die`.
///
/// While `player` has a checker on the bar only entering moves are
/// generated. Otherwise bear-off moves come first (when every checker is
/// home), followed by regular point to point moves.
pub fn single_die_moves(board: &Board, die: u8, player: Player) -> Vec<HalfMove> {
    assert_die(die);
    let mut moves = Vec::new();

    if has_bar(board, player) {
        let entry = player.entry_point(die);
        if !is_blocked(board, entry, player) {
            moves.push(HalfMove::new(player.bar_index(), entry, die, is_blot(board, entry, player)));
        }
        return moves;
    }

    if can_bear_off(board, player) {
        for from in player.home_board() {
            if board.count(from, player) == 0 {
                continue;
            }
            let distance = player.distance(from);
            let die = die as u32;
            if die == distance || (die > distance && !has_checker_further(board, from, player)) {
                moves.push(HalfMove::new(from, BEAR_OFF, die as u8, false));
            }
        }
    }

    for from in 0..24 {
        if board.count(from, player) == 0 {
            continue;
        }
        let Some(to) = player.target(from, die) else {
            continue;
        };
        if !is_blocked(board, to, player) {
            moves.push(HalfMove::new(from, to, die, is_blot(board, to, player)));
        }
    }

    moves
}

/// Applies one move, hitting a blot on the destination if there is one.
///
/// Panics if the source holds no checker of `player` or the destination is blocked.
pub fn apply_move_to_board(
    board: &Board,
    borne_off: &BorneOff,
    half_move: &HalfMove,
    player: Player,
) -> (Board, BorneOff) {
    let mut board = *board;
    let mut borne_off = *borne_off;
    let sign = player.sign();
    let from = half_move.from as usize;
    let to = half_move.to as usize;

    if from == player.bar_index() {
        assert!(board[from] > 0, "{player} has no checker on the bar");
        board[from] -= 1;
    } else {
        assert!(from < 24 && board.count(from, player) > 0, "{player} has no checker on point {from}");
        board[from] -= sign;
    }

    if to == BEAR_OFF {
        *borne_off.get_mut(player) += 1;
        return (board, borne_off);
    }

    assert!(to < 24, "invalid destination {to}");
    let opponent = player.opposite();
    let defenders = board.count(to, opponent);
    assert!(defenders < 2, "point {to} is blocked for {player}");
    if defenders == 1 {
        board[opponent.bar_index()] += 1;
        board[to] = 0;
    }
    board[to] += sign;

    (board, borne_off)
}

pub fn apply_sequence(
    board: &Board,
    borne_off: &BorneOff,
    sequence: &[HalfMove],
    player: Player,
) -> (Board, BorneOff) {
    sequence
        .iter()
        .fold((*board, *borne_off), |(board, borne_off), half_move| {
            apply_move_to_board(&board, &borne_off, half_move, player)
        })
}

/// Depth-first search over dice orderings with a shared prefix buffer.
struct SequenceSearch<'a> {
    player: Player,
    dice: &'a [u8],
    prefix: Sequence,
    found: Vec<Sequence>,
}

impl SequenceSearch<'_> {
    fn explore(&mut self, board: Board, borne_off: BorneOff, used: u8) {
        // Die values already branched on at this depth; a repeated value
        // would only reproduce the same subtree.
        let mut tried: u8 = 0;
        let mut extended = false;

        for (i, &die) in self.dice.iter().enumerate() {
            if used & (1 << i) != 0 || tried & (1 << die) != 0 {
                continue;
            }
            tried |= 1 << die;

            for half_move in single_die_moves(&board, die, self.player) {
                extended = true;
                let (next_board, next_borne_off) =
                    apply_move_to_board(&board, &borne_off, &half_move, self.player);
                self.prefix.push(half_move);
                self.explore(next_board, next_borne_off, used | (1 << i));
                self.prefix.pop();
            }
        }

        if !extended {
            self.found.push(self.prefix);
        }
    }
}

/// All maximal plays for `dice` (2 values, or 4 for a double).
///
/// Only the sequences using the most dice are kept. When just one die of a
/// non-double roll can be played, the higher die must be used if it can be.
/// A position with no legal move yields a single empty sequence.
pub fn get_legal_move_sequences(
    board: &Board,
    borne_off: &BorneOff,
    dice: &[u8],
    player: Player,
) -> Vec<Sequence> {
    assert!(dice.len() <= 4, "at most four dice per turn, got {}", dice.len());
    dice.iter().for_each(|&die| assert_die(die));

    let mut search = SequenceSearch { player, dice, prefix: Sequence::new(), found: Vec::new() };
    search.explore(*board, *borne_off, 0);

    let max_len = search.found.iter().map(|s| s.len()).max().unwrap_or(0);
    if max_len == 0 {
        return vec![Sequence::new()];
    }

    let mut sequences: Vec<Sequence> =
        search.found.into_iter().filter(|s| s.len() == max_len).collect();

    if max_len == 1 && dice.len() == 2 && dice[0] != dice[1] {
        let higher = dice[0].max(dice[1]);
        if sequences.iter().any(|s| s[0].die == higher) {
            sequences.retain(|s| s[0].die == higher);
        }
    }

    sequences
}

/// Next moves consistent with the moves already committed this turn,
/// one per distinct from/to pair.
pub fn get_valid_next_moves(sequences: &[Sequence], made: &[HalfMove]) -> Vec<HalfMove> {
    let mut seen = HashSet::new();
    sequences
        .iter()
        .filter(|s| s.len() > made.len() && s.starts_with(made))
        .map(|s| s[made.len()])
        .filter(|m| seen.insert((m.from, m.to)))
        .collect()
}

/// No die value of the roll can move any checker.
pub fn has_no_moves(board: &Board, dice: &[u8], player: Player) -> bool {
    let mut tried: u8 = 0;
    for &die in dice {
        assert_die(die);
        if tried & (1 << die) != 0 {
            continue;
        }
        tried |= 1 << die;
        if !single_die_moves(board, die, player).is_empty() {
            return false;
        }
    }
    true
}

/// Dice of the roll not consumed by `sequence`.
pub fn remaining_dice(dice: &[u8], sequence: &[HalfMove]) -> TinyVec<u8, 4> {
    let mut remaining = TinyVec::from_slice(dice);
    for half_move in sequence {
        if let Some(i) = remaining.iter().position(|&d| d == half_move.die) {
            remaining.remove(i);
        }
    }
    remaining
}
