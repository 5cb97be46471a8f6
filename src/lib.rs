//! Backgammon rules core with a greedy engine and a post-game reviewer.
//!
//! ## Modules
//!
//! - [`backgammon`] - Board, dice, moves and the legal move generator
//! - [`eval`] - Static position evaluation
//! - [`engine`] - Move selection strategies
//! - [`cube`] - Doubling cube
//! - [`game`] - Turn-by-turn game driver and self-play
//! - [`review`] - Grading of recorded turns
//! - [`config`] - Environment configuration
//!
//! ## Example
//!
//! ```
//! use backgammon_core::backgammon::{Board, BorneOff, Player, movegen::get_legal_move_sequences};
//! use backgammon_core::engine::{GreedyStrategy, Strategy};
//!
//! let board = Board::new();
//! let borne_off = BorneOff::new();
//! let sequences = get_legal_move_sequences(&board, &borne_off, &[3, 1], Player::White);
//!
//! let mut ai = GreedyStrategy::seeded(7);
//! let choice = ai.choose_sequence(&sequences, &board, &borne_off, Player::White);
//! println!("White plays {choice}");
//! ```

pub mod backgammon;
pub mod config;
pub mod cube;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod misc;
pub mod review;
