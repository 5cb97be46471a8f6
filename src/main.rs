//! Command line front end.
//!
//! - `backgammon selfplay` - Play engine games and print win statistics
//! - `backgammon review FILE` - Grade a recorded game turn by turn
//! - `backgammon show` - Print the opening position

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use rand::{SeedableRng, rngs::StdRng};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use backgammon_core::{
    backgammon::{Board, BorneOff, Player, WinType},
    config::EngineConfig,
    engine::{GreedyStrategy, RandomStrategy, Strategy},
    game::{Ending, GameRecord, play_game},
    review::ReviewSession,
};

/// Backgammon engine: self-play and game review
#[derive(Parser)]
#[command(name = "backgammon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play engine against engine and report results
    Selfplay {
        #[arg(long, default_value_t = 100)]
        games: usize,
        #[arg(long, value_enum, default_value_t = StrategyKind::Greedy)]
        white: StrategyKind,
        #[arg(long, value_enum, default_value_t = StrategyKind::Random)]
        black: StrategyKind,
        /// Overrides BACKGAMMON_SEED
        #[arg(long)]
        seed: Option<u64>,
        /// Write the last game as JSON for `review`
        #[arg(long)]
        record: Option<PathBuf>,
    },
    /// Grade every turn of a recorded game
    Review {
        file: PathBuf,
        /// Overrides BACKGAMMON_REVIEW_BATCH
        #[arg(long)]
        batch: Option<usize>,
    },
    /// Print the opening position
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyKind {
    Greedy,
    Random,
}

impl StrategyKind {
    fn build(self, seed: u64, noise: f32) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Greedy => Box::new(GreedyStrategy::seeded(seed).with_noise(noise)),
            StrategyKind::Random => Box::new(RandomStrategy::seeded(seed)),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::from_env();
    config.init_rayon_threads();

    match cli.command {
        Some(Commands::Selfplay { games, white, black, seed, record }) => {
            let config = EngineConfig { seed: seed.or(config.seed), ..config };
            run_games(&config, games, white, black, record)
        }
        Some(Commands::Review { file, batch }) => {
            let config = EngineConfig { review_batch: batch.unwrap_or(config.review_batch).max(1), ..config };
            review_file(&config, &file)
        }
        Some(Commands::Show) | None => {
            println!("{}", Board::new().to_fancy_string(&BorneOff::new()));
            Ok(())
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    wins: u32,
    gammons: u32,
    backgammons: u32,
}

#[derive(Debug, Default)]
struct Stats {
    games: u32,
    abandoned: u32,
    white: Tally,
    black: Tally,
}

impl Stats {
    fn add(&mut self, record: &GameRecord) {
        self.games += 1;
        let Some(outcome) = record.outcome else {
            self.abandoned += 1;
            return;
        };
        let tally = match outcome.winner {
            Player::White => &mut self.white,
            Player::Black => &mut self.black,
        };
        match outcome.ending {
            Ending::BearOff(WinType::Gammon) => tally.gammons += 1,
            Ending::BearOff(WinType::Backgammon) => tally.backgammons += 1,
            Ending::BearOff(WinType::Normal) | Ending::DoubleDeclined => tally.wins += 1,
        }
    }

    fn print(&self) {
        let rate = |n: u32| n as f32 / self.games.max(1) as f32 * 100.0;
        let total = |t: &Tally| t.wins + t.gammons + t.backgammons;
        println!("============================================");
        println!(
            "Games: {}, White Wins: {}, Black Wins: {}, Abandoned: {}",
            self.games,
            total(&self.white),
            total(&self.black),
            self.abandoned
        );
        println!("White Win Rate: {:.2}%, Black Win Rate: {:.2}%", rate(total(&self.white)), rate(total(&self.black)));
        println!(
            "White Gammon Rate: {:.2}%, White Backgammon Rate: {:.2}%",
            rate(self.white.gammons),
            rate(self.white.backgammons)
        );
        println!(
            "Black Gammon Rate: {:.2}%, Black Backgammon Rate: {:.2}%",
            rate(self.black.gammons),
            rate(self.black.backgammons)
        );
    }
}

fn run_games(
    config: &EngineConfig,
    games: usize,
    white: StrategyKind,
    black: StrategyKind,
    record: Option<PathBuf>,
) -> Result<()> {
    if games == 0 {
        bail!("--games must be at least 1");
    }
    let seed = config.seed_or_random();
    info!(games, seed, ?white, ?black, "starting self-play");

    let start = Instant::now();
    let records = (0..games as u64)
        .into_par_iter()
        .map(|i| {
            let game_seed = seed.wrapping_add(i);
            let mut rng = StdRng::seed_from_u64(game_seed);
            let mut white_ai = white.build(game_seed.wrapping_mul(2), config.noise);
            let mut black_ai = black.build(game_seed.wrapping_mul(2).wrapping_add(1), config.noise);
            play_game(white_ai.as_mut(), black_ai.as_mut(), &mut rng)
        })
        .collect::<Result<Vec<_>, _>>()
        .context("self-play game failed")?;
    info!(elapsed = ?start.elapsed(), "self-play finished");

    let mut stats = Stats::default();
    for record in &records {
        stats.add(record);
    }
    if stats.abandoned > 0 {
        warn!(abandoned = stats.abandoned, "some games hit the turn limit");
    }
    stats.print();

    if let (Some(path), Some(last)) = (record, records.last()) {
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), last)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Recorded game written to {}", path.display());
    }
    Ok(())
}

fn review_file(config: &EngineConfig, path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let record: GameRecord =
        serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))?;

    let mut ai = GreedyStrategy::seeded(config.seed_or_random()).with_noise(config.noise);
    let mut session = ReviewSession::with_batch_size(&record.turns, &mut ai, config.review_batch);
    let mut turn = 0;
    loop {
        let (grades, done) = session.next_batch();
        for grade in grades {
            turn += 1;
            println!(
                "{turn:>4}. {:<5} {}  played {:<24} best {:<24} -{:.1} {}",
                grade.turn.player.to_string(),
                grade.turn.dice,
                grade.turn.moves.to_string(),
                grade.best_seq.to_string(),
                grade.score_diff,
                grade.rating
            );
        }
        if done {
            break;
        }
    }

    let review = session.finish();
    println!("============================================");
    println!("White accuracy: {:.1}%, Black accuracy: {:.1}%", review.accuracy.white, review.accuracy.black);
    if let Some(outcome) = record.outcome {
        println!("{} won {} point(s) ({:?})", outcome.winner, outcome.points, outcome.ending);
    }
    Ok(())
}
