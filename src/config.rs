//! Engine configuration from the environment.
//!
//! `BACKGAMMON_SEED`, `BACKGAMMON_NOISE`, `BACKGAMMON_REVIEW_BATCH` and
//! `RAYON_NUM_THREADS` are read here; command line flags override them.

use tracing::{info, warn};

use crate::{engine::DEFAULT_NOISE, review::DEFAULT_BATCH_SIZE};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Seed for dice and strategy randomness. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Tie-break noise of the greedy strategy, within `0.0..=0.25`.
    pub noise: f32,
    pub review_batch: usize,
    /// Worker threads for the global rayon pool, rayon's default when `None`.
    pub threads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { seed: None, noise: DEFAULT_NOISE, review_batch: DEFAULT_BATCH_SIZE, threads: None }
    }
}

fn parse<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable environment value");
            None
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source, falling back to defaults
    /// for missing or malformed entries.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = EngineConfig::default();
        EngineConfig {
            seed: parse(&lookup, "BACKGAMMON_SEED"),
            noise: parse::<f32>(&lookup, "BACKGAMMON_NOISE")
                .map_or(defaults.noise, |n| n.clamp(0.0, DEFAULT_NOISE)),
            review_batch: parse::<usize>(&lookup, "BACKGAMMON_REVIEW_BATCH")
                .map_or(defaults.review_batch, |n| n.max(1)),
            threads: parse::<usize>(&lookup, "RAYON_NUM_THREADS").filter(|&n| n > 0),
        }
    }

    /// Seed to use, drawing one from the OS if none was configured.
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Builds the global rayon pool when a thread count is configured.
    /// Tolerates a pool that is already initialized.
    pub fn init_rayon_threads(&self) {
        let Some(threads) = self.threads else {
            return;
        };
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
            Ok(()) => info!(threads, "rayon pool initialized"),
            Err(err) => warn!(%err, "rayon pool already initialized"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(EngineConfig::from_lookup(lookup(&[])), EngineConfig::default());
    }

    #[test]
    fn reads_and_clamps_values() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("BACKGAMMON_SEED", "42"),
            ("BACKGAMMON_NOISE", "3.5"),
            ("BACKGAMMON_REVIEW_BATCH", "0"),
            ("RAYON_NUM_THREADS", "4"),
        ]));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.noise, DEFAULT_NOISE);
        assert_eq!(config.review_batch, 1);
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.seed_or_random(), 42);
    }

    #[test]
    fn malformed_values_fall_back() {
        let config = EngineConfig::from_lookup(lookup(&[("BACKGAMMON_SEED", "abc"), ("BACKGAMMON_NOISE", "x")]));
        assert_eq!(config.seed, None);
        assert_eq!(config.noise, DEFAULT_NOISE);
    }
}
