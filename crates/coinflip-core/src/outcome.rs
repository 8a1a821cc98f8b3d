//! Random outcome generator and per-request trial tally.
//!
//! A trial draws a uniform `f64` in `[0, 1)`; anything strictly below 0.5 is
//! heads. The generator is generic over `rand::Rng` so callers can pass the
//! thread-local rng in production and a seeded one in tests.

use rand::Rng;
use serde::Serialize;

/// Smallest batch picked by [`random_batch_size`].
pub const RANDOM_BATCH_MIN: u64 = 1;
/// Largest batch picked by [`random_batch_size`] (inclusive).
pub const RANDOM_BATCH_MAX: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Heads,
    Tails,
}

impl Outcome {
    /// Classify a uniform draw from `[0, 1)`.
    pub fn from_draw(draw: f64) -> Self {
        if draw < 0.5 {
            Outcome::Heads
        } else {
            Outcome::Tails
        }
    }
}

/// Run one trial.
pub fn next_outcome<R: Rng + ?Sized>(rng: &mut R) -> Outcome {
    Outcome::from_draw(rng.random::<f64>())
}

/// Pick a batch size uniformly from `RANDOM_BATCH_MIN..=RANDOM_BATCH_MAX`.
pub fn random_batch_size<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.random_range(RANDOM_BATCH_MIN..=RANDOM_BATCH_MAX)
}

/// Heads/tails produced by a single batch of trials.
///
/// Lives only for the duration of one request; the cumulative view is kept
/// in the metrics registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub heads: u64,
    pub tails: u64,
}

impl Tally {
    /// Run `times` independent trials.
    pub fn run<R: Rng + ?Sized>(rng: &mut R, times: u64) -> Self {
        let mut tally = Tally::default();
        for _ in 0..times {
            tally.record(next_outcome(rng));
        }
        tally
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Heads => self.heads += 1,
            Outcome::Tails => self.tails += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.heads + self.tails
    }
}
