//! coinflip core: transport-agnostic primitives shared by the server.
//!
//! Holds the error surface, the random outcome generator with its trial
//! tally, and the derived statistics computed from cumulative counters.
//! Nothing here knows about HTTP or the async runtime.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `CoinFlipError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod outcome;
pub mod stats;

/// Shared result type.
pub use error::{CoinFlipError, Result};
pub use outcome::{Outcome, Tally};
pub use stats::{CurrentCounts, FlipStats};
