//! Flip service: runs trial batches and keeps the cumulative counters.

mod service;

pub use service::{FlipMetrics, FlipService, RandomFlip, INVALID_TIMES_MESSAGE};
