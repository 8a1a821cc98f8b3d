//! Lightweight in-process metrics (dependency-free).
//!
//! `metrics` holds the named counter/gauge registry and its text exposition;
//! `process` supplies the default process samples appended to every scrape.

pub mod metrics;
pub mod process;
