//! Coin flip service library entry.
//!
//! Wires config, the metrics registry, the flip service and health checks
//! into an axum router. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod flip;
pub mod health;
pub mod obs;
pub mod ops;
pub mod router;
