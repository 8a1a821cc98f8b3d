//! Application health: a pluggable check backing `/health` and the
//! `application_health` gauge.

use async_trait::async_trait;
use serde::Serialize;

/// Consulted on every `/health` request. Implementations may ping
/// dependencies; keep them bounded since the handler awaits them inline.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &'static str;
    async fn is_healthy(&self) -> bool;
}

/// Reports healthy unconditionally.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysUp;

#[async_trait]
impl HealthCheck for AlwaysUp {
    fn name(&self) -> &'static str {
        "always_up"
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Up,
    Down,
}

impl HealthStatus {
    pub fn from_healthy(healthy: bool) -> Self {
        if healthy {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        }
    }

    /// Value exported through the `application_health` gauge.
    pub fn gauge_value(self) -> i64 {
        match self {
            HealthStatus::Up => 1,
            HealthStatus::Down => 0,
        }
    }
}
