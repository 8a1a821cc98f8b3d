//! Shared application state for the coin flip service.
//!
//! Built once in `main` and cloned into every handler. Owns the metrics
//! registry and everything registered in it; there are no globals.

use std::sync::Arc;

use coinflip_core::error::Result;

use crate::config::ServerConfig;
use crate::flip::{FlipMetrics, FlipService};
use crate::health::{AlwaysUp, HealthCheck};
use crate::obs::metrics::{Registry, Sample};
use crate::obs::process::ProcessCollector;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    health: Arc<dyn HealthCheck>,
}

struct AppStateInner {
    registry: Registry,
    flips: FlipService,
    process: Option<ProcessCollector>,
}

impl AppState {
    /// Build application state with the default health check.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        Self::with_health(cfg, Arc::new(AlwaysUp))
    }

    pub fn with_health(cfg: ServerConfig, health: Arc<dyn HealthCheck>) -> Result<Self> {
        let mut registry = Registry::new(&cfg.metrics.default_labels);
        let metrics = FlipMetrics::register(&mut registry)?;
        let flips = FlipService::new(metrics, cfg.flip.max_times);
        let process = cfg.metrics.process_metrics.then(ProcessCollector::new);

        tracing::debug!(
            metrics = ?registry.names(),
            health = health.name(),
            "registry initialised"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner { registry, flips, process }),
            health,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn flips(&self) -> &FlipService {
        &self.inner.flips
    }

    pub fn health(&self) -> Arc<dyn HealthCheck> {
        Arc::clone(&self.health)
    }

    /// Process samples for the next scrape; empty when disabled.
    pub fn metrics_extra(&self) -> Vec<Sample> {
        self.inner.process.as_ref().map(ProcessCollector::collect).unwrap_or_default()
    }
}
