//! Minimal metrics registry for the service.
//!
//! No metrics crate is used; counters and gauges are plain atomics behind
//! cheap `Arc` handles, registered by unique name at startup and rendered in
//! registration order in Prometheus text exposition format. A fixed set of
//! default labels (e.g. `app="coin-api"`) is applied to every sample.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use coinflip_core::error::{CoinFlipError, Result};

/// Content type of [`Registry::export_text`].
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn fmt_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        v.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// Monotonic counter, only lowered by an explicit [`Counter::reset`].
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicU64>);

impl Counter {
    /// Increment by 1.
    pub fn inc(&self) {
        self.inc_by(1);
    }

    /// Increment by an arbitrary non-negative amount.
    pub fn inc_by(&self, v: u64) {
        self.0.fetch_add(v, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Gauge(Arc<AtomicI64>);

impl Gauge {
    pub fn set(&self, v: i64) {
        self.0.store(v, Ordering::Relaxed);
    }

    pub fn get(&self) -> i64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
enum Handle {
    Counter(Counter),
    Gauge(Gauge),
}

impl Handle {
    fn kind(&self) -> MetricKind {
        match self {
            Handle::Counter(_) => MetricKind::Counter,
            Handle::Gauge(_) => MetricKind::Gauge,
        }
    }
}

#[derive(Debug)]
struct Entry {
    name: String,
    help: String,
    handle: Handle,
}

/// A sample owned by someone other than the registry (e.g. process stats),
/// rendered after the registered metrics with the same default labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub value: f64,
}

/// Ordered set of uniquely named counters and gauges.
///
/// Registration takes `&mut self` and happens once during startup; after that
/// the registry is shared read-only and all updates go through atomics.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    /// Pre-rendered `k="v",...` for the default labels.
    labels: String,
}

impl Registry {
    pub fn new(default_labels: &BTreeMap<String, String>) -> Self {
        let labels = default_labels
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
            .collect::<Vec<_>>()
            .join(",");
        Self { entries: Vec::new(), index: HashMap::new(), labels }
    }

    pub fn register_counter(&mut self, name: &str, help: &str) -> Result<Counter> {
        let c = Counter::default();
        self.register(name, help, Handle::Counter(c.clone()))?;
        Ok(c)
    }

    pub fn register_gauge(&mut self, name: &str, help: &str) -> Result<Gauge> {
        let g = Gauge::default();
        self.register(name, help, Handle::Gauge(g.clone()))?;
        Ok(g)
    }

    fn register(&mut self, name: &str, help: &str, handle: Handle) -> Result<()> {
        if !is_valid_metric_name(name) {
            return Err(CoinFlipError::InvalidArgument(format!("invalid metric name: {name:?}")));
        }
        if self.index.contains_key(name) {
            return Err(CoinFlipError::DuplicateMetric(name.to_string()));
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(Entry { name: name.to_string(), help: help.to_string(), handle });
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<&Handle> {
        self.index
            .get(name)
            .and_then(|&i| self.entries.get(i))
            .map(|e| &e.handle)
            .ok_or_else(|| CoinFlipError::UnknownMetric(name.to_string()))
    }

    fn counter(&self, name: &str) -> Result<&Counter> {
        match self.lookup(name)? {
            Handle::Counter(c) => Ok(c),
            Handle::Gauge(_) => Err(CoinFlipError::KindMismatch {
                name: name.to_string(),
                expected: MetricKind::Counter.as_str(),
            }),
        }
    }

    pub fn increment_counter(&self, name: &str, amount: u64) -> Result<()> {
        self.counter(name)?.inc_by(amount);
        Ok(())
    }

    pub fn reset_counter(&self, name: &str) -> Result<()> {
        self.counter(name)?.reset();
        Ok(())
    }

    pub fn set_gauge(&self, name: &str, value: i64) -> Result<()> {
        match self.lookup(name)? {
            Handle::Gauge(g) => {
                g.set(value);
                Ok(())
            }
            Handle::Counter(_) => Err(CoinFlipError::KindMismatch {
                name: name.to_string(),
                expected: MetricKind::Gauge.as_str(),
            }),
        }
    }

    pub fn get_value(&self, name: &str) -> Result<f64> {
        Ok(match self.lookup(name)? {
            Handle::Counter(c) => c.get() as f64,
            Handle::Gauge(g) => g.get() as f64,
        })
    }

    /// Registered metric names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn render_block(
        &self,
        out: &mut String,
        name: &str,
        help: &str,
        kind: MetricKind,
        value: &str,
    ) {
        let _ = writeln!(out, "# HELP {} {}", name, escape_help(help));
        let _ = writeln!(out, "# TYPE {} {}", name, kind.as_str());
        if self.labels.is_empty() {
            let _ = writeln!(out, "{} {}", name, value);
        } else {
            let _ = writeln!(out, "{}{{{}}} {}", name, self.labels, value);
        }
    }

    /// Render all registered metrics plus any extra samples provided by callers.
    pub fn export_text(&self, extra: &[Sample]) -> String {
        let mut out = String::new();
        for e in &self.entries {
            let value = match &e.handle {
                Handle::Counter(c) => c.get().to_string(),
                Handle::Gauge(g) => g.get().to_string(),
            };
            self.render_block(&mut out, &e.name, &e.help, e.handle.kind(), &value);
        }
        for s in extra {
            self.render_block(&mut out, s.name, s.help, s.kind, &fmt_float(s.value));
        }
        out
    }
}
