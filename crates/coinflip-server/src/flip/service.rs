use rand::Rng;
use serde::Serialize;

use coinflip_core::error::{CoinFlipError, Result};
use coinflip_core::outcome::{random_batch_size, Tally};
use coinflip_core::stats::{CurrentCounts, FlipStats};

use crate::obs::metrics::{Counter, Gauge, Registry};

/// Message returned with 400 when `times` is missing, non-numeric or not positive.
pub const INVALID_TIMES_MESSAGE: &str = "Please provide a valid number of times greater than zero.";

/// Handles to every metric the service owns, registered once at startup.
#[derive(Debug, Clone)]
pub struct FlipMetrics {
    pub heads: Counter,
    pub tails: Counter,
    pub flips: Counter,
    pub errors: Counter,
    pub health: Gauge,
}

impl FlipMetrics {
    pub fn register(registry: &mut Registry) -> Result<Self> {
        let heads = registry.register_counter("heads_count", "Number of heads")?;
        let tails = registry.register_counter("tails_count", "Number of tails")?;
        let flips = registry.register_counter("flip_count", "Number of flips")?;
        let errors = registry.register_counter("error_counter", "Total number of errors")?;
        let health = registry.register_gauge(
            "application_health",
            "Health of the application, 1 for up, 0 for down",
        )?;
        health.set(1);

        Ok(Self { heads, tails, flips, errors, health })
    }
}

/// Result of [`FlipService::flip_random`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RandomFlip {
    pub message: String,
    #[serde(flatten)]
    pub tally: Tally,
}

#[derive(Debug, Clone)]
pub struct FlipService {
    metrics: FlipMetrics,
    max_times: Option<u64>,
}

impl FlipService {
    pub fn new(metrics: FlipMetrics, max_times: Option<u64>) -> Self {
        Self { metrics, max_times }
    }

    pub fn metrics(&self) -> &FlipMetrics {
        &self.metrics
    }

    /// Validate the raw `times` query value.
    ///
    /// Reads the leading integer the way a lenient query parser does:
    /// leading whitespace, an optional sign, then base-10 digits up to the
    /// first other character (`"10abc"` is 10, `"1.5"` is 1). Rejected when
    /// there are no digits, the value is not positive, it overflows, or it
    /// exceeds the configured cap.
    pub fn parse_times(&self, raw: Option<&str>) -> Result<u64> {
        raw.and_then(leading_integer)
            .filter(|n| *n > 0)
            .map(|n| n as u64)
            .filter(|n| self.max_times.map_or(true, |max| *n <= max))
            .ok_or_else(|| CoinFlipError::InvalidArgument(INVALID_TIMES_MESSAGE.into()))
    }

    pub fn flip(&self, times: u64) -> Tally {
        self.flip_with(&mut rand::rng(), times)
    }

    /// Counters are bumped only after the whole batch has been generated.
    pub fn flip_with<R: Rng + ?Sized>(&self, rng: &mut R, times: u64) -> Tally {
        let tally = Tally::run(rng, times);
        self.metrics.flips.inc_by(times);
        self.metrics.heads.inc_by(tally.heads);
        self.metrics.tails.inc_by(tally.tails);
        tally
    }

    pub fn flip_random(&self) -> RandomFlip {
        self.flip_random_with(&mut rand::rng())
    }

    pub fn flip_random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> RandomFlip {
        let times = random_batch_size(rng);
        let tally = self.flip_with(rng, times);
        RandomFlip { message: format!("Flipped coins {times} times"), tally }
    }

    pub fn record_error(&self) {
        self.metrics.errors.inc();
    }

    /// Zero heads, tails and flips. Errors and health are left alone.
    pub fn reset(&self) {
        self.metrics.heads.reset();
        self.metrics.tails.reset();
        self.metrics.flips.reset();
    }

    pub fn current_counts(&self) -> CurrentCounts {
        CurrentCounts {
            heads: self.metrics.heads.get(),
            tails: self.metrics.tails.get(),
            total_flips: self.metrics.flips.get(),
        }
    }

    pub fn stats(&self) -> FlipStats {
        self.current_counts().into()
    }
}

/// Optional sign followed by at least one digit, after leading whitespace.
/// Trailing characters are ignored.
fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let n = rest[..end].parse::<i64>().ok()?;
    Some(if negative { -n } else { n })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn service() -> (Registry, FlipService) {
        let mut registry = Registry::new(&BTreeMap::new());
        let metrics = FlipMetrics::register(&mut registry).unwrap();
        (registry, FlipService::new(metrics, Some(1_000)))
    }

    #[test]
    fn registers_all_metrics_with_health_up() {
        let (registry, _svc) = service();
        assert_eq!(
            registry.names(),
            ["heads_count", "tails_count", "flip_count", "error_counter", "application_health"]
        );
        assert_eq!(registry.get_value("application_health").unwrap(), 1.0);
    }

    #[test]
    fn parse_times_reads_leading_integer() {
        let (_r, svc) = service();
        for (raw, want) in [
            ("10", 10),
            (" 3 ", 3),
            ("+7", 7),
            ("10abc", 10),
            ("1.5", 1),
            ("1e3", 1),
            ("\t42 coins", 42),
            ("1000", 1_000),
        ] {
            assert_eq!(svc.parse_times(Some(raw)).unwrap(), want, "{raw:?}");
        }
    }

    #[test]
    fn parse_times_rejects_bad_input() {
        let (_r, svc) = service();
        for bad in [
            None,
            Some(""),
            Some("abc"),
            Some("0"),
            Some("-5"),
            Some("-5abc"),
            Some("+"),
            Some(".5"),
            Some("99999999999999999999"),
            Some("1001"),
        ] {
            let err = svc.parse_times(bad).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("invalid argument: {INVALID_TIMES_MESSAGE}"),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn no_cap_by_default() {
        let mut registry = Registry::new(&BTreeMap::new());
        let metrics = FlipMetrics::register(&mut registry).unwrap();
        let svc = FlipService::new(metrics, None);
        assert_eq!(svc.parse_times(Some("2000000")).unwrap(), 2_000_000);
    }

    #[test]
    fn flip_updates_all_three_counters() {
        let (registry, svc) = service();
        let mut rng = StdRng::seed_from_u64(3);

        let first = svc.flip_with(&mut rng, 10);
        let second = svc.flip_with(&mut rng, 25);
        assert_eq!(first.total(), 10);
        assert_eq!(second.total(), 25);

        let counts = svc.current_counts();
        assert_eq!(counts.total_flips, 35);
        assert_eq!(counts.heads, first.heads + second.heads);
        assert_eq!(counts.tails, first.tails + second.tails);
        assert_eq!(registry.get_value("flip_count").unwrap(), 35.0);
    }

    #[test]
    fn random_flip_message_matches_tally() {
        let (_r, svc) = service();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let out = svc.flip_random_with(&mut rng);
            let n = out.tally.total();
            assert!((1..=100).contains(&n));
            assert_eq!(out.message, format!("Flipped coins {n} times"));
        }
    }

    #[test]
    fn reset_leaves_errors_and_health() {
        let (registry, svc) = service();
        svc.flip(5);
        svc.record_error();
        svc.reset();

        assert_eq!(svc.current_counts(), CurrentCounts { heads: 0, tails: 0, total_flips: 0 });
        assert_eq!(registry.get_value("error_counter").unwrap(), 1.0);
        assert_eq!(registry.get_value("application_health").unwrap(), 1.0);
        assert_eq!(svc.stats().heads_percentage, "0.00%");
    }
}
