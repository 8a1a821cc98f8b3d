//! Derived statistics over the cumulative flip counters.

use serde::Serialize;

/// Snapshot of the cumulative counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrentCounts {
    pub heads: u64,
    pub tails: u64,
    pub total_flips: u64,
}

/// Totals plus heads/tails share formatted as `"NN.NN%"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlipStats {
    pub total_flips: u64,
    pub heads: u64,
    pub tails: u64,
    pub heads_percentage: String,
    pub tails_percentage: String,
}

impl FlipStats {
    /// Percentages are `0.00%` when nothing has been flipped yet.
    pub fn from_counts(total_flips: u64, heads: u64, tails: u64) -> Self {
        Self {
            total_flips,
            heads,
            tails,
            heads_percentage: percentage(heads, total_flips),
            tails_percentage: percentage(tails, total_flips),
        }
    }
}

impl From<CurrentCounts> for FlipStats {
    fn from(c: CurrentCounts) -> Self {
        FlipStats::from_counts(c.total_flips, c.heads, c.tails)
    }
}

fn percentage(part: u64, total: u64) -> String {
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", part as f64 / total as f64 * 100.0)
}
