//! Default process-level samples appended to `/metrics`.
//!
//! Start time and uptime are tracked in-process and always present. On Linux
//! CPU time, memory, thread and fd counts come from procfs; a failed read is
//! logged and the affected samples are skipped for that scrape.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use super::metrics::{MetricKind, Sample};

#[derive(Debug)]
pub struct ProcessCollector {
    start_unix_secs: f64,
    started: Instant,
}

impl Default for ProcessCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessCollector {
    pub fn new() -> Self {
        let start_unix_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Self { start_unix_secs, started: Instant::now() }
    }

    pub fn collect(&self) -> Vec<Sample> {
        let mut samples = vec![
            Sample {
                name: "process_start_time_seconds",
                help: "Start time of the process since unix epoch in seconds.",
                kind: MetricKind::Gauge,
                value: self.start_unix_secs.floor(),
            },
            Sample {
                name: "process_uptime_seconds",
                help: "Seconds since the process started.",
                kind: MetricKind::Gauge,
                value: self.started.elapsed().as_secs_f64(),
            },
        ];

        #[cfg(target_os = "linux")]
        linux::collect(&mut samples);

        samples
    }
}

#[cfg(target_os = "linux")]
mod linux {
    use super::{MetricKind, Sample};

    const USER_HZ: f64 = 100.0;
    const PAGE_SIZE: f64 = 4096.0;

    pub(super) fn collect(samples: &mut Vec<Sample>) {
        match std::fs::read_to_string("/proc/self/stat").map(|s| parse_stat(&s)) {
            Ok(Some(stat)) => samples.extend([
                Sample {
                    name: "process_cpu_seconds_total",
                    help: "Total user and system CPU time spent in seconds.",
                    kind: MetricKind::Counter,
                    value: stat.cpu_seconds,
                },
                Sample {
                    name: "process_threads",
                    help: "Number of OS threads in the process.",
                    kind: MetricKind::Gauge,
                    value: stat.threads,
                },
                Sample {
                    name: "process_virtual_memory_bytes",
                    help: "Virtual memory size in bytes.",
                    kind: MetricKind::Gauge,
                    value: stat.vsize,
                },
                Sample {
                    name: "process_resident_memory_bytes",
                    help: "Resident memory size in bytes.",
                    kind: MetricKind::Gauge,
                    value: stat.rss_pages * PAGE_SIZE,
                },
            ]),
            Ok(None) => tracing::warn!("malformed /proc/self/stat"),
            Err(err) => tracing::warn!(%err, "read /proc/self/stat failed"),
        }

        match open_fds() {
            Ok(fds) => samples.push(Sample {
                name: "process_open_fds",
                help: "Number of open file descriptors.",
                kind: MetricKind::Gauge,
                value: fds as f64,
            }),
            Err(err) => tracing::warn!(%err, "read open fd files failed"),
        }
    }

    #[derive(Debug, PartialEq)]
    pub(super) struct Stat {
        pub cpu_seconds: f64,
        pub threads: f64,
        pub vsize: f64,
        pub rss_pages: f64,
    }

    /// Fields are counted from the one after `(comm)`, which may itself
    /// contain spaces and parentheses.
    pub(super) fn parse_stat(s: &str) -> Option<Stat> {
        let rest = &s[s.rfind(')')? + 1..];
        let fields: Vec<&str> = rest.split_whitespace().collect();
        let num = |i: usize| fields.get(i).and_then(|v| v.parse::<f64>().ok());

        // state is field 3 of proc(5), so field N lives at index N - 3.
        let utime = num(11)?;
        let stime = num(12)?;
        Some(Stat {
            cpu_seconds: (utime + stime) / USER_HZ,
            threads: num(17)?,
            vsize: num(20)?,
            rss_pages: num(21)?,
        })
    }

    fn open_fds() -> Result<usize, std::io::Error> {
        std::fs::read_dir("/proc/self/fd")?.try_fold(0usize, |acc, item| {
            let entry = item?;
            let ty = entry.file_type()?;
            Ok(if !ty.is_dir() { acc + 1 } else { acc })
        })
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn parses_stat_with_odd_comm() {
            let line = "1234 (coin (api) x) S 1 1234 1234 0 -1 4194560 500 0 0 0 \
                        150 50 0 0 20 0 7 0 100 104857600 2560 18446744073709551615";
            let stat = parse_stat(line).unwrap();
            assert_eq!(
                stat,
                Stat { cpu_seconds: 2.0, threads: 7.0, vsize: 104857600.0, rss_pages: 2560.0 }
            );
        }

        #[test]
        fn truncated_stat_is_none() {
            assert!(parse_stat("1234 (coin) S 1 2 3").is_none());
            assert!(parse_stat("garbage").is_none());
        }
    }
}
