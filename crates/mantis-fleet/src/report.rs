//! Fleet result aggregation
//!
//! The status report is the one shared sink fleet tasks merge into. All
//! mutation goes through [`StatusReport::record`], which is mutex-guarded,
//! so counts and error entries stay consistent no matter how results
//! interleave. Readers take a [`StatusSummary`] snapshot after the run has
//! joined.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Mutex;

use crate::dispatcher::TaskResult;

/// Per-host success payload for a firmware status sweep
#[derive(Debug, Clone)]
pub struct StatusSample {
    /// Firmware version string summarizing the host
    pub version: String,
    /// Whether any of the host's checks suggested an update in progress
    pub in_progress: bool,
}

/// Placeholder version for hosts that answered without a version string
const UNKNOWN_VERSION: &str = "(unknown)";

#[derive(Debug, Default, Clone)]
struct Aggregate {
    versions: BTreeMap<String, usize>,
    in_progress: usize,
    errors: BTreeMap<String, String>,
}

/// Synchronized aggregate of per-host firmware status results.
///
/// Each host contributes exactly once: either a version count (plus at most
/// one in-progress increment) or an error entry, never both. The dispatcher
/// spawns one task per host, so the last-write-wins error map policy is
/// never exercised in practice.
#[derive(Debug, Default)]
pub struct StatusReport {
    inner: Mutex<Aggregate>,
}

impl StatusReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one host's result into the aggregate
    pub fn record(&self, result: &TaskResult<StatusSample>) {
        let mut inner = self.inner.lock().expect("report lock poisoned");
        match &result.outcome {
            Ok(sample) => {
                let version = if sample.version.is_empty() {
                    UNKNOWN_VERSION.to_string()
                } else {
                    sample.version.clone()
                };
                *inner.versions.entry(version).or_insert(0) += 1;
                if sample.in_progress {
                    inner.in_progress += 1;
                }
            }
            Err(e) => {
                inner.errors.insert(result.host.clone(), e.to_string());
            }
        }
    }

    /// Clone the aggregate out for reading.
    ///
    /// Call after all writers have joined; a snapshot taken mid-run is
    /// consistent but incomplete.
    pub fn snapshot(&self) -> StatusSummary {
        let inner = self.inner.lock().expect("report lock poisoned");
        StatusSummary {
            versions: inner.versions.clone(),
            in_progress: inner.in_progress,
            errors: inner.errors.clone(),
        }
    }
}

/// Point-in-time view of a completed status sweep
#[derive(Debug, Clone)]
pub struct StatusSummary {
    /// Occurrences of each summary version across the fleet
    pub versions: BTreeMap<String, usize>,
    /// Hosts flagged as having an update in progress
    pub in_progress: usize,
    /// Failure cause per host that produced no successful check
    pub errors: BTreeMap<String, String>,
}

impl StatusSummary {
    /// Hosts that contributed to the aggregate
    pub fn total_hosts(&self) -> usize {
        self.versions.values().sum::<usize>() + self.errors.len()
    }
}

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Firmware status summary:")?;
        writeln!(f, "  Total hosts: {}", self.total_hosts())?;
        writeln!(f, "  In-progress updates: {}", self.in_progress)?;
        writeln!(f, "  Versions:")?;
        for (version, count) in &self.versions {
            writeln!(f, "    {version}: {count}")?;
        }
        if !self.errors.is_empty() {
            writeln!(f, "  Errors:")?;
            for (host, cause) in &self.errors {
                writeln!(f, "    {host}: {cause}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;

    fn ok(host: &str, version: &str, in_progress: bool) -> TaskResult<StatusSample> {
        TaskResult {
            host: host.to_string(),
            outcome: Ok(StatusSample {
                version: version.to_string(),
                in_progress,
            }),
        }
    }

    fn failed(host: &str, cause: &str) -> TaskResult<StatusSample> {
        TaskResult {
            host: host.to_string(),
            outcome: Err(TaskError::Failed(cause.to_string())),
        }
    }

    #[test]
    fn test_success_and_failure_are_disjoint() {
        let report = StatusReport::new();
        // 7 successes across 4 versions, 3 failures
        report.record(&ok("h0", "1.0.0", false));
        report.record(&ok("h1", "1.0.0", false));
        report.record(&ok("h2", "1.1.0", true));
        report.record(&ok("h3", "1.1.0", false));
        report.record(&ok("h4", "2.0.0", false));
        report.record(&ok("h5", "2.0.0", false));
        report.record(&ok("h6", "3.0.0", true));
        report.record(&failed("h7", "connection refused"));
        report.record(&failed("h8", "tls handshake failed"));
        report.record(&failed("h9", "timed out after 5s"));

        let summary = report.snapshot();
        assert_eq!(summary.errors.len(), 3);
        assert_eq!(summary.versions.len(), 4);
        assert_eq!(summary.versions.values().sum::<usize>(), 7);
        assert_eq!(summary.in_progress, 2);
        // Every host landed in exactly one bucket
        assert_eq!(summary.total_hosts(), 10);
    }

    #[test]
    fn test_empty_version_counts_as_unknown() {
        let report = StatusReport::new();
        report.record(&ok("h0", "", false));
        let summary = report.snapshot();
        assert_eq!(summary.versions.get("(unknown)"), Some(&1));
    }

    #[test]
    fn test_in_progress_counted_once_per_host() {
        // op folds multiple sub-checks into one sample, so a single record
        // call can only bump the counter once
        let report = StatusReport::new();
        report.record(&ok("h0", "1.0.0", true));
        report.record(&ok("h1", "1.0.0", false));
        assert_eq!(report.snapshot().in_progress, 1);
    }

    #[test]
    fn test_last_error_wins_for_a_repeated_host() {
        let report = StatusReport::new();
        report.record(&failed("h0", "first"));
        report.record(&failed("h0", "second"));
        let summary = report.snapshot();
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors.get("h0").map(String::as_str), Some("second"));
    }

    #[test]
    fn test_display_always_prints_summary() {
        let report = StatusReport::new();
        report.record(&failed("h0", "connection refused"));
        let rendered = report.snapshot().to_string();
        assert!(rendered.contains("Total hosts: 1"));
        assert!(rendered.contains("In-progress updates: 0"));
        assert!(rendered.contains("h0: connection refused"));
    }

    #[tokio::test]
    async fn test_concurrent_record_is_safe() {
        use std::sync::Arc;

        let report = Arc::new(StatusReport::new());
        let mut handles = Vec::new();
        for i in 0..50 {
            let report = Arc::clone(&report);
            handles.push(tokio::spawn(async move {
                let host = format!("h{i}");
                if i % 5 == 0 {
                    report.record(&failed(&host, "unreachable"));
                } else {
                    report.record(&ok(&host, "1.2.3", i % 2 == 0));
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let summary = report.snapshot();
        assert_eq!(summary.total_hosts(), 50);
        assert_eq!(summary.errors.len(), 10);
        assert_eq!(summary.versions.values().sum::<usize>(), 40);
    }
}
