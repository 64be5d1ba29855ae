//! Dispatcher and report working together, the way the firmware commands
//! use them

use std::sync::Arc;
use std::time::Duration;

use mantis_fleet::{Dispatcher, StatusReport, StatusSample};

#[tokio::test]
async fn test_fleet_sweep_aggregates_correctly() {
    // 10 hosts: 3 fail, 7 succeed across 4 distinct versions
    let hosts: Vec<String> = (0..10).map(|i| format!("10.1.1.{i}")).collect();
    let versions = ["1.0.0", "1.0.0", "1.1.0", "1.1.0", "2.0.0", "2.0.0", "3.0.0"];

    let results = Dispatcher::new(4)
        .with_timeout(Duration::from_secs(5))
        .run(hosts, move |host| async move {
            let idx: usize = host.rsplit('.').next().unwrap().parse().unwrap();
            if idx >= 7 {
                anyhow::bail!("connection refused");
            }
            Ok(StatusSample {
                version: versions[idx].to_string(),
                in_progress: idx == 2,
            })
        })
        .await
        .unwrap();

    let report = Arc::new(StatusReport::new());
    // Record from separate tasks to exercise the synchronized entry point
    let mut handles = Vec::new();
    for result in results {
        let report = Arc::clone(&report);
        handles.push(tokio::spawn(async move { report.record(&result) }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let summary = report.snapshot();
    assert_eq!(summary.errors.len(), 3);
    assert_eq!(summary.versions.len(), 4);
    assert_eq!(summary.versions.values().sum::<usize>(), 7);
    assert_eq!(summary.in_progress, 1);
    assert_eq!(summary.total_hosts(), 10);
    assert_eq!(summary.versions.get("1.0.0"), Some(&2));
    assert_eq!(summary.versions.get("3.0.0"), Some(&1));
}
