//! Bounded-concurrency dispatch across a host set

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;

use crate::error::{FleetError, TaskError};

/// One host's outcome from a fleet run
///
/// Results are produced in completion order, not input order.
#[derive(Debug, Clone)]
pub struct TaskResult<T> {
    /// Host identifier the operation ran against
    pub host: String,
    /// Success payload or failure cause
    pub outcome: Result<T, TaskError>,
}

/// Runs a per-host operation across a fleet with bounded parallelism.
///
/// Admission is a counting semaphore sized to the batch size: at most that
/// many operations are in flight at any instant, regardless of how tasks
/// are scheduled. A batch size of zero or one degrades to sequential
/// execution; a batch size at or above the host count runs fully parallel.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    batch_size: usize,
    per_host_timeout: Option<Duration>,
}

impl Dispatcher {
    /// Create a dispatcher with the given batch size
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            per_host_timeout: None,
        }
    }

    /// Apply a per-host timeout. A zero duration means no timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.per_host_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Run `op` against every host, returning one result per host.
    ///
    /// A per-host error or timeout is captured in that host's [`TaskResult`]
    /// and never aborts the rest of the run; the only call-level error is an
    /// empty host list, rejected before any work starts. The per-host clock
    /// starts after admission, so queueing behind the batch gate does not
    /// eat into a host's deadline.
    ///
    /// The spawned tasks live in a [`JoinSet`] owned by this call: dropping
    /// or cancelling the returned future aborts every in-flight operation,
    /// so a process-level shutdown propagates promptly even though per-host
    /// deadlines are independent.
    ///
    /// `op` must not mutate shared state; it reports through its return
    /// value, which this call forwards to the single joining path. Callers
    /// needing incremental feedback can print from within `op`, accepting
    /// that concurrent prints may interleave.
    pub async fn run<T, F, Fut>(
        &self,
        hosts: Vec<String>,
        op: F,
    ) -> Result<Vec<TaskResult<T>>, FleetError>
    where
        T: Send + 'static,
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        if hosts.is_empty() {
            return Err(FleetError::NoHosts);
        }

        let limit = if self.batch_size <= 1 {
            1
        } else {
            self.batch_size.min(hosts.len())
        };
        let gate = Arc::new(Semaphore::new(limit));
        let op = Arc::new(op);
        let per_host_timeout = self.per_host_timeout;

        let expected = hosts.len();
        let mut tasks = JoinSet::new();
        for host in hosts {
            let gate = Arc::clone(&gate);
            let op = Arc::clone(&op);
            tasks.spawn(async move {
                let _permit = gate.acquire_owned().await.expect("admission gate closed");

                let outcome = match per_host_timeout {
                    Some(deadline) => match tokio::time::timeout(deadline, op(host.clone())).await
                    {
                        Ok(Ok(value)) => Ok(value),
                        Ok(Err(e)) => Err(TaskError::Failed(format!("{e:#}"))),
                        Err(_) => Err(TaskError::Timeout(deadline)),
                    },
                    None => op(host.clone())
                        .await
                        .map_err(|e| TaskError::Failed(format!("{e:#}"))),
                };

                TaskResult { host, outcome }
            });
        }

        let mut results = Vec::with_capacity(expected);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                // A panicking op loses its host's result; everything else
                // still completes.
                Err(e) => error!(error = %e, "fleet task did not complete"),
            }
        }
        Ok(results)
    }
}
