//! Error types for fleet dispatch

use std::time::Duration;

use thiserror::Error;

/// Error detected before any work is dispatched
#[derive(Debug, Error)]
pub enum FleetError {
    /// The target set is empty
    #[error("no hosts to dispatch to")]
    NoHosts,
}

/// Per-host failure cause
///
/// Task errors are recorded into the host's result and never abort the
/// overall run.
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    /// The host's operation outlived its own deadline
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The operation itself failed (transport, protocol, anything else)
    #[error("{0}")]
    Failed(String),
}
