//! Error types for Redfish operations

use thiserror::Error;

/// Error type for Redfish calls.
///
/// `Transport` covers everything below HTTP semantics: connection refusal,
/// TLS failures, and request timeouts. The remaining variants are protocol
/// errors, where the controller answered but not usefully.
#[derive(Debug, Error)]
pub enum RedfishError {
    /// Connection, TLS, or timeout failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The controller answered with a non-success status
    #[error("redfish {path}: {status}: {body}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body did not decode into the expected shape
    #[error("redfish {path}: decode failed: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The controller reported zero system resources
    #[error("no systems reported by BMC")]
    NoSystems,
}

/// Result type for Redfish calls
pub type Result<T> = std::result::Result<T, RedfishError>;
