//! Error types for inventory handling

use std::path::PathBuf;

use thiserror::Error;

/// Error type for inventory operations
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Reading or writing the inventory file failed
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid inventory YAML
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Serializing the inventory failed
    #[error("failed to serialize inventory: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Result type for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;
