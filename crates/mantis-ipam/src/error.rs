//! Error types for address allocation

use thiserror::Error;

/// Error type for pool operations
#[derive(Debug, Error)]
pub enum IpamError {
    /// The CIDR string could not be used to build a pool
    #[error("invalid CIDR {cidr:?}: {reason}")]
    InvalidCidr { cidr: String, reason: String },

    /// Every usable address in the prefix has been handed out or reserved
    #[error("address pool {0} exhausted")]
    Exhausted(String),
}

/// Result type for pool operations
pub type Result<T> = std::result::Result<T, IpamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IpamError::InvalidCidr {
            cidr: "10.0.0.0/99".to_string(),
            reason: "bad prefix".to_string(),
        };
        assert_eq!(err.to_string(), "invalid CIDR \"10.0.0.0/99\": bad prefix");

        let err = IpamError::Exhausted("10.42.0.0/30".to_string());
        assert_eq!(err.to_string(), "address pool 10.42.0.0/30 exhausted");
    }
}
