//! Mantis IP address pool
//!
//! A single-prefix IPv4 allocator built for idempotent re-runs: addresses
//! already recorded in the inventory are reserved up front, so a repeated
//! discovery pass never reassigns or collides with an address that is
//! already in use.
//!
//! # Example
//!
//! ```
//! use mantis_ipam::IpPool;
//!
//! let pool = IpPool::new("10.42.0.0/24").unwrap();
//! // .1 is held back as the gateway, so allocation starts at .2
//! let first = pool.next().unwrap();
//! assert_eq!(first.to_string(), "10.42.0.2");
//!
//! // Reserving an address keeps it out of circulation
//! pool.reserve("10.42.0.3".parse().unwrap());
//! assert_eq!(pool.next().unwrap().to_string(), "10.42.0.4");
//! ```

pub mod error;
pub mod pool;

pub use error::{IpamError, Result};
pub use pool::IpPool;
