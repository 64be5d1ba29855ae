//! Mantis fleet dispatch
//!
//! Runs one operation against every host in a target set with parallelism
//! bounded by a batch size, isolating each host's failures and slowness
//! from the rest of the fleet. A companion report type merges per-host
//! results behind a single synchronized entry point.
//!
//! # Example
//!
//! ```
//! use mantis_fleet::Dispatcher;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), mantis_fleet::FleetError> {
//! let dispatcher = Dispatcher::new(4).with_timeout(Duration::from_secs(12));
//! let results = dispatcher
//!     .run(vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()], |host| async move {
//!         // query the host here
//!         Ok(format!("ok from {host}"))
//!     })
//!     .await?;
//! assert_eq!(results.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod dispatcher;
pub mod error;
pub mod report;

pub use dispatcher::{Dispatcher, TaskResult};
pub use error::{FleetError, TaskError};
pub use report::{StatusReport, StatusSample, StatusSummary};
