//! Mantis Redfish client
//!
//! A deliberately small Redfish client covering exactly the interactions
//! Mantis needs against a BMC:
//!
//! - resolve the first `Systems` resource path
//! - list and decode the system's ethernet interfaces
//! - fetch one firmware-inventory resource
//! - submit a `SimpleUpdate` action
//!
//! There is no session handling and no task polling; every call is a
//! single authenticated request (plus member fetches for collections), and
//! the client carries nothing but its transport configuration.
//!
//! The [`boot`] module holds the heuristic that picks a node's bootable
//! NIC out of the decoded interface records.

pub mod boot;
pub mod client;
pub mod error;
pub mod types;

pub use client::{RedfishClient, RedfishConfig};
pub use error::{RedfishError, Result};
pub use types::{
    Collection, Condition, EthernetInterface, FirmwareInventory, Ipv4Address, OdataRef,
    ResourceStatus, TaskHandle,
};
