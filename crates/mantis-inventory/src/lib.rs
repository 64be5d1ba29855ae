//! Mantis inventory
//!
//! The inventory is a single YAML document with two sections:
//!
//! - `bmcs`: the management controllers we query (input, authoritative)
//! - `nodes`: discovered bootable node NICs (output, replaced by discovery)
//!
//! Both sections use the same three fields: xname, mac, ip. This crate owns
//! loading and saving the document plus the xname/MAC arithmetic used to
//! synthesize the initial BMC inventory from a chassis layout.

pub mod error;
pub mod model;
pub mod xname;

pub use error::{InventoryError, Result};
pub use model::{Entry, Inventory};
