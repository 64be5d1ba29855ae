//! Inventory document model

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, Result};

/// One managed entity: a BMC or a discovered node NIC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub xname: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub ip: String,
}

impl Entry {
    /// The address to contact this entry at: the IP when present, otherwise
    /// the xname (lab DNS resolves xnames).
    pub fn host(&self) -> &str {
        if self.ip.is_empty() {
            &self.xname
        } else {
            &self.ip
        }
    }
}

/// The persisted inventory document
///
/// `bmcs` is read-only input; `nodes` is rewritten wholesale by each
/// discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub bmcs: Vec<Entry>,
    #[serde(default)]
    pub nodes: Vec<Entry>,
}

impl Inventory {
    /// Load an inventory document from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| InventoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| InventoryError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save the document back to a YAML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let raw = serde_yaml::to_string(self).map_err(InventoryError::Serialize)?;
        std::fs::write(path, raw).map_err(|source| InventoryError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find an existing node record by xname
    pub fn find_node(&self, xname: &str) -> Option<&Entry> {
        self.nodes.iter().find(|n| n.xname == xname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_host_prefers_ip() {
        let e = Entry {
            xname: "x9000c1s0b0".to_string(),
            mac: "02:23:28:01:30:00".to_string(),
            ip: "192.168.100.1".to_string(),
        };
        assert_eq!(e.host(), "192.168.100.1");
    }

    #[test]
    fn test_entry_host_falls_back_to_xname() {
        let e = Entry {
            xname: "x9000c1s0b0".to_string(),
            mac: String::new(),
            ip: String::new(),
        };
        assert_eq!(e.host(), "x9000c1s0b0");
    }

    #[test]
    fn test_load_missing_nodes_section() {
        let yaml = "bmcs:\n  - xname: x9000c1s0b0\n    ip: 192.168.100.1\n";
        let inv: Inventory = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(inv.bmcs.len(), 1);
        assert!(inv.nodes.is_empty());
        assert_eq!(inv.bmcs[0].mac, "");
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.yaml");

        let inv = Inventory {
            bmcs: vec![Entry {
                xname: "x9000c1s0b0".to_string(),
                mac: "02:23:28:01:30:00".to_string(),
                ip: "192.168.100.1".to_string(),
            }],
            nodes: vec![Entry {
                xname: "x9000c1s0b0n0".to_string(),
                mac: "aa:bb:cc:dd:ee:ff".to_string(),
                ip: "10.42.0.2".to_string(),
            }],
        };
        inv.save(&path).unwrap();

        let restored = Inventory::load(&path).unwrap();
        assert_eq!(restored, inv);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Inventory::load("/nonexistent/inventory.yaml").unwrap_err();
        assert!(matches!(err, InventoryError::Io { .. }));
    }

    #[test]
    fn test_load_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "bmcs: {not: [a, list").unwrap();
        let err = Inventory::load(&path).unwrap_err();
        assert!(matches!(err, InventoryError::Parse { .. }));
    }

    #[test]
    fn test_find_node() {
        let inv = Inventory {
            bmcs: Vec::new(),
            nodes: vec![Entry {
                xname: "x9000c1s0b0n0".to_string(),
                mac: String::new(),
                ip: "10.42.0.2".to_string(),
            }],
        };
        assert!(inv.find_node("x9000c1s0b0n0").is_some());
        assert!(inv.find_node("x9000c1s0b1n0").is_none());
    }
}
