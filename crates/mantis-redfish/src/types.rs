//! Redfish response shapes
//!
//! Only the fields Mantis consumes are modeled; decoding tolerates absent
//! optional fields so the same types work across BMC vendors.

use serde::Deserialize;

/// Generic Redfish resource collection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Collection {
    #[serde(rename = "Members", default)]
    pub members: Vec<OdataRef>,
}

/// Reference to another resource by odata id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OdataRef {
    #[serde(rename = "@odata.id", default)]
    pub odata_id: String,
}

/// One ethernet interface under a system resource
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EthernetInterface {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "InterfaceEnabled")]
    pub interface_enabled: Option<bool>,
    #[serde(rename = "MACAddress")]
    pub mac_address: Option<String>,
    #[serde(rename = "UefiDevicePath")]
    pub uefi_device_path: Option<String>,
    #[serde(rename = "IPv4Addresses", default)]
    pub ipv4_addresses: Vec<Ipv4Address>,
}

impl EthernetInterface {
    /// The interface MAC, empty when the BMC reported none
    pub fn mac(&self) -> &str {
        self.mac_address.as_deref().unwrap_or("")
    }

    /// The UEFI device path, empty when the BMC reported none
    pub fn uefi_path(&self) -> &str {
        self.uefi_device_path.as_deref().unwrap_or("")
    }
}

/// One address on an ethernet interface
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ipv4Address {
    #[serde(rename = "Address")]
    pub address: Option<String>,
    #[serde(rename = "AddressOrigin")]
    pub address_origin: Option<String>,
}

/// One firmware-inventory resource
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FirmwareInventory {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Version", default)]
    pub version: String,
    #[serde(rename = "Updateable", default)]
    pub updateable: bool,
    #[serde(rename = "Status", default)]
    pub status: ResourceStatus,
}

impl FirmwareInventory {
    /// Heuristic: does this resource look like an update is underway?
    ///
    /// True when the status state is anything other than `Enabled`/`OK`,
    /// or any condition mentions updating/installing/running, or any
    /// condition carries Warning/Critical severity.
    pub fn update_in_progress(&self) -> bool {
        if let Some(state) = self.status.state.as_deref() {
            let state = state.to_ascii_lowercase();
            if !state.is_empty() && state != "enabled" && state != "ok" {
                return true;
            }
        }
        for condition in &self.status.conditions {
            let message = condition.message.to_ascii_lowercase();
            if message.contains("updat")
                || message.contains("in progress")
                || message.contains("install")
                || message.contains("running")
            {
                return true;
            }
            if condition.severity == "Warning" || condition.severity == "Critical" {
                return true;
            }
        }
        false
    }
}

/// Resource status block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceStatus {
    #[serde(rename = "State")]
    pub state: Option<String>,
    #[serde(rename = "Health")]
    pub health: Option<String>,
    #[serde(rename = "Conditions", default)]
    pub conditions: Vec<Condition>,
}

/// One status condition reported by the controller
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Condition {
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "Severity", default)]
    pub severity: String,
}

/// Acknowledgment of a submitted update action.
///
/// Carries the task monitor location when the BMC provided one; Mantis
/// does not poll it.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    pub location: Option<String>,
}
