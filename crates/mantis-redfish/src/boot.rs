//! Bootable-interface classification
//!
//! A BMC reports every NIC the system has; only one of them is the
//! interface the node will PXE-boot over. The heuristics here mirror what
//! real BMC fleets expose during bring-up, applied in order with first
//! match winning.

use crate::types::EthernetInterface;

/// Does this interface look like a boot NIC?
///
/// - UEFI device path hints (`pxe`, `ipv4`, `ipv6`, `mac(`) win outright,
///   even when the interface is administratively disabled.
/// - An address obtained via DHCP is a strong signal (common during PXE).
/// - Fallback: a MAC is present and the interface is enabled or its
///   enabled state is unknown.
pub fn is_boot_candidate(nic: &EthernetInterface) -> bool {
    let uefi = nic.uefi_path().to_ascii_lowercase();
    if uefi.contains("pxe")
        || uefi.contains("ipv4")
        || uefi.contains("ipv6")
        || uefi.contains("mac(")
    {
        return true;
    }

    for addr in &nic.ipv4_addresses {
        if addr
            .address_origin
            .as_deref()
            .is_some_and(|origin| origin.eq_ignore_ascii_case("dhcp"))
        {
            return true;
        }
    }

    !nic.mac().is_empty() && nic.interface_enabled.unwrap_or(true)
}

/// Pick the bootable interfaces out of a system's NIC list.
///
/// Interfaces without a MAC are never candidates. If the heuristics match
/// nothing, the first interface carrying any MAC is taken instead. An
/// empty result means the host exposed no usable NIC at all; callers
/// report that as a warning rather than a failure.
pub fn bootable_interfaces(nics: &[EthernetInterface]) -> Vec<&EthernetInterface> {
    let bootable: Vec<&EthernetInterface> = nics
        .iter()
        .filter(|nic| !nic.mac().is_empty() && is_boot_candidate(nic))
        .collect();
    if !bootable.is_empty() {
        return bootable;
    }

    nics.iter()
        .find(|nic| !nic.mac().is_empty())
        .into_iter()
        .collect()
}
