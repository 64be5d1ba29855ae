//! Boot NIC discovery and address assignment
//!
//! Walks every BMC in the inventory, asks it which NICs its node will
//! boot over, and assigns each one a stable address from the configured
//! subnet. BMCs are visited sequentially: allocation must be serialized,
//! and discovery is bounded by the BMC count rather than wire latency.
//!
//! Re-running against a partially populated inventory is safe: every
//! address already recorded is reserved before any new allocation, and an
//! existing node record keeps its address.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args};
use color_eyre::eyre::{bail, Result, WrapErr};
use tracing::{info, warn};

use mantis_inventory::{xname, Entry, Inventory};
use mantis_ipam::IpPool;
use mantis_redfish::boot::bootable_interfaces;
use mantis_redfish::{EthernetInterface, RedfishClient, RedfishConfig};

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Inventory file containing bmcs (nodes will be overwritten)
    #[arg(long, default_value = "inventory.yaml")]
    pub file: PathBuf,

    /// CIDR to allocate node addresses from, e.g. 10.42.0.0/24
    #[arg(long)]
    pub subnet: String,

    /// Allow insecure TLS to BMCs
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub insecure: bool,

    /// Per-BMC discovery timeout in seconds
    #[arg(long, default_value_t = 12)]
    pub timeout_secs: u64,
}

pub async fn run(args: DiscoverArgs) -> Result<()> {
    let (user, password) = super::redfish_credentials()?;

    let mut inventory = Inventory::load(&args.file)?;
    if inventory.bmcs.is_empty() {
        bail!("input must contain a non-empty bmcs list");
    }

    let pool = IpPool::new(&args.subnet)?;
    // Pre-reserve every address the node list already holds so re-runs
    // never reassign or collide.
    for node in &inventory.nodes {
        if let Ok(ip) = node.ip.parse::<Ipv4Addr>() {
            pool.reserve(ip);
        }
    }

    let timeout = Duration::from_secs(args.timeout_secs);
    let mut discovered = Vec::new();

    for bmc in &inventory.bmcs {
        let config = RedfishConfig::for_host(bmc.host(), &user, &password)
            .with_insecure(args.insecure)
            .with_timeout(timeout);
        let client = RedfishClient::new(config)?;

        let nics = match fetch_nics(&client).await {
            Ok(nics) => nics,
            Err(e) => {
                warn!(xname = %bmc.xname, error = %e, "skipping BMC");
                continue;
            }
        };

        let bootable = bootable_interfaces(&nics);
        if bootable.is_empty() {
            warn!(xname = %bmc.xname, "no NICs discovered");
            continue;
        }

        let assigned = assign_addresses(&bmc.xname, &bootable, &inventory, &pool)?;
        for entry in &assigned {
            info!(xname = %entry.xname, mac = %entry.mac, ip = %entry.ip, "node NIC recorded");
        }
        discovered.extend(assigned);
    }

    // Write back to the same file: bmcs preserved, nodes replaced.
    let count = discovered.len();
    inventory.nodes = discovered;
    inventory.save(&args.file)?;

    println!(
        "Updated {} with {} node record(s)",
        args.file.display(),
        count
    );
    Ok(())
}

async fn fetch_nics(client: &RedfishClient) -> anyhow::Result<Vec<EthernetInterface>> {
    let system_path = client.first_system_path().await?;
    Ok(client.list_ethernet_interfaces(&system_path).await?)
}

/// Build node records for one BMC's bootable NICs, reusing addresses the
/// existing node list already assigned.
///
/// Pool exhaustion is fatal: continuing would silently skip a node.
fn assign_addresses(
    bmc_xname: &str,
    bootable: &[&EthernetInterface],
    inventory: &Inventory,
    pool: &IpPool,
) -> Result<Vec<Entry>> {
    let mut out = Vec::new();
    for (idx, nic) in bootable.iter().enumerate() {
        let mut node_xname = xname::node_xname(bmc_xname);
        if bootable.len() > 1 {
            node_xname = format!("{}-pxe{}", node_xname, idx + 1);
        }

        let existing_ip = inventory
            .find_node(&node_xname)
            .and_then(|n| n.ip.parse::<Ipv4Addr>().ok());
        let ip = match existing_ip {
            Some(ip) => {
                // Make sure the pool knows it's taken
                pool.reserve(ip);
                ip.to_string()
            }
            None => pool
                .next()
                .wrap_err_with(|| format!("allocating address for {node_xname}"))?
                .to_string(),
        };

        out.push(Entry {
            xname: node_xname,
            mac: nic.mac().to_lowercase(),
            ip,
        });
    }
    Ok(out)
}
