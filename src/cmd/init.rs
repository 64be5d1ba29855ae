//! Initial BMC inventory generation
//!
//! Synthesizes the management-controller list from the chassis layout:
//! one BMC per `nodes-per-bmc` nodes, addressed sequentially inside the
//! BMC subnet. The generated file is the input for every other command.

use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::{bail, Result};

use mantis_inventory::{xname, Entry, Inventory};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Inventory file to write
    #[arg(long, default_value = "inventory.yaml")]
    pub file: PathBuf,

    /// Comma-separated chassis=macprefix list
    #[arg(long, default_value = "x9000c1=02:23:28:01,x9000c3=02:23:28:03")]
    pub chassis: String,

    /// BMC subnet base without the last octet, e.g. 192.168.100
    #[arg(long, default_value = "192.168.100")]
    pub bmc_subnet: String,

    /// Number of nodes per chassis
    #[arg(long, default_value_t = 32)]
    pub nodes_per_chassis: u32,

    /// Number of nodes managed by each BMC
    #[arg(long, default_value_t = 2)]
    pub nodes_per_bmc: u32,

    /// Starting node id (1-based)
    #[arg(long, default_value_t = 1)]
    pub start_nid: u32,
}

pub fn run(args: InitArgs) -> Result<()> {
    let chassis = xname::parse_chassis_spec(&args.chassis);
    if chassis.is_empty() {
        bail!("--chassis must specify at least one entry, e.g. x9000c1=02:23:28:01");
    }
    if args.bmc_subnet.matches('.').count() != 2 {
        bail!("--bmc-subnet must be a base with three octets, e.g. 192.168.100");
    }
    if args.nodes_per_bmc == 0 {
        bail!("--nodes-per-bmc must be at least 1");
    }

    let bmcs = generate_bmcs(&args, &chassis);
    let count = bmcs.len();
    let inventory = Inventory {
        bmcs,
        nodes: Vec::new(),
    };
    inventory.save(&args.file)?;

    println!(
        "Wrote initial BMC inventory to {} with {} entries",
        args.file.display(),
        count
    );
    Ok(())
}

/// Walk each chassis's nodes in steps of nodes-per-bmc, placing one BMC
/// per step
fn generate_bmcs(args: &InitArgs, chassis: &[(String, String)]) -> Vec<Entry> {
    let mut bmcs = Vec::new();
    let mut nid = args.start_nid;
    for (chassis_name, mac_prefix) in chassis {
        let mut n = nid;
        while n < nid + args.nodes_per_chassis {
            bmcs.push(Entry {
                xname: xname::bmc_xname(chassis_name, n),
                mac: xname::bmc_mac(mac_prefix, n).to_lowercase(),
                ip: format!("{}.{}", args.bmc_subnet, xname::bmc_id(n)),
            });
            n += args.nodes_per_bmc;
        }
        nid += args.nodes_per_chassis;
    }
    bmcs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(chassis: &str, nodes_per_chassis: u32, nodes_per_bmc: u32) -> InitArgs {
        InitArgs {
            file: PathBuf::from("unused.yaml"),
            chassis: chassis.to_string(),
            bmc_subnet: "192.168.100".to_string(),
            nodes_per_chassis,
            nodes_per_bmc,
            start_nid: 1,
        }
    }

    #[test]
    fn test_generate_one_bmc_per_node_pair() {
        let a = args("x9000c1=02:23:28:01", 32, 2);
        let chassis = xname::parse_chassis_spec(&a.chassis);
        let bmcs = generate_bmcs(&a, &chassis);

        assert_eq!(bmcs.len(), 16);
        assert_eq!(bmcs[0].xname, "x9000c1s0b0");
        assert_eq!(bmcs[0].ip, "192.168.100.1");
        assert_eq!(bmcs[0].mac, "02:23:28:01:30:00");
        // Node 3 sits on the second blade of slot 0, BMC id 2
        assert_eq!(bmcs[1].xname, "x9000c1s0b1");
        assert_eq!(bmcs[1].ip, "192.168.100.2");
    }

    #[test]
    fn test_generate_continues_nids_across_chassis() {
        let a = args("x9000c1=02:23:28:01,x9000c3=02:23:28:03", 32, 2);
        let chassis = xname::parse_chassis_spec(&a.chassis);
        let bmcs = generate_bmcs(&a, &chassis);

        assert_eq!(bmcs.len(), 32);
        // Second chassis starts at nid 33: slot 0, blade 0, BMC id 17
        assert_eq!(bmcs[16].xname, "x9000c3s0b0");
        assert_eq!(bmcs[16].ip, "192.168.100.17");
    }

    #[test]
    fn test_generated_macs_are_lowercase() {
        let a = args("x9000c1=02:23:28:0A", 4, 2);
        let chassis = xname::parse_chassis_spec(&a.chassis);
        let bmcs = generate_bmcs(&a, &chassis);
        for bmc in &bmcs {
            assert_eq!(bmc.mac, bmc.mac.to_lowercase());
        }
    }
}
