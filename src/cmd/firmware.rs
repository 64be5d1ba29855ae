//! Fleet-wide firmware operations
//!
//! `status` sweeps the fleet for a point-in-time summary of firmware
//! versions and in-progress updates; `update` triggers a SimpleUpdate on
//! every targeted BMC. Both fan out through the fleet dispatcher with a
//! bounded batch size, so one slow or dead BMC never stalls the rest.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Subcommand};
use color_eyre::eyre::{bail, Result};

use mantis_fleet::{Dispatcher, StatusReport, StatusSample};
use mantis_inventory::Inventory;
use mantis_redfish::{RedfishClient, RedfishConfig};

#[derive(Subcommand, Debug)]
pub enum FirmwareCommand {
    /// Query BMC firmware versions and in-progress updates
    Status(StatusArgs),
    /// Trigger a firmware update across the fleet
    Update(UpdateArgs),
}

/// Host and dispatch selection shared by the firmware subcommands
#[derive(Args, Debug, Clone)]
pub struct FleetArgs {
    /// Inventory file listing the BMCs to target
    #[arg(long, default_value = "inventory.yaml")]
    pub file: PathBuf,

    /// Comma-separated host list, overriding the inventory
    #[arg(long)]
    pub hosts: Option<String>,

    /// Firmware target set to query: bmc or bios
    #[arg(long = "type", default_value = "bmc")]
    pub kind: String,

    /// Explicit firmware-inventory resource paths (overrides --type)
    #[arg(long = "target")]
    pub targets: Vec<String>,

    /// Maximum BMCs contacted in parallel
    #[arg(long, default_value_t = 4)]
    pub batch_size: usize,

    /// Per-BMC timeout in seconds (0 disables the timeout)
    #[arg(long, default_value_t = 12)]
    pub timeout_secs: u64,

    /// Allow insecure TLS to BMCs
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub insecure: bool,
}

impl FleetArgs {
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub fleet: FleetArgs,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub fleet: FleetArgs,

    /// Image URI the BMCs pull the firmware from
    #[arg(long)]
    pub image_uri: String,

    /// Transfer protocol passed with the update action
    #[arg(long, default_value = "HTTP")]
    pub protocol: String,

    /// Skip hosts already reporting this version
    #[arg(long)]
    pub expected_version: Option<String>,

    /// Update even when a host already reports the expected version
    #[arg(long)]
    pub force: bool,

    /// Print what would happen without submitting anything
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(command: FirmwareCommand) -> Result<()> {
    match command {
        FirmwareCommand::Status(args) => status(args).await,
        FirmwareCommand::Update(args) => update(args).await,
    }
}

/// Hosts to target: the --hosts CSV when given, else every BMC in the
/// inventory
fn resolve_hosts(fleet: &FleetArgs) -> Result<Vec<String>> {
    if let Some(csv) = &fleet.hosts {
        let hosts: Vec<String> = csv
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(String::from)
            .collect();
        if hosts.is_empty() {
            bail!("--hosts contained no usable entries");
        }
        return Ok(hosts);
    }

    let inventory = Inventory::load(&fleet.file)?;
    if inventory.bmcs.is_empty() {
        bail!("input must contain a non-empty bmcs list");
    }
    Ok(inventory.bmcs.iter().map(|b| b.host().to_string()).collect())
}

fn resolve_targets(fleet: &FleetArgs) -> Result<Vec<String>> {
    if !fleet.targets.is_empty() {
        return Ok(fleet.targets.clone());
    }
    default_targets(&fleet.kind)
}

fn default_targets(kind: &str) -> Result<Vec<String>> {
    match kind {
        "bmc" => Ok(vec![
            "/redfish/v1/UpdateService/FirmwareInventory/BMC".to_string(),
        ]),
        "bios" => Ok(vec![
            "/redfish/v1/UpdateService/FirmwareInventory/BIOS".to_string(),
        ]),
        other => bail!("unknown firmware type {other:?}, expected bmc or bios"),
    }
}

fn client_for(host: &str, user: &str, password: &str, fleet_timeout: Duration, insecure: bool) -> mantis_redfish::Result<RedfishClient> {
    RedfishClient::new(
        RedfishConfig::for_host(host, user, password)
            .with_insecure(insecure)
            .with_timeout(fleet_timeout),
    )
}

async fn status(args: StatusArgs) -> Result<()> {
    let (user, password) = super::redfish_credentials()?;
    let hosts = resolve_hosts(&args.fleet)?;
    let targets = resolve_targets(&args.fleet)?;

    let timeout = args.fleet.timeout();
    let insecure = args.fleet.insecure;
    let dispatcher = Dispatcher::new(args.fleet.batch_size).with_timeout(timeout);

    let results = dispatcher
        .run(hosts, move |host| {
            let user = user.clone();
            let password = password.clone();
            let targets = targets.clone();
            async move {
                let client = client_for(&host, &user, &password, timeout, insecure)?;

                // Summarize the host by the first target that answers;
                // any target may flip the in-progress flag.
                let mut version = String::new();
                let mut in_progress = false;
                let mut answered = false;
                let mut last_err = None;
                for target in &targets {
                    match client.firmware_inventory(target).await {
                        Ok(inv) => {
                            answered = true;
                            if version.is_empty() {
                                version = inv.version.clone();
                            }
                            if inv.update_in_progress() {
                                in_progress = true;
                            }
                        }
                        Err(e) => last_err = Some(e),
                    }
                }

                if !answered {
                    match last_err {
                        Some(e) => return Err(e.into()),
                        None => anyhow::bail!("no firmware targets queried"),
                    }
                }
                Ok(StatusSample {
                    version,
                    in_progress,
                })
            }
        })
        .await?;

    let report = StatusReport::new();
    for result in &results {
        report.record(result);
    }
    print!("{}", report.snapshot());
    Ok(())
}

/// Per-host outcome of an update sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateOutcome {
    Triggered,
    Skipped,
}

async fn update(args: UpdateArgs) -> Result<()> {
    let (user, password) = super::redfish_credentials()?;
    let hosts = resolve_hosts(&args.fleet)?;
    let targets = resolve_targets(&args.fleet)?;

    if args.dry_run {
        for host in &hosts {
            println!(
                "[dry-run] would trigger firmware update on {}: image-uri={} protocol={} targets={} expected-version={}",
                host,
                args.image_uri,
                args.protocol,
                targets.join(","),
                args.expected_version.as_deref().unwrap_or("(any)"),
            );
        }
        println!("Dry run complete: {} host(s), nothing submitted", hosts.len());
        return Ok(());
    }

    let timeout = args.fleet.timeout();
    let insecure = args.fleet.insecure;
    let dispatcher = Dispatcher::new(args.fleet.batch_size).with_timeout(timeout);

    let image_uri = args.image_uri.clone();
    let protocol = args.protocol.clone();
    let expected_version = args.expected_version.clone();
    let force = args.force;

    let results = dispatcher
        .run(hosts, move |host| {
            let user = user.clone();
            let password = password.clone();
            let targets = targets.clone();
            let image_uri = image_uri.clone();
            let protocol = protocol.clone();
            let expected_version = expected_version.clone();
            async move {
                let client = client_for(&host, &user, &password, timeout, insecure)?;

                if let Some(expected) = expected_version.filter(|_| !force) {
                    // Best-effort pre-check; a failed read falls through to
                    // the update itself.
                    if let Some(target) = targets.first() {
                        if let Ok(inv) = client.firmware_inventory(target).await {
                            if inv.version == expected {
                                println!("{host}: already at {expected}, skipping");
                                return Ok(UpdateOutcome::Skipped);
                            }
                        }
                    }
                }

                client
                    .simple_update(&image_uri, &protocol, &targets)
                    .await?;
                println!("Triggered firmware update on {host}");
                Ok(UpdateOutcome::Triggered)
            }
        })
        .await?;

    let mut triggered = 0usize;
    let mut skipped = 0usize;
    let mut failures = BTreeMap::new();
    for result in results {
        match result.outcome {
            Ok(UpdateOutcome::Triggered) => triggered += 1,
            Ok(UpdateOutcome::Skipped) => skipped += 1,
            Err(e) => {
                failures.insert(result.host, e.to_string());
            }
        }
    }

    println!("Firmware update summary:");
    println!("  Triggered: {triggered}");
    println!("  Skipped: {skipped}");
    println!("  Failed: {}", failures.len());
    for (host, cause) in &failures {
        println!("    {host}: {cause}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet() -> FleetArgs {
        FleetArgs {
            file: PathBuf::from("inventory.yaml"),
            hosts: None,
            kind: "bmc".to_string(),
            targets: Vec::new(),
            batch_size: 4,
            timeout_secs: 12,
            insecure: true,
        }
    }

    #[test]
    fn test_default_targets() {
        assert_eq!(
            default_targets("bmc").unwrap(),
            vec!["/redfish/v1/UpdateService/FirmwareInventory/BMC".to_string()]
        );
        assert_eq!(
            default_targets("bios").unwrap(),
            vec!["/redfish/v1/UpdateService/FirmwareInventory/BIOS".to_string()]
        );
        assert!(default_targets("toaster").is_err());
    }

    #[test]
    fn test_explicit_targets_override_type() {
        let mut args = fleet();
        args.targets = vec!["/redfish/v1/UpdateService/FirmwareInventory/NIC".to_string()];
        args.kind = "toaster".to_string();
        assert_eq!(resolve_targets(&args).unwrap(), args.targets);
    }

    #[test]
    fn test_hosts_csv_parsing() {
        let mut args = fleet();
        args.hosts = Some(" 10.1.1.10 , ,10.1.1.11,".to_string());
        assert_eq!(
            resolve_hosts(&args).unwrap(),
            vec!["10.1.1.10".to_string(), "10.1.1.11".to_string()]
        );
    }

    #[test]
    fn test_hosts_csv_all_blank_is_an_error() {
        let mut args = fleet();
        args.hosts = Some(" , ,".to_string());
        assert!(resolve_hosts(&args).is_err());
    }
}
