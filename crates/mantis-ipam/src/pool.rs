//! CIDR-backed address pool

use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::sync::Mutex;

use ipnetwork::Ipv4Network;

use crate::error::{IpamError, Result};

/// An IPv4 address pool over one CIDR prefix.
///
/// The network address, broadcast address, and first usable host address
/// (conventionally the gateway) are acquired at creation and never handed
/// out. The acquired set only grows for the lifetime of the pool; there is
/// no release operation.
///
/// All methods take `&self`: the acquired set lives behind a mutex so the
/// pool stays correct if allocation ever runs from concurrent tasks.
#[derive(Debug)]
pub struct IpPool {
    network: Ipv4Network,
    acquired: Mutex<BTreeSet<u32>>,
}

impl IpPool {
    /// Create a pool over `cidr`, e.g. `10.42.0.0/24`.
    ///
    /// Fails on a malformed CIDR string or a /0 prefix.
    pub fn new(cidr: &str) -> Result<Self> {
        let network: Ipv4Network = cidr.parse().map_err(|e| IpamError::InvalidCidr {
            cidr: cidr.to_string(),
            reason: format!("{e}"),
        })?;
        if network.prefix() == 0 {
            return Err(IpamError::InvalidCidr {
                cidr: cidr.to_string(),
                reason: "prefix length must be non-zero".to_string(),
            });
        }

        let net = u32::from(network.network());
        let bcast = u32::from(network.broadcast());

        let mut acquired = BTreeSet::new();
        acquired.insert(net);
        acquired.insert(bcast);
        // Hold back the first usable host: it is conventionally the gateway.
        if net + 1 < bcast {
            acquired.insert(net + 1);
        }

        Ok(Self {
            network,
            acquired: Mutex::new(acquired),
        })
    }

    /// The prefix this pool allocates from
    pub fn network(&self) -> Ipv4Network {
        self.network
    }

    /// Mark `addr` as acquired.
    ///
    /// Best-effort by policy: reserving an address that is out of range or
    /// already acquired is a silent no-op. Used to pre-claim addresses the
    /// inventory already trusts before any new allocation happens.
    pub fn reserve(&self, addr: Ipv4Addr) {
        if !self.network.contains(addr) {
            return;
        }
        self.acquired
            .lock()
            .expect("ipam lock poisoned")
            .insert(u32::from(addr));
    }

    /// Hand out the lowest-numbered unacquired address in the prefix.
    ///
    /// Selection and acquisition happen under one lock acquisition, so two
    /// concurrent callers can never observe the same address as free.
    pub fn next(&self) -> Result<Ipv4Addr> {
        let mut acquired = self.acquired.lock().expect("ipam lock poisoned");

        let net = u32::from(self.network.network());
        let bcast = u32::from(self.network.broadcast());
        for candidate in net..=bcast {
            if !acquired.contains(&candidate) {
                acquired.insert(candidate);
                return Ok(Ipv4Addr::from(candidate));
            }
        }
        Err(IpamError::Exhausted(self.network.to_string()))
    }
}
