//! Cluster topology naming
//!
//! Xnames encode a component's position in the cluster: chassis, blade
//! slot, BMC, node. The arithmetic below mirrors the rack layout rules:
//! 4 nodes per blade slot, 8 slots per chassis, 2 nodes behind each BMC.

/// BMC ordinal for node `n` (1-based): two nodes share a BMC
pub fn bmc_id(n: u32) -> u32 {
    (n + 1) / 2
}

/// Blade slot within the chassis for node `n`
pub fn slot(n: u32) -> u32 {
    ((n - 1) / 4) % 8
}

/// Blade position within the slot for node `n`
pub fn blade(n: u32) -> u32 {
    ((n - 1) / 2) % 2
}

/// NodeBMC xname: chassis + "s<slot>b<blade>"
pub fn bmc_xname(chassis: &str, n: u32) -> String {
    format!("{}s{}b{}", chassis, slot(n), blade(n))
}

/// BMC MAC address synthesized from the chassis MAC prefix and node id
pub fn bmc_mac(mac_prefix: &str, n: u32) -> String {
    format!("{}:3{}:{}0", mac_prefix, slot(n), blade(n))
}

/// Node xname behind a NodeBMC: the BMC manages node 0 of its position
pub fn node_xname(bmc_xname: &str) -> String {
    format!("{}n0", bmc_xname)
}

/// Parse a comma-separated `chassis=macprefix` list into ordered pairs.
///
/// Blank or malformed entries are skipped. Order is preserved so generated
/// inventories are stable run to run.
pub fn parse_chassis_spec(spec: &str) -> Vec<(String, String)> {
    spec.split(',')
        .filter_map(|part| {
            let part = part.trim();
            let (chassis, prefix) = part.split_once('=')?;
            let chassis = chassis.trim();
            let prefix = prefix.trim();
            if chassis.is_empty() || prefix.is_empty() {
                return None;
            }
            Some((chassis.to_string(), prefix.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmc_id_pairs_nodes() {
        assert_eq!(bmc_id(1), 1);
        assert_eq!(bmc_id(2), 1);
        assert_eq!(bmc_id(3), 2);
        assert_eq!(bmc_id(4), 2);
        assert_eq!(bmc_id(32), 16);
    }

    #[test]
    fn test_slot_and_blade_layout() {
        // First four nodes share slot 0
        assert_eq!(slot(1), 0);
        assert_eq!(slot(4), 0);
        assert_eq!(slot(5), 1);
        assert_eq!(slot(32), 7);
        // Slot wraps per chassis of 32
        assert_eq!(slot(33), 0);

        assert_eq!(blade(1), 0);
        assert_eq!(blade(2), 0);
        assert_eq!(blade(3), 1);
        assert_eq!(blade(4), 1);
        assert_eq!(blade(5), 0);
    }

    #[test]
    fn test_bmc_xname_format() {
        assert_eq!(bmc_xname("x9000c1", 1), "x9000c1s0b0");
        assert_eq!(bmc_xname("x9000c1", 3), "x9000c1s0b1");
        assert_eq!(bmc_xname("x9000c3", 5), "x9000c3s1b0");
    }

    #[test]
    fn test_bmc_mac_format() {
        assert_eq!(bmc_mac("02:23:28:01", 1), "02:23:28:01:30:00");
        assert_eq!(bmc_mac("02:23:28:01", 3), "02:23:28:01:30:10");
        assert_eq!(bmc_mac("02:23:28:01", 5), "02:23:28:01:31:00");
    }

    #[test]
    fn test_node_xname() {
        assert_eq!(node_xname("x9000c1s0b0"), "x9000c1s0b0n0");
    }

    #[test]
    fn test_parse_chassis_spec() {
        let pairs = parse_chassis_spec("x9000c1=02:23:28:01,x9000c3=02:23:28:03");
        assert_eq!(
            pairs,
            vec![
                ("x9000c1".to_string(), "02:23:28:01".to_string()),
                ("x9000c3".to_string(), "02:23:28:03".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_chassis_spec_skips_malformed() {
        let pairs = parse_chassis_spec(" x9000c1 = 02:23:28:01 ,, nonsense , =02 , x9000c5= ");
        assert_eq!(
            pairs,
            vec![("x9000c1".to_string(), "02:23:28:01".to_string())]
        );
    }

    #[test]
    fn test_parse_chassis_spec_empty() {
        assert!(parse_chassis_spec("").is_empty());
        assert!(parse_chassis_spec("   ").is_empty());
    }
}
