// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Advisory check that the prefixes BGP has valid routes for made it to the RIB of zebra and,
//! for the default VRF, to the main table of the kernel.

use ipnet::IpNet;
use model::bgp::DEFAULT_VRF;
use model::rib::RibVrfs;
use model::{Vrf, Vrfs};
use std::collections::BTreeSet;
use std::fmt::Display;
use tracing::debug;

/// Whether a prefix was found in some table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Presence {
    Present,
    Missing,
    /// The table could not be observed
    Unknown,
}

impl Display for Presence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Presence::Present => write!(f, "present"),
            Presence::Missing => write!(f, "missing"),
            Presence::Unknown => write!(f, "unknown"),
        }
    }
}

impl Presence {
    fn of(found: Option<bool>) -> Self {
        match found {
            Some(true) => Presence::Present,
            Some(false) => Presence::Missing,
            None => Presence::Unknown,
        }
    }
}

/// A prefix BGP has a valid route for, but which is missing from the RIB or the kernel
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct InstallFinding {
    pub vrf: String,
    pub prefix: IpNet,
    pub rib: Presence,
    pub kernel: Presence,
}

impl Display for InstallFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VRF:{} Prefix:{} rib:{} kernel:{}",
            self.vrf, self.prefix, self.rib, self.kernel
        )
    }
}

/// Parse a prefix and clear its host bits, so that `10.1.0.1/24` and `10.1.0.0/24` compare equal
fn normalize(prefix: &str) -> Option<IpNet> {
    prefix.parse::<IpNet>().ok().map(|net| net.trunc())
}

/// Normalized prefixes of the RIB of a VRF, if the RIB of that VRF was observed
fn rib_prefixes(rib: Option<&RibVrfs>, vrf: &str) -> Option<BTreeSet<IpNet>> {
    let table = rib?.get(vrf)?;
    Some(table.keys().filter_map(|p| normalize(p)).collect())
}

/// Check the valid BGP prefixes of every VRF against the RIB and the kernel.
///
/// `rib` holds the RIBs of all VRFs; a VRF absent from it has unknown RIB presence.
/// `kernel_main` holds the prefixes of the kernel main table, which only covers the default
/// VRF; kernel presence of other VRFs is unknown. Only prefixes missing from at least one of
/// the two tables are reported.
#[must_use]
pub fn check_install(
    vrfs: &Vrfs,
    rib: Option<&RibVrfs>,
    kernel_main: Option<&BTreeSet<IpNet>>,
) -> Vec<InstallFinding> {
    let mut findings = Vec::new();
    for (key, vrf) in vrfs {
        let name = vrf.name_or(key);
        findings.extend(check_vrf(name, vrf, rib, kernel_main));
    }
    findings.sort();
    findings
}

fn check_vrf(
    name: &str,
    vrf: &Vrf,
    rib: Option<&RibVrfs>,
    kernel_main: Option<&BTreeSet<IpNet>>,
) -> Vec<InstallFinding> {
    let in_rib = rib_prefixes(rib, name);
    let in_kernel = if name == DEFAULT_VRF { kernel_main } else { None };
    let mut findings = Vec::new();
    for prefix in vrf.valid_prefixes() {
        let Some(prefix) = normalize(prefix) else {
            debug!("Ignoring unparsable prefix '{prefix}' of VRF {name}");
            continue;
        };
        let rib = Presence::of(in_rib.as_ref().map(|p| p.contains(&prefix)));
        let kernel = Presence::of(in_kernel.map(|p| p.contains(&prefix)));
        if rib == Presence::Missing || kernel == Presence::Missing {
            findings.push(InstallFinding {
                vrf: name.to_owned(),
                prefix,
                rib,
                kernel,
            });
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::bgp::Route;
    use model::rib::{RibRoute, RibTable};
    use pretty_assertions::assert_eq;

    fn vrf(name: &str, prefixes: &[(&str, bool)]) -> (String, Vrf) {
        let routes = prefixes
            .iter()
            .map(|(prefix, valid)| {
                (
                    (*prefix).to_string(),
                    vec![Route {
                        valid: *valid,
                        ..Default::default()
                    }],
                )
            })
            .collect();
        let vrf = Vrf {
            vrf_name: name.to_string(),
            routes,
            ..Default::default()
        };
        (name.to_string(), vrf)
    }

    fn rib_table(prefixes: &[&str]) -> RibTable {
        prefixes
            .iter()
            .map(|p| {
                (
                    (*p).to_string(),
                    vec![RibRoute {
                        prefix: (*p).to_string(),
                        installed: true,
                        ..Default::default()
                    }],
                )
            })
            .collect()
    }

    fn net(s: &str) -> IpNet {
        s.parse().unwrap()
    }

    #[test]
    fn everything_installed() {
        let vrfs = Vrfs::from([
            vrf("default", &[("10.0.0.0/24", true)]),
            vrf("vrf100", &[("10.100.0.0/24", true)]),
        ]);
        let rib = RibVrfs::from([
            ("default".to_string(), rib_table(&["10.0.0.0/24"])),
            ("vrf100".to_string(), rib_table(&["10.100.0.0/24"])),
        ]);
        let kernel = BTreeSet::from([net("10.0.0.0/24")]);
        assert!(check_install(&vrfs, Some(&rib), Some(&kernel)).is_empty());
    }

    #[test]
    fn missing_from_rib() {
        let vrfs = Vrfs::from([vrf(
            "vrf100",
            &[("10.100.0.0/24", true), ("10.101.0.0/24", true)],
        )]);
        let rib = RibVrfs::from([("vrf100".to_string(), rib_table(&["10.100.0.0/24"]))]);
        assert_eq!(
            check_install(&vrfs, Some(&rib), None),
            vec![InstallFinding {
                vrf: "vrf100".to_string(),
                prefix: net("10.101.0.0/24"),
                rib: Presence::Missing,
                kernel: Presence::Unknown,
            }]
        );
    }

    #[test]
    fn missing_from_kernel() {
        let vrfs = Vrfs::from([vrf("default", &[("10.0.0.0/24", true)])]);
        let rib = RibVrfs::from([("default".to_string(), rib_table(&["10.0.0.0/24"]))]);
        let findings = check_install(&vrfs, Some(&rib), Some(&BTreeSet::new()));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rib, Presence::Present);
        assert_eq!(findings[0].kernel, Presence::Missing);
        assert_eq!(
            findings[0].to_string(),
            "VRF:default Prefix:10.0.0.0/24 rib:present kernel:missing"
        );
    }

    #[test]
    fn unobserved_tables_are_unknown() {
        let vrfs = Vrfs::from([
            vrf("default", &[("10.0.0.0/24", true)]),
            vrf("vrf100", &[("10.100.0.0/24", true)]),
        ]);
        // nothing observed: nothing can be reported missing
        assert!(check_install(&vrfs, None, None).is_empty());
        // the RIB of vrf100 was not reported
        let rib = RibVrfs::from([("default".to_string(), rib_table(&["10.0.0.0/24"]))]);
        assert!(check_install(&vrfs, Some(&rib), None).is_empty());
        // the kernel table does not cover vrf100
        let rib = RibVrfs::from([("vrf100".to_string(), rib_table(&["10.100.0.0/24"]))]);
        let kernel = BTreeSet::new();
        let findings = check_install(&vrfs, Some(&rib), Some(&kernel));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].vrf, "default");
        assert_eq!(findings[0].rib, Presence::Unknown);
        assert_eq!(findings[0].kernel, Presence::Missing);
    }

    #[test]
    fn invalid_routes_are_not_checked() {
        let vrfs = Vrfs::from([vrf("vrf100", &[("10.100.0.0/24", false)])]);
        let rib = RibVrfs::from([("vrf100".to_string(), RibTable::new())]);
        assert!(check_install(&vrfs, Some(&rib), None).is_empty());
    }

    #[test]
    fn prefixes_are_normalized() {
        let vrfs = Vrfs::from([vrf("vrf100", &[("10.100.0.1/24", true), ("bogus", true)])]);
        let rib = RibVrfs::from([("vrf100".to_string(), rib_table(&["10.100.0.0/24"]))]);
        assert!(check_install(&vrfs, Some(&rib), None).is_empty());
    }
}
