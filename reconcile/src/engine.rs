// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Cross-check of the next-hops of BGP routes in EVPN VRFs against the EVPN next-hop tables.
//!
//! Traffic towards a next-hop of an EVPN VRF is VxLAN-encapsulated with the router MAC of the
//! remote VTEP as inner destination MAC. If zebra has no entry for the next-hop in the table of
//! the VNI, or an entry with no usable router MAC, that traffic is silently dropped.

use derive_builder::Builder;
use model::bgp::DEFAULT_VRF;
use model::{EvpnNexthops, MacError, VniId, Vrf, Vrfs};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::net::IpAddr;
use tracing::{debug, warn};

use crate::mapping::VniMapping;

/// Why a next-hop was flagged
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Reason {
    /// The table of the VNI has no entry for the next-hop, or there is no table for the VNI
    NotFound,
    /// The entry of the next-hop has this unusable router MAC
    InvalidMac(String),
}

/// A next-hop of a VRF that traffic can't be encapsulated towards
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Finding {
    pub vni: VniId,
    pub vrf: String,
    pub nexthop: IpAddr,
    pub reason: Reason,
}

impl Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VNI:{} VRF:{} Nexthop:{}", self.vni, self.vrf, self.nexthop)?;
        match &self.reason {
            Reason::NotFound => write!(f, " not found in evpn next-hops"),
            Reason::InvalidMac(mac) => write!(f, " has invalid mac address '{mac}'"),
        }
    }
}

fn default_exclusions() -> Vec<String> {
    vec![DEFAULT_VRF.to_string()]
}

/// Parameters of the reconciliation. N.B. we derive a builder type `ReconcilerBuilder`; only
/// the local hostname is mandatory.
#[derive(Builder, Debug, Clone)]
pub struct Reconciler {
    /// Next-hops originated by this router are not checked
    #[builder(setter(into))]
    hostname: String,

    #[builder(default)]
    mapping: VniMapping,

    /// VRFs not carried over EVPN
    #[builder(setter(into), default = default_exclusions())]
    exclude_vrfs: Vec<String>,
}

impl Reconciler {
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    #[must_use]
    pub fn mapping(&self) -> &VniMapping {
        &self.mapping
    }

    #[must_use]
    pub fn is_excluded(&self, vrf: &str) -> bool {
        self.exclude_vrfs.iter().any(|excluded| excluded == vrf)
    }

    /// The distinct next-hops of all the routes of a VRF, except those originated by this router
    #[must_use]
    pub fn collect_nexthops(&self, vrf: &Vrf) -> BTreeSet<IpAddr> {
        vrf.nexthops()
            .filter(|nh| !nh.originated_by(&self.hostname))
            .map(|nh| nh.ip)
            .collect()
    }

    /// Check every next-hop of every EVPN VRF against the table of the VNI of the VRF.
    /// Findings are sorted by VNI, then VRF, then next-hop.
    #[must_use]
    pub fn reconcile(&self, vrfs: &Vrfs, evpn: &EvpnNexthops) -> Vec<Finding> {
        let checked: Vec<(&str, &Vrf)> = vrfs
            .iter()
            .map(|(key, vrf)| (vrf.name_or(key), vrf))
            .filter(|(name, _)| {
                let excluded = self.is_excluded(name);
                if excluded {
                    debug!("Skipping VRF {name}");
                }
                !excluded
            })
            .collect();

        for (vni, names) in self.mapping.collisions(checked.iter().map(|(name, _)| *name)) {
            warn!("VRFs {names:?} all map to VNI {vni}");
        }

        let mut findings = Vec::new();
        for (name, vrf) in checked {
            let vni = self.mapping.vni(name);
            let nexthops = self.collect_nexthops(vrf);
            let table = evpn.get(vni.as_str());
            if table.is_none() {
                debug!("No EVPN next-hop table for VNI {vni} of VRF {name}");
            }
            debug!("Checking {} next-hops of VRF {name} (VNI {vni})", nexthops.len());
            for nexthop in nexthops {
                let reason = match table.and_then(|t| t.get(&nexthop)) {
                    None => Some(Reason::NotFound),
                    Some(binding) => match binding.mac() {
                        Ok(_) => None,
                        Err(MacError::Zero | MacError::Malformed(_)) => {
                            Some(Reason::InvalidMac(binding.router_mac.clone()))
                        }
                    },
                };
                if let Some(reason) = reason {
                    findings.push(Finding {
                        vni: vni.clone(),
                        vrf: name.to_owned(),
                        nexthop,
                        reason,
                    });
                }
            }
        }
        findings.sort();
        findings
    }
}
