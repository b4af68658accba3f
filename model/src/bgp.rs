// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! BGP routes per VRF, as reported by bgpd for `show bgp vrf all ipv4 unicast json`
//! (one [`Vrf`] per VRF) and `show bgp detail json` (a single [`Vrf`]).
//!
//! Fields absent from the daemon output take their default value. Fields of the wrong type
//! make decoding fail.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;

/// Routes keyed by prefix. Every prefix has one or more candidate routes, in daemon order.
pub type Routes = BTreeMap<String, Vec<Route>>;

/// VRFs keyed by name
pub type Vrfs = BTreeMap<String, Vrf>;

/// Name of the VRF that is not EVPN-numbered
pub const DEFAULT_VRF: &str = "default";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Vrf {
    pub vrf_id: i64,
    pub vrf_name: String,
    pub table_version: u64,
    pub router_id: String,
    pub default_loc_prf: u32,
    #[serde(rename = "localAS")]
    pub local_as: u32,
    pub routes: Routes,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Route {
    pub valid: bool,
    pub path_from: String,
    pub prefix: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub multipath: bool,
    #[serde(rename = "bestpath", skip_serializing_if = "std::ops::Not::not")]
    pub best_path: bool,
    #[serde(rename = "selectionReason", skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    pub prefix_len: u8,
    pub network: String,
    pub version: u64,
    pub weight: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<u32>,
    pub peer_id: String,
    /// AS path
    pub path: String,
    pub origin: String,
    pub announce_nexthop_self: bool,
    pub nexthops: Vec<Nexthop>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nexthop {
    pub ip: IpAddr,
    /// Name of the router that originated the route, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default)]
    pub afi: String,
    #[serde(default)]
    pub used: bool,
}

impl Vrf {
    /// Name of the VRF. Some outputs omit `vrfName`, in which case the caller-provided key is
    /// used.
    #[must_use]
    pub fn name_or<'a>(&'a self, key: &'a str) -> &'a str {
        if self.vrf_name.is_empty() {
            key
        } else {
            &self.vrf_name
        }
    }

    /// Iterate over the next-hops of all the routes to all the prefixes of this VRF
    pub fn nexthops(&self) -> impl Iterator<Item = &Nexthop> {
        self.routes
            .values()
            .flatten()
            .flat_map(|route| route.nexthops.iter())
    }

    /// Iterate over the prefixes having at least one valid route
    pub fn valid_prefixes(&self) -> impl Iterator<Item = &str> {
        self.routes
            .iter()
            .filter(|(_, routes)| routes.iter().any(|r| r.valid))
            .map(|(prefix, _)| prefix.as_str())
    }
}

impl Nexthop {
    /// Tell if this next-hop was originated by router `hostname`
    #[must_use]
    pub fn originated_by(&self, hostname: &str) -> bool {
        self.hostname.as_deref() == Some(hostname)
    }
}
