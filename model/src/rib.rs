// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Routes in the RIB of zebra (`show ip route json`, `show ip route vrf all json`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;

/// The RIB of one VRF: routes keyed by prefix
pub type RibTable = BTreeMap<String, Vec<RibRoute>>;

/// The RIBs of all VRFs, keyed by VRF name
pub type RibVrfs = BTreeMap<String, RibTable>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RibRoute {
    pub prefix: String,
    pub prefix_len: u8,
    pub protocol: String,
    pub vrf_id: i64,
    pub vrf_name: String,
    pub selected: bool,
    pub dest_selected: bool,
    pub distance: u32,
    pub metric: u32,
    pub installed: bool,
    pub table: u32,
    pub internal_status: u32,
    pub internal_flags: u32,
    pub internal_next_hop_num: u32,
    pub internal_next_hop_active_num: u32,
    pub nexthop_group_id: u32,
    pub uptime: String,
    pub nexthops: Vec<RibNexthop>,
    pub as_path: String,
    pub communities: String,
    pub large_communities: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RibNexthop {
    pub flags: u32,
    pub fib: bool,
    /// Absent for directly connected routes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpAddr>,
    pub afi: String,
    pub interface_index: u32,
    pub interface_name: String,
    pub active: bool,
    pub weight: u32,
}

impl RibRoute {
    /// Tell if zebra installed this route in the kernel
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed
    }
}

/// Tell if any of the `routes` of a prefix got installed
#[must_use]
pub fn any_installed(routes: &[RibRoute]) -> bool {
    routes.iter().any(RibRoute::is_installed)
}
