// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Coarse router MAC check, ignoring VRFs and VNIs: any next-hop of the BGP table that no VNI
//! has an EVPN next-hop entry for.

use model::{EvpnNexthops, Vrf};
use std::collections::BTreeSet;
use std::net::IpAddr;

/// The distinct next-hops of `detail` (`show bgp detail json`) absent from the EVPN tables of
/// all VNIs, in ascending order
#[must_use]
pub fn missing_rmacs(detail: &Vrf, evpn: &EvpnNexthops) -> Vec<IpAddr> {
    let known = evpn.all_ips();
    detail
        .nexthops()
        .map(|nh| nh.ip)
        .filter(|ip| !known.contains(ip))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
