// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! BGP peer summary (`show bgp summary json`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// State of a peer whose session is up
pub const ESTABLISHED: &str = "Established";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BgpSummary {
    pub ipv4_unicast: Ipv4Unicast,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ipv4Unicast {
    pub router_id: String,
    /// Peers keyed by address (or interface name, for unnumbered peers)
    pub peers: BTreeMap<String, Peer>,
    pub failed_peers: u32,
    pub total_peers: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Peer {
    pub hostname: String,
    pub remote_as: u32,
    pub local_as: u32,
    pub version: u32,
    pub msg_rcvd: u64,
    pub msg_sent: u64,
    pub table_version: u64,
    pub outq: u32,
    pub inq: u32,
    pub peer_uptime: String,
    pub peer_uptime_msec: u64,
    pub peer_uptime_established_epoch: u64,
    pub pfx_rcd: u32,
    pub pfx_snt: u32,
    pub state: String,
    pub peer_state: String,
    pub connections_established: u32,
    pub connections_dropped: u32,
    pub id_type: String,
}

impl Peer {
    #[must_use]
    pub fn is_established(&self) -> bool {
        self.state == ESTABLISHED
    }
}

impl BgpSummary {
    /// Iterate over the peers whose session is not established
    pub fn peers_down(&self) -> impl Iterator<Item = (&str, &Peer)> {
        self.ipv4_unicast
            .peers
            .iter()
            .filter(|(_, peer)| !peer.is_established())
            .map(|(address, peer)| (address.as_str(), peer))
    }
}
