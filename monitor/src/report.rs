// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Reporting of findings, one log line each.

use model::EvpnNexthops;
use model::summary::BgpSummary;
use reconcile::{Finding, InstallFinding};
use std::net::IpAddr;
use tracing::{info, warn};

/// Log what the EVPN decoder had to skip, so that format changes of zebra get noticed
pub(crate) fn skipped_entries(evpn: &EvpnNexthops) {
    if !evpn.skipped().is_empty() {
        info!(
            "{} EVPN next-hop entries were not understood and ignored",
            evpn.skipped().len()
        );
    }
}

pub(crate) fn findings(findings: &[Finding]) -> usize {
    for finding in findings {
        warn!("{finding}");
    }
    findings.len()
}

pub(crate) fn install_findings(findings: &[InstallFinding]) -> usize {
    for finding in findings {
        warn!("{finding}");
    }
    findings.len()
}

pub(crate) fn missing_rmacs(nexthops: &[IpAddr]) -> usize {
    for nexthop in nexthops {
        warn!("Nexthop:{nexthop} not found in evpn next-hops of any VNI");
    }
    nexthops.len()
}

pub(crate) fn peers_down(summary: &BgpSummary) -> usize {
    let mut count = 0;
    for (address, peer) in summary.peers_down() {
        warn!(
            "Peer:{address} AS:{} state:{} is not established",
            peer.remote_as, peer.state
        );
        count += 1;
    }
    count
}
