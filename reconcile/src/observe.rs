// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The seam between the checks and the systems they look at.

use ipnet::IpNet;
use model::rib::RibVrfs;
use model::summary::BgpSummary;
use model::{EvpnNexthops, Vrf, Vrfs};
use std::collections::BTreeSet;

/// `Observe` is implemented by whatever collects the state of an external system, here the
/// routing daemons and the kernel.
pub trait Observe {
    /// The returned data type of the observation.
    ///
    /// This is a GAT parameterized over a lifetime `'a where Self: 'a`, so observations may
    /// borrow from the observer.
    type Observation<'a>
    where
        Self: 'a;

    /// Observe the state of the system.
    ///
    /// # Contract
    ///
    /// Implementations must not mutate the state of the external system.
    fn observe<'a>(&self) -> impl Future<Output = Self::Observation<'a>>
    where
        Self: 'a;
}

/// BGP routes of all VRFs with the EVPN next-hop tables, taken together
#[derive(Debug, Clone, Default)]
pub struct EvpnSnapshot {
    pub vrfs: Vrfs,
    pub evpn: EvpnNexthops,
}

/// BGP routes of all VRFs with the RIB and the main kernel table. A table that could not be
/// observed is `None`.
#[derive(Debug, Clone, Default)]
pub struct InstallSnapshot {
    pub vrfs: Vrfs,
    pub rib: Option<RibVrfs>,
    pub kernel_main: Option<BTreeSet<IpNet>>,
}

/// BGP routes of the default VRF in detail with the EVPN next-hop tables
#[derive(Debug, Clone, Default)]
pub struct LegacySnapshot {
    pub detail: Vrf,
    pub evpn: EvpnNexthops,
}

/// BGP peer summary
#[derive(Debug, Clone, Default)]
pub struct PeersSnapshot {
    pub summary: BgpSummary,
}
