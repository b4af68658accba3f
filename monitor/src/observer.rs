// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Observation of FRR and the kernel. Independent daemon queries are issued concurrently and
//! joined; the first failure fails the observation.

use ipnet::IpNet;
use model::decode::{decode_bgp_detail, decode_evpn, decode_rib_vrfs, decode_summary, decode_vrfs};
use model::rib::RibVrfs;
use reconcile::{EvpnSnapshot, InstallSnapshot, LegacySnapshot, Observe, PeersSnapshot};
use std::collections::BTreeSet;
use std::marker::PhantomData;
use tracing::{debug, warn};
use vtysh::{Daemon, Reply, Vtysh, VtyshError, commands};

use crate::errors::MonitorError;

/// Observes the state needed for one kind of snapshot `T`
#[derive(Debug, Clone)]
pub(crate) struct Observer<T> {
    vtysh: Vtysh,
    _snapshot: PhantomData<T>,
}

impl<T> Observer<T> {
    pub fn new(vtysh: Vtysh) -> Self {
        Self {
            vtysh,
            _snapshot: PhantomData,
        }
    }
}

impl Observe for Observer<EvpnSnapshot> {
    type Observation<'a>
        = Result<EvpnSnapshot, MonitorError>
    where
        Self: 'a;

    async fn observe<'a>(&self) -> Self::Observation<'a> {
        let (bgp, evpn) = tokio::try_join!(
            self.vtysh.execute_on(Daemon::Bgpd, commands::SHOW_BGP_VRF_ALL),
            self.vtysh.execute_on(Daemon::Zebra, commands::SHOW_EVPN_NEXTHOPS),
        )?;
        let vrfs = decode_vrfs(&bgp)?;
        let evpn = decode_evpn(&evpn)?;
        debug!("Observed {} VRFs and {} VNIs", vrfs.len(), evpn.len());
        Ok(EvpnSnapshot { vrfs, evpn })
    }
}

/// The prefixes of the kernel main table, if all of them could be listed
fn kernel_main_table() -> Option<BTreeSet<IpNet>> {
    let (routes, errors) = kernel::get_routes();
    if let Some(errors) = errors {
        warn!("Kernel routes are incomplete, ignoring them: {errors}");
        return None;
    }
    Some(kernel::main_table_prefixes(&routes))
}

/// The RIBs of zebra, if they could be queried and decoded
fn rib_vrfs(reply: Result<Reply, VtyshError>) -> Option<RibVrfs> {
    let decoded = reply
        .map_err(MonitorError::from)
        .and_then(|reply| decode_rib_vrfs(&reply).map_err(MonitorError::from));
    match decoded {
        Ok(rib) => Some(rib),
        Err(e) => {
            warn!("RIB routes are unavailable, ignoring them: {e}");
            None
        }
    }
}

impl Observe for Observer<InstallSnapshot> {
    type Observation<'a>
        = Result<InstallSnapshot, MonitorError>
    where
        Self: 'a;

    async fn observe<'a>(&self) -> Self::Observation<'a> {
        // only the BGP routes are needed, RIB and kernel presence are advisory
        let (bgp, rib) = tokio::join!(
            self.vtysh.execute_on(Daemon::Bgpd, commands::SHOW_BGP_VRF_ALL),
            self.vtysh.execute_on(Daemon::Zebra, commands::SHOW_IP_ROUTE_VRF_ALL),
        );
        let vrfs = decode_vrfs(&bgp?)?;
        let rib = rib_vrfs(rib);
        let kernel_main = kernel_main_table();
        debug!(
            "Observed {} VRFs and {} RIBs",
            vrfs.len(),
            rib.as_ref().map_or(0, RibVrfs::len)
        );
        Ok(InstallSnapshot {
            vrfs,
            rib,
            kernel_main,
        })
    }
}

impl Observe for Observer<LegacySnapshot> {
    type Observation<'a>
        = Result<LegacySnapshot, MonitorError>
    where
        Self: 'a;

    async fn observe<'a>(&self) -> Self::Observation<'a> {
        let (detail, evpn) = tokio::try_join!(
            self.vtysh.execute_on(Daemon::Bgpd, commands::SHOW_BGP_DETAIL),
            self.vtysh.execute_on(Daemon::Zebra, commands::SHOW_EVPN_NEXTHOPS),
        )?;
        Ok(LegacySnapshot {
            detail: decode_bgp_detail(&detail)?,
            evpn: decode_evpn(&evpn)?,
        })
    }
}

impl Observe for Observer<PeersSnapshot> {
    type Observation<'a>
        = Result<PeersSnapshot, MonitorError>
    where
        Self: 'a;

    async fn observe<'a>(&self) -> Self::Observation<'a> {
        let reply = self
            .vtysh
            .execute_on(Daemon::Bgpd, commands::SHOW_BGP_SUMMARY)
            .await?;
        Ok(PeersSnapshot {
            summary: decode_summary(&reply)?,
        })
    }
}
