// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Observe, check and report, for every mode.

use reconcile::{
    EvpnSnapshot, InstallSnapshot, LegacySnapshot, Observe, PeersSnapshot, check_install,
    missing_rmacs,
};
use std::time::Duration;
use tracing::{debug, info};
use vtysh::Vtysh;

use crate::args::Mode;
use crate::config::MonitorParams;
use crate::errors::MonitorError;
use crate::observer::Observer;
use crate::report;

/// Run `mode` once and return the number of findings reported
pub(crate) async fn run(mode: Mode, params: &MonitorParams) -> Result<usize, MonitorError> {
    with_timeout(params.timeout, run_once(mode, params)).await
}

async fn with_timeout<T>(
    timeout: Option<Duration>,
    fut: impl Future<Output = Result<T, MonitorError>>,
) -> Result<T, MonitorError> {
    match timeout {
        None => fut.await,
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| MonitorError::Timeout(limit))?,
    }
}

async fn run_once(mode: Mode, params: &MonitorParams) -> Result<usize, MonitorError> {
    let vtysh = Vtysh::new(&params.rundir);
    debug!("Running {mode:?} on daemons at {}", params.rundir.display());
    let count = match mode {
        Mode::Check => {
            let reconciler = params.reconciler()?;
            let snapshot = Observer::<EvpnSnapshot>::new(vtysh).observe().await?;
            report::skipped_entries(&snapshot.evpn);
            let findings = reconciler.reconcile(&snapshot.vrfs, &snapshot.evpn);
            report::findings(&findings)
        }
        Mode::Install => {
            let snapshot = Observer::<InstallSnapshot>::new(vtysh).observe().await?;
            let findings = check_install(
                &snapshot.vrfs,
                snapshot.rib.as_ref(),
                snapshot.kernel_main.as_ref(),
            );
            report::install_findings(&findings)
        }
        Mode::LegacyRmac => {
            let snapshot = Observer::<LegacySnapshot>::new(vtysh).observe().await?;
            report::skipped_entries(&snapshot.evpn);
            report::missing_rmacs(&missing_rmacs(&snapshot.detail, &snapshot.evpn))
        }
        Mode::Peers => {
            let snapshot = Observer::<PeersSnapshot>::new(vtysh).observe().await?;
            report::peers_down(&snapshot.summary)
        }
    };
    info!("{mode:?}: {count} findings");
    Ok(count)
}
