// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Command sessions: privilege escalation followed by the actual command.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::daemon::{DEFAULT_RUNDIR, Daemon};
use crate::errors::VtyshError;
use crate::transport::exchange;

/// Commands sent to FRR daemons
pub mod commands {
    /// Raise the privilege level of the vty session. The reply carries nothing of interest.
    pub const ENABLE: &str = "enable";
    /// Per-VRF BGP ipv4 unicast routes (bgpd)
    pub const SHOW_BGP_VRF_ALL: &str = "show bgp vrf all ipv4 unicast json";
    /// BGP routes of the default VRF in detail (bgpd)
    pub const SHOW_BGP_DETAIL: &str = "show bgp detail json";
    /// BGP peer summary (bgpd)
    pub const SHOW_BGP_SUMMARY: &str = "show bgp summary json";
    /// EVPN next-hops and their router MACs for every VNI (zebra)
    pub const SHOW_EVPN_NEXTHOPS: &str = "show evpn next-hops vni all json";
    /// RIB of the default VRF (zebra)
    pub const SHOW_IP_ROUTE: &str = "show ip route json";
    /// RIB of every VRF (zebra)
    pub const SHOW_IP_ROUTE_VRF_ALL: &str = "show ip route vrf all json";
}

/// The raw reply of a daemon to a command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub daemon: Daemon,
    pub command: String,
    pub data: Vec<u8>,
}

impl Reply {
    #[must_use]
    pub fn new(daemon: Daemon, command: &str, data: impl Into<Vec<u8>>) -> Self {
        Self {
            daemon,
            command: command.to_owned(),
            data: data.into(),
        }
    }

    /// Tell if the daemon replied with nothing but whitespace
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(u8::is_ascii_whitespace)
    }
}

/// Entry point to query FRR daemons through their vty sockets
#[derive(Clone, Debug)]
pub struct Vtysh {
    rundir: PathBuf,
}

impl Default for Vtysh {
    fn default() -> Self {
        Self::new(DEFAULT_RUNDIR)
    }
}

impl Vtysh {
    #[must_use]
    pub fn new(rundir: impl Into<PathBuf>) -> Self {
        Self {
            rundir: rundir.into(),
        }
    }

    #[must_use]
    pub fn rundir(&self) -> &Path {
        &self.rundir
    }

    /// Run `command` on the daemon called `daemon`.
    ///
    /// # Errors
    ///
    /// Fails with [`VtyshError::UnknownDaemon`] without opening any socket if `daemon` does not
    /// name a known daemon; otherwise as [`Vtysh::execute_on`].
    pub async fn execute(&self, daemon: &str, command: &str) -> Result<Reply, VtyshError> {
        let daemon = Daemon::lookup(daemon)?;
        self.execute_on(daemon, command).await
    }

    /// Run `command` on `daemon`: send `enable`, read and discard its reply, then send `command`
    /// and return its reply.
    ///
    /// # Errors
    ///
    /// Any failure to connect, send or receive in either of the two steps fails the whole
    /// session.
    pub async fn execute_on(&self, daemon: Daemon, command: &str) -> Result<Reply, VtyshError> {
        let path = daemon.socket_path(&self.rundir);
        debug!("Running '{command}' on {daemon}...");
        exchange(&path, commands::ENABLE).await?;
        let data = exchange(&path, command).await?;
        Ok(Reply {
            daemon,
            command: command.to_owned(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::commands::*;
    use super::*;
    use crate::fake::{FakeDaemon, FakeReply, scratch_rundir};
    use std::collections::HashMap;
    use std::io::ErrorKind;
    use tracing_test::traced_test;

    #[test]
    fn blank_replies() {
        assert!(Reply::new(Daemon::Zebra, SHOW_IP_ROUTE, "").is_blank());
        assert!(Reply::new(Daemon::Zebra, SHOW_IP_ROUTE, " \n").is_blank());
        assert!(!Reply::new(Daemon::Zebra, SHOW_IP_ROUTE, "{}").is_blank());
    }

    #[tokio::test]
    #[traced_test]
    async fn enable_then_command() {
        let rundir = scratch_rundir("enable-then-command");
        let replies = HashMap::from([
            (ENABLE.to_string(), FakeReply::data("% privileged")),
            (SHOW_BGP_SUMMARY.to_string(), FakeReply::data("{\"a\":1}")),
        ]);
        let bgpd = FakeDaemon::start(&rundir, Daemon::Bgpd, replies).unwrap();

        let vtysh = Vtysh::new(&rundir);
        let reply = vtysh.execute("bgpd", SHOW_BGP_SUMMARY).await.unwrap();
        assert_eq!(reply.daemon, Daemon::Bgpd);
        assert_eq!(reply.command, SHOW_BGP_SUMMARY);
        assert_eq!(reply.data, b"{\"a\":1}".to_vec());

        // enable goes first, each exchange on its own connection
        assert_eq!(bgpd.requests(), vec![ENABLE, SHOW_BGP_SUMMARY]);
        assert_eq!(bgpd.connections(), 2);
        bgpd.stop();
    }

    #[tokio::test]
    async fn unknown_daemon_opens_no_socket() {
        let rundir = scratch_rundir("unknown-daemon");
        let zebra = FakeDaemon::start(&rundir, Daemon::Zebra, HashMap::new()).unwrap();

        let vtysh = Vtysh::new(&rundir);
        let err = vtysh.execute("bgpd2", SHOW_IP_ROUTE).await.unwrap_err();
        assert!(matches!(err, VtyshError::UnknownDaemon(ref d) if d == "bgpd2"));
        assert!(err.is_config());
        assert_eq!(zebra.connections(), 0);
        zebra.stop();
    }

    #[tokio::test]
    async fn connection_refused_is_surfaced() {
        let rundir = scratch_rundir("no-daemon");
        let vtysh = Vtysh::new(&rundir);
        let err = vtysh
            .execute_on(Daemon::Zebra, SHOW_EVPN_NEXTHOPS)
            .await
            .unwrap_err();
        assert!(matches!(err, VtyshError::Connect { .. }));
        assert!(!err.is_config());
        assert_eq!(err.io_error().map(|e| e.kind()), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn failed_enable_fails_session() {
        let rundir = scratch_rundir("failed-enable");
        let replies = HashMap::from([
            (ENABLE.to_string(), FakeReply::Hangup),
            (SHOW_BGP_VRF_ALL.to_string(), FakeReply::data("{}")),
        ]);
        let bgpd = FakeDaemon::start(&rundir, Daemon::Bgpd, replies).unwrap();

        let err = Vtysh::new(&rundir)
            .execute_on(Daemon::Bgpd, SHOW_BGP_VRF_ALL)
            .await
            .unwrap_err();
        assert!(matches!(err, VtyshError::Truncated { ref command, .. } if command == ENABLE));
        // the actual command was never sent
        assert_eq!(bgpd.requests(), vec![ENABLE]);
        bgpd.stop();
    }

    #[tokio::test]
    async fn truncated_reply() {
        let rundir = scratch_rundir("truncated-reply");
        let replies = HashMap::from([(
            SHOW_EVPN_NEXTHOPS.to_string(),
            FakeReply::Partial("{\"100\":".to_string()),
        )]);
        let zebra = FakeDaemon::start(&rundir, Daemon::Zebra, replies).unwrap();

        let err = Vtysh::new(&rundir)
            .execute("zebra", SHOW_EVPN_NEXTHOPS)
            .await
            .unwrap_err();
        assert!(matches!(err, VtyshError::Truncated { received: 7, .. }));
        zebra.stop();
    }
}
