// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

pub(crate) use clap::Parser;
use clap::Subcommand;
use std::path::{Path, PathBuf};

/// What to check
#[derive(Subcommand, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Check that the next-hops of EVPN VRFs have a router MAC in the table of their VNI
    #[default]
    Check,
    /// Check that the prefixes BGP has valid routes for are in the RIB and the kernel
    Install,
    /// Check that every BGP next-hop is known to some VNI, ignoring VRFs
    LegacyRmac,
    /// List the BGP peers whose session is not established
    Peers,
}

#[derive(Parser, Debug)]
#[command(name = "frrmon")]
#[command(version)]
#[command(
    about = "Detect BGP next-hops of EVPN VRFs that FRR can't encapsulate traffic towards",
    long_about = None
)]
pub(crate) struct CmdArgs {
    #[command(subcommand)]
    mode: Option<Mode>,

    #[arg(long, global = true, value_name = "FILE", help = "YAML configuration file")]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Directory holding the vty sockets of the FRR daemons [default: /var/run/frr]"
    )]
    rundir: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Name of this router; next-hops it originated are not checked [default: system hostname]"
    )]
    hostname: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "PREFIX",
        help = "Prefix to strip from VRF names to get their VNI [default: vrf]"
    )]
    vrf_prefix: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Give up if the daemons have not answered after this many seconds"
    )]
    timeout: Option<u64>,

    #[arg(
        long,
        global = true,
        value_name = "tracing configuration",
        help = "Tracing config string as comma-separated sequence of tag=level, with level one in [off,error,warn,info,debug,trace].
Tags are vtysh, model, reconcile, kernel and frrmon. Passing default=level sets the default log-level.
E.g. default=warn,vtysh=debug"
    )]
    tracing: Option<String>,
}

impl CmdArgs {
    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or_default()
    }
    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }
    pub fn rundir(&self) -> Option<&Path> {
        self.rundir.as_deref()
    }
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }
    pub fn vrf_prefix(&self) -> Option<&str> {
        self.vrf_prefix.as_deref()
    }
    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }
    pub fn tracing(&self) -> Option<&str> {
        self.tracing.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        CmdArgs::command().debug_assert();
    }

    #[test]
    fn check_is_the_default_mode() {
        let args = CmdArgs::try_parse_from(["frrmon"]).unwrap();
        assert_eq!(args.mode(), Mode::Check);
        assert!(args.config().is_none());
        assert!(args.timeout().is_none());
    }

    #[test]
    fn modes_and_options() {
        let args = CmdArgs::try_parse_from([
            "frrmon",
            "legacy-rmac",
            "--rundir",
            "/tmp/frr",
            "--hostname",
            "leaf1",
            "--vrf-prefix",
            "tenant-",
            "--timeout",
            "5",
            "--tracing",
            "default=debug",
        ])
        .unwrap();
        assert_eq!(args.mode(), Mode::LegacyRmac);
        assert_eq!(args.rundir(), Some(Path::new("/tmp/frr")));
        assert_eq!(args.hostname(), Some("leaf1"));
        assert_eq!(args.vrf_prefix(), Some("tenant-"));
        assert_eq!(args.timeout(), Some(5));
        assert_eq!(args.tracing(), Some("default=debug"));

        let args = CmdArgs::try_parse_from(["frrmon", "--config", "/etc/frrmon.yaml", "peers"])
            .unwrap();
        assert_eq!(args.mode(), Mode::Peers);
        assert_eq!(args.config(), Some(Path::new("/etc/frrmon.yaml")));

        let args = CmdArgs::try_parse_from(["frrmon", "install"]).unwrap();
        assert_eq!(args.mode(), Mode::Install);
    }

    #[test]
    fn bad_arguments() {
        assert!(CmdArgs::try_parse_from(["frrmon", "--timeout", "0"]).is_err());
        assert!(CmdArgs::try_parse_from(["frrmon", "--timeout", "soon"]).is_err());
        assert!(CmdArgs::try_parse_from(["frrmon", "restart"]).is_err());
    }
}
