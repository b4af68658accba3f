// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The closed set of FRR daemons we know how to reach.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::errors::VtyshError;

/// Default directory where FRR daemons create their vty sockets
pub const DEFAULT_RUNDIR: &str = "/var/run/frr";

/// An FRR daemon exposing a vty socket
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Daemon {
    Babeld,
    Bfdd,
    Bgpd,
    Eigrpd,
    Fabricd,
    Isisd,
    Ldpd,
    Nhrpd,
    Ospf6d,
    Ospfd,
    Pbrd,
    Pimd,
    Ripd,
    Ripngd,
    Sharpd,
    Staticd,
    Vrrpd,
    Zebra,
}

impl Daemon {
    /// Look up a daemon by its name.
    ///
    /// # Errors
    ///
    /// Fails with [`VtyshError::UnknownDaemon`] if the name is not one of the known daemons.
    pub fn lookup(name: &str) -> Result<Self, VtyshError> {
        Daemon::from_str(name).map_err(|_| VtyshError::UnknownDaemon(name.to_owned()))
    }

    /// Path of the vty socket of this daemon under `rundir`
    #[must_use]
    pub fn socket_path(self, rundir: &Path) -> PathBuf {
        rundir.join(format!("{self}.vty"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn lookup_known_daemons() {
        assert_eq!(Daemon::lookup("bgpd").unwrap(), Daemon::Bgpd);
        assert_eq!(Daemon::lookup("zebra").unwrap(), Daemon::Zebra);
        assert_eq!(Daemon::lookup("ospf6d").unwrap(), Daemon::Ospf6d);
    }

    #[test]
    fn lookup_unknown_daemon() {
        let err = Daemon::lookup("quagga").unwrap_err();
        assert!(matches!(err, VtyshError::UnknownDaemon(ref name) if name == "quagga"));
        assert!(err.is_config());

        // names are matched exactly
        assert!(Daemon::lookup("BGPD").is_err());
        assert!(Daemon::lookup("").is_err());
    }

    #[test]
    fn every_daemon_round_trips_through_its_name() {
        for daemon in Daemon::iter() {
            let name: &'static str = daemon.into();
            assert_eq!(Daemon::lookup(name).unwrap(), daemon);
        }
    }

    #[test]
    fn socket_paths() {
        let rundir = Path::new(DEFAULT_RUNDIR);
        assert_eq!(
            Daemon::Bgpd.socket_path(rundir),
            PathBuf::from("/var/run/frr/bgpd.vty")
        );
        assert_eq!(
            Daemon::Zebra.socket_path(Path::new("/tmp/frr")),
            PathBuf::from("/tmp/frr/zebra.vty")
        );
    }
}
