// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Client for the vty control sockets of FRR daemons.
//!
//! Each FRR daemon listens on a unix stream socket `<rundir>/<daemon>.vty`. Requests are
//! command strings terminated by a NUL octet and so are the replies. This crate provides the
//! framed transport over those sockets and the `enable` + command session used to query the
//! daemons.

mod daemon;
mod errors;
mod session;
mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod fake;

// re-exports
pub use daemon::{DEFAULT_RUNDIR, Daemon};
pub use errors::VtyshError;
pub use session::{Reply, Vtysh, commands};
