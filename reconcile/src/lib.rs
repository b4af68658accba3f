// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Checks of the consistency between the BGP routes of FRR, the EVPN next-hop tables of zebra,
//! the RIB and the kernel.

pub mod engine;
pub mod install;
pub mod legacy;
pub mod mapping;
pub mod observe;

// re-exports
pub use engine::{Finding, Reason, Reconciler, ReconcilerBuilder, ReconcilerBuilderError};
pub use install::{InstallFinding, Presence, check_install};
pub use legacy::missing_rmacs;
pub use mapping::{DEFAULT_VRF_PREFIX, MappingError, VniMapping, strip_vrf_prefix};
pub use observe::{EvpnSnapshot, InstallSnapshot, LegacySnapshot, Observe, PeersSnapshot};
