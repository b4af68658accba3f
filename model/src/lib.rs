// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Models of the state that FRR daemons report in JSON and the decoders producing them.

pub mod bgp;
pub mod decode;
pub mod evpn;
pub mod mac;
pub mod rib;
pub mod summary;

// re-exports
pub use bgp::{Nexthop, Route, Routes, Vrf, Vrfs};
pub use decode::DecodeError;
pub use evpn::{EvpnNexthops, MacBinding, VniId, VniNexthops};
pub use mac::{MacError, RouterMac};
