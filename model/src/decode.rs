// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Decoding of daemon replies into models.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use vtysh::{Daemon, Reply};

use crate::bgp::{Vrf, Vrfs};
use crate::evpn::EvpnNexthops;
use crate::rib::{RibTable, RibVrfs};
use crate::summary::BgpSummary;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to decode reply of {daemon} to '{command}': {source}")]
    Json {
        daemon: Daemon,
        command: String,
        source: serde_json::Error,
    },
    #[error("Reply of {daemon} to '{command}' is not a JSON object")]
    NotAnObject { daemon: Daemon, command: String },
}

impl DecodeError {
    fn json(reply: &Reply, source: serde_json::Error) -> Self {
        DecodeError::Json {
            daemon: reply.daemon,
            command: reply.command.clone(),
            source,
        }
    }
}

/// Decode a reply into `T`. Members absent from the reply take their default values; a
/// member of the wrong type makes decoding fail.
///
/// # Errors
///
/// Fails if the reply is not JSON or does not match the shape of `T`.
pub fn decode_strict<T: DeserializeOwned>(reply: &Reply) -> Result<T, DecodeError> {
    let decoded = serde_json::from_slice(&reply.data).map_err(|e| DecodeError::json(reply, e))?;
    debug!(
        "Decoded {} bytes of reply of {} to '{}'",
        reply.data.len(),
        reply.daemon,
        reply.command
    );
    Ok(decoded)
}

/// Decode the BGP routes of all VRFs (`show bgp vrf all ipv4 unicast json`)
///
/// # Errors
///
/// Fails if the reply is not a map of VRFs.
pub fn decode_vrfs(reply: &Reply) -> Result<Vrfs, DecodeError> {
    decode_strict(reply)
}

/// Decode the BGP routes of the default VRF (`show bgp detail json`)
///
/// # Errors
///
/// Fails if the reply is not a VRF.
pub fn decode_bgp_detail(reply: &Reply) -> Result<Vrf, DecodeError> {
    decode_strict(reply)
}

/// Decode the BGP peer summary (`show bgp summary json`)
///
/// # Errors
///
/// Fails if the reply is not a BGP summary.
pub fn decode_summary(reply: &Reply) -> Result<BgpSummary, DecodeError> {
    decode_strict(reply)
}

/// Decode the RIB of a single VRF (`show ip route json`, or `show ip route vrf NAME json`).
/// The monitor itself queries every VRF at once with [`decode_rib_vrfs`]; this is for callers
/// interested in one table only.
///
/// # Errors
///
/// Fails if the reply is not a map of prefixes.
pub fn decode_rib(reply: &Reply) -> Result<RibTable, DecodeError> {
    decode_strict(reply)
}

/// Decode the RIBs of all VRFs (`show ip route vrf all json`)
///
/// # Errors
///
/// Fails if the reply is not a map of VRFs.
pub fn decode_rib_vrfs(reply: &Reply) -> Result<RibVrfs, DecodeError> {
    decode_strict(reply)
}

/// Decode the EVPN next-hop tables (`show evpn next-hops vni all json`).
///
/// An empty reply yields empty tables: zebra prints nothing when no VNI is configured.
/// Entries of unexpected shape are skipped (see [`EvpnNexthops::skipped`]).
///
/// # Errors
///
/// Fails if the reply is not JSON or its top level is not an object.
pub fn decode_evpn(reply: &Reply) -> Result<EvpnNexthops, DecodeError> {
    if reply.is_blank() {
        debug!("Empty reply of {} to '{}'", reply.daemon, reply.command);
        return Ok(EvpnNexthops::default());
    }
    let value: Value =
        serde_json::from_slice(&reply.data).map_err(|e| DecodeError::json(reply, e))?;
    let Value::Object(root) = value else {
        return Err(DecodeError::NotAnObject {
            daemon: reply.daemon,
            command: reply.command.clone(),
        });
    };
    Ok(EvpnNexthops::from_json(&root))
}
