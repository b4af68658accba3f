// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! EVPN next-hop tables per VNI (`show evpn next-hops vni all json`).
//!
//! Zebra reports, for every VNI, an object mixing a `numNextHops` counter with one object per
//! next-hop, keyed by the next-hop address:
//!
//! ```json
//! { "100": { "numNextHops": 1, "10.0.0.1": { "nexthopIp": "10.0.0.1", "routerMac": "00:1a:2b:3c:4d:5e" } } }
//! ```
//!
//! The layout has changed across FRR versions, so every key is classified first and entries
//! whose shape is not understood are skipped (and remembered) instead of failing the table.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::net::IpAddr;
use tracing::warn;

use crate::mac::{MacError, RouterMac};

/// Key holding the number of next-hops of a VNI
pub const NUM_NEXTHOPS_KEY: &str = "numNextHops";

/// Identifier of a VNI, as it appears in the keys of the EVPN next-hop table
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VniId(String);

impl VniId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for VniId {
    fn from(value: &str) -> Self {
        VniId(value.to_owned())
    }
}
impl From<String> for VniId {
    fn from(value: String) -> Self {
        VniId(value)
    }
}
impl Borrow<str> for VniId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
impl Display for VniId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A next-hop and the router MAC zebra resolved for it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacBinding {
    pub ip: IpAddr,
    /// As reported; may not be a valid MAC
    pub router_mac: String,
}

impl MacBinding {
    /// The router MAC, if valid
    ///
    /// # Errors
    ///
    /// Fails if the reported router MAC is malformed or zero
    pub fn mac(&self) -> Result<RouterMac, MacError> {
        RouterMac::parse_valid(&self.router_mac)
    }
}

/// The next-hops of one VNI
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VniNexthops {
    /// The `numNextHops` counter, if reported
    pub num_nexthops: Option<u64>,
    pub bindings: BTreeMap<IpAddr, MacBinding>,
}

impl VniNexthops {
    #[must_use]
    pub fn get(&self, ip: &IpAddr) -> Option<&MacBinding> {
        self.bindings.get(ip)
    }
}

/// Why an entry of the table was skipped
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The value of a VNI is not an object
    VniNotAnObject,
    /// The counter is not a non-negative integer
    BadCount,
    /// The key of a next-hop entry is not an IP address
    BadAddress,
    /// The value of a next-hop entry is not an object
    NotAnObject,
    /// The object of a next-hop entry lacks a string `routerMac`
    BadBinding(String),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::VniNotAnObject => write!(f, "vni is not an object"),
            SkipReason::BadCount => write!(f, "bad next-hop count"),
            SkipReason::BadAddress => write!(f, "key is not an ip address"),
            SkipReason::NotAnObject => write!(f, "entry is not an object"),
            SkipReason::BadBinding(e) => write!(f, "bad entry: {e}"),
        }
    }
}

/// An entry that could not be understood
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedEntry {
    pub vni: VniId,
    /// `None` when the whole VNI was skipped
    pub key: Option<String>,
    pub reason: SkipReason,
}

/// A classified entry of a VNI object
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvpnEntry {
    Count(u64),
    Binding(MacBinding),
}

#[derive(Deserialize)]
struct RawBinding {
    #[serde(rename = "routerMac")]
    router_mac: String,
}

impl EvpnEntry {
    /// Classify the entry `key` of a VNI object by its key name, then extract it.
    ///
    /// # Errors
    ///
    /// Returns the reason to skip the entry if its shape is not the expected one.
    pub fn classify(key: &str, value: &Value) -> Result<EvpnEntry, SkipReason> {
        if key == NUM_NEXTHOPS_KEY {
            return value
                .as_u64()
                .map(EvpnEntry::Count)
                .ok_or(SkipReason::BadCount);
        }
        let ip: IpAddr = key.parse().map_err(|_| SkipReason::BadAddress)?;
        if !value.is_object() {
            return Err(SkipReason::NotAnObject);
        }
        let raw = RawBinding::deserialize(value)
            .map_err(|e| SkipReason::BadBinding(e.to_string()))?;
        Ok(EvpnEntry::Binding(MacBinding {
            ip,
            router_mac: raw.router_mac,
        }))
    }
}

/// The EVPN next-hop tables of all VNIs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvpnNexthops {
    vnis: BTreeMap<VniId, VniNexthops>,
    skipped: Vec<SkippedEntry>,
}

impl EvpnNexthops {
    /// Build the tables from the top-level object of the daemon reply
    #[must_use]
    pub fn from_json(root: &Map<String, Value>) -> Self {
        let mut tables = EvpnNexthops::default();
        for (vni, value) in root {
            let vni = VniId::from(vni.as_str());
            let Some(entries) = value.as_object() else {
                tables.skip(vni, None, SkipReason::VniNotAnObject);
                continue;
            };
            let mut nexthops = VniNexthops::default();
            for (key, value) in entries {
                match EvpnEntry::classify(key, value) {
                    Ok(EvpnEntry::Count(count)) => nexthops.num_nexthops = Some(count),
                    Ok(EvpnEntry::Binding(binding)) => {
                        nexthops.bindings.insert(binding.ip, binding);
                    }
                    Err(reason) => tables.skip(vni.clone(), Some(key.clone()), reason),
                }
            }
            tables.vnis.insert(vni, nexthops);
        }
        tables
    }

    fn skip(&mut self, vni: VniId, key: Option<String>, reason: SkipReason) {
        warn!(
            "Skipping EVPN next-hop entry {vni}/{}: {reason}",
            key.as_deref().unwrap_or("*")
        );
        self.skipped.push(SkippedEntry { vni, key, reason });
    }

    /// Add the next-hops of a VNI, replacing any previous ones
    pub fn insert(&mut self, vni: impl Into<VniId>, nexthops: VniNexthops) {
        self.vnis.insert(vni.into(), nexthops);
    }

    #[must_use]
    pub fn get(&self, vni: &str) -> Option<&VniNexthops> {
        self.vnis.get(vni)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VniId, &VniNexthops)> {
        self.vnis.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vnis.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vnis.is_empty()
    }

    /// The entries that were skipped when decoding
    #[must_use]
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// The addresses of the next-hops of all VNIs
    #[must_use]
    pub fn all_ips(&self) -> BTreeSet<IpAddr> {
        self.vnis
            .values()
            .flat_map(|nexthops| nexthops.bindings.keys().copied())
            .collect()
    }
}
