// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Mapping of VRF names to the VNI carrying their traffic.

use model::VniId;
use std::collections::BTreeMap;
use thiserror::Error;

/// Prefix of EVPN VRF names by convention: VRF `vrf100` is carried by VNI `100`
pub const DEFAULT_VRF_PREFIX: &str = "vrf";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("VRFs {first} and {second} are both mapped to VNI {vni}")]
    DuplicateVni {
        vni: String,
        first: String,
        second: String,
    },
    #[error("VRF {0} is mapped to an empty VNI")]
    EmptyVni(String),
}

/// Remove `prefix` from the start of `vrf`. A name without the prefix is returned unchanged.
#[must_use]
pub fn strip_vrf_prefix<'a>(vrf: &'a str, prefix: &str) -> &'a str {
    vrf.strip_prefix(prefix).unwrap_or(vrf)
}

/// Tells which VNI carries a VRF: an explicit entry if one exists, otherwise the VRF name
/// without the naming prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VniMapping {
    prefix: String,
    explicit: BTreeMap<String, VniId>,
}

impl Default for VniMapping {
    fn default() -> Self {
        Self::new(DEFAULT_VRF_PREFIX)
    }
}

impl VniMapping {
    /// A mapping following the naming convention only
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            explicit: BTreeMap::new(),
        }
    }

    /// A mapping with explicit VRF to VNI entries, taking precedence over the naming convention.
    ///
    /// # Errors
    ///
    /// Fails if two VRFs are mapped to the same VNI, or a VRF to an empty one.
    pub fn with_explicit(
        prefix: impl Into<String>,
        entries: BTreeMap<String, String>,
    ) -> Result<Self, MappingError> {
        let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
        for (vrf, vni) in &entries {
            if vni.is_empty() {
                return Err(MappingError::EmptyVni(vrf.clone()));
            }
            if let Some(first) = owners.insert(vni.as_str(), vrf.as_str()) {
                return Err(MappingError::DuplicateVni {
                    vni: vni.clone(),
                    first: first.to_owned(),
                    second: vrf.clone(),
                });
            }
        }
        let explicit = entries
            .into_iter()
            .map(|(vrf, vni)| (vrf, VniId::from(vni)))
            .collect();
        Ok(Self {
            prefix: prefix.into(),
            explicit,
        })
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The VNI carrying `vrf`
    #[must_use]
    pub fn vni(&self, vrf: &str) -> VniId {
        match self.explicit.get(vrf) {
            Some(vni) => vni.clone(),
            None => VniId::from(strip_vrf_prefix(vrf, &self.prefix)),
        }
    }

    /// Group the given VRFs by VNI and return the VNIs claimed by more than one of them
    pub fn collisions<'a>(
        &self,
        vrfs: impl IntoIterator<Item = &'a str>,
    ) -> BTreeMap<VniId, Vec<&'a str>> {
        let mut by_vni: BTreeMap<VniId, Vec<&'a str>> = BTreeMap::new();
        for vrf in vrfs {
            by_vni.entry(self.vni(vrf)).or_default().push(vrf);
        }
        by_vni.retain(|_, vrfs| vrfs.len() > 1);
        by_vni
    }
}
