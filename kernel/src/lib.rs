// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Best-effort listing of the IPv4 routes of the kernel main table.
//!
//! Interfaces are enumerated with `netdev` and the table is read from `/proc/net/route`. Every
//! problem met along the way is kept, and whatever could be listed is returned alongside.

use ipnet::{IpNet, Ipv4Net};
use netdev::get_interfaces;
use procfs::net::{RouteEntry, route};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::net::Ipv4Addr;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("Failed to read kernel routing table: {0}")]
    RouteTable(#[source] procfs::ProcError),
    #[error("Route to {destination} uses unknown interface {iface}")]
    UnknownInterface { iface: String, destination: Ipv4Addr },
    #[error("Route to {destination} via {iface} has non-contiguous netmask {mask}")]
    BadNetmask {
        iface: String,
        destination: Ipv4Addr,
        mask: Ipv4Addr,
    },
}

/// All the errors met while listing routes
#[derive(Debug)]
pub struct KernelErrors(Vec<KernelError>);

impl KernelErrors {
    #[must_use]
    pub fn errors(&self) -> &[KernelError] {
        &self.0
    }
    fn join(errors: Vec<KernelError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }
}

impl Display for KernelErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (n, error) in self.0.iter().enumerate() {
            if n > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for KernelErrors {}

/// A route of the kernel main table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelRoute {
    pub destination: Ipv4Net,
    /// `None` for directly connected routes
    pub gateway: Option<Ipv4Addr>,
    pub ifname: String,
    pub ifindex: u32,
    pub metric: u32,
}

impl Display for KernelRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Prefix:{}", self.destination)?;
        if let Some(gateway) = self.gateway {
            write!(f, " Nexthop:{gateway}")?;
        }
        write!(f, " Link:{}", self.ifname)
    }
}

/// One line of the kernel table, as far as we care
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub iface: String,
    pub destination: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub metric: u32,
}

impl From<&RouteEntry> for TableEntry {
    fn from(entry: &RouteEntry) -> Self {
        Self {
            iface: entry.iface.clone(),
            destination: entry.destination,
            gateway: entry.gateway,
            mask: entry.mask,
            metric: entry.metrics,
        }
    }
}

fn prefix_len(mask: Ipv4Addr) -> Option<u8> {
    let bits = u32::from(mask);
    let ones = bits.leading_ones();
    if ones + bits.trailing_zeros() < 32 {
        return None;
    }
    u8::try_from(ones).ok()
}

/// Resolve the interface of every table entry, given the index of every interface by name.
/// Entries that can't be resolved are left out and reported as errors.
#[must_use]
pub fn attribute_routes(
    ifindexes: &BTreeMap<String, u32>,
    entries: &[TableEntry],
) -> (Vec<KernelRoute>, Vec<KernelError>) {
    let mut routes = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();
    for entry in entries {
        let Some(ifindex) = ifindexes.get(&entry.iface) else {
            errors.push(KernelError::UnknownInterface {
                iface: entry.iface.clone(),
                destination: entry.destination,
            });
            continue;
        };
        let destination = prefix_len(entry.mask)
            .and_then(|len| Ipv4Net::new(entry.destination, len).ok());
        let Some(destination) = destination else {
            errors.push(KernelError::BadNetmask {
                iface: entry.iface.clone(),
                destination: entry.destination,
                mask: entry.mask,
            });
            continue;
        };
        routes.push(KernelRoute {
            destination: destination.trunc(),
            gateway: (!entry.gateway.is_unspecified()).then_some(entry.gateway),
            ifname: entry.iface.clone(),
            ifindex: *ifindex,
            metric: entry.metric,
        });
    }
    (routes, errors)
}

/// List the IPv4 routes of the kernel main table. Returns the routes that could be listed
/// together with all the errors met, if any.
#[must_use]
pub fn get_routes() -> (Vec<KernelRoute>, Option<KernelErrors>) {
    let ifindexes: BTreeMap<String, u32> = get_interfaces()
        .into_iter()
        .map(|interface| (interface.name, interface.index))
        .collect();
    debug!("Found {} network interfaces", ifindexes.len());

    let entries: Vec<TableEntry> = match route() {
        Ok(table) => table.iter().map(TableEntry::from).collect(),
        Err(e) => {
            warn!("Unable to read kernel routing table: {e}");
            return (vec![], KernelErrors::join(vec![KernelError::RouteTable(e)]));
        }
    };
    let (routes, errors) = attribute_routes(&ifindexes, &entries);
    for error in &errors {
        warn!("{error}");
    }
    debug!("Listed {} kernel routes", routes.len());
    (routes, KernelErrors::join(errors))
}

/// The destinations of `routes`
#[must_use]
pub fn main_table_prefixes(routes: &[KernelRoute]) -> BTreeSet<IpNet> {
    routes.iter().map(|r| IpNet::V4(r.destination)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    fn entry(iface: &str, destination: &str, gateway: &str, mask: &str) -> TableEntry {
        TableEntry {
            iface: iface.to_string(),
            destination: addr(destination),
            gateway: addr(gateway),
            mask: addr(mask),
            metric: 20,
        }
    }

    fn ifindexes() -> BTreeMap<String, u32> {
        BTreeMap::from([("eth0".to_string(), 2), ("vlan100".to_string(), 7)])
    }

    #[test]
    fn netmask_to_prefix_len() {
        assert_eq!(prefix_len(addr("255.255.255.0")), Some(24));
        assert_eq!(prefix_len(addr("0.0.0.0")), Some(0));
        assert_eq!(prefix_len(addr("255.255.255.255")), Some(32));
        assert_eq!(prefix_len(addr("255.0.255.0")), None);
    }

    #[test]
    fn routes_are_attributed() {
        let entries = [
            entry("eth0", "0.0.0.0", "10.0.0.254", "0.0.0.0"),
            entry("vlan100", "10.100.0.0", "0.0.0.0", "255.255.255.0"),
        ];
        let (routes, errors) = attribute_routes(&ifindexes(), &entries);
        assert!(errors.is_empty());
        assert_eq!(
            routes,
            vec![
                KernelRoute {
                    destination: "0.0.0.0/0".parse().unwrap(),
                    gateway: Some(addr("10.0.0.254")),
                    ifname: "eth0".to_string(),
                    ifindex: 2,
                    metric: 20,
                },
                KernelRoute {
                    destination: "10.100.0.0/24".parse().unwrap(),
                    gateway: None,
                    ifname: "vlan100".to_string(),
                    ifindex: 7,
                    metric: 20,
                },
            ]
        );
        assert_eq!(
            routes[0].to_string(),
            "Prefix:0.0.0.0/0 Nexthop:10.0.0.254 Link:eth0"
        );
        assert_eq!(routes[1].to_string(), "Prefix:10.100.0.0/24 Link:vlan100");
    }

    #[test]
    fn errors_are_accumulated_with_partial_routes() {
        let entries = [
            entry("gone0", "10.1.0.0", "0.0.0.0", "255.255.0.0"),
            entry("eth0", "10.2.0.0", "0.0.0.0", "255.0.255.0"),
            entry("eth0", "10.3.0.0", "0.0.0.0", "255.255.0.0"),
        ];
        let (routes, errors) = attribute_routes(&ifindexes(), &entries);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].destination.to_string(), "10.3.0.0/16");
        assert_eq!(errors.len(), 2);
        assert!(matches!(&errors[0], KernelError::UnknownInterface { iface, .. } if iface == "gone0"));
        assert!(matches!(&errors[1], KernelError::BadNetmask { .. }));

        let joined = KernelErrors::join(errors).unwrap();
        assert_eq!(joined.errors().len(), 2);
        assert_eq!(
            joined.to_string(),
            "Route to 10.1.0.0 uses unknown interface gone0\n\
             Route to 10.2.0.0 via eth0 has non-contiguous netmask 255.0.255.0"
        );
        assert!(KernelErrors::join(vec![]).is_none());
    }

    #[test]
    fn prefixes_of_main_table() {
        let (routes, _) = attribute_routes(
            &ifindexes(),
            &[
                entry("eth0", "10.2.0.0", "0.0.0.0", "255.255.0.0"),
                entry("vlan100", "10.2.0.0", "10.0.0.1", "255.255.0.0"),
            ],
        );
        assert_eq!(
            main_table_prefixes(&routes),
            BTreeSet::from(["10.2.0.0/16".parse::<IpNet>().unwrap()])
        );
    }
}
