// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Router MAC addresses as reported in EVPN next-hop tables.

use arrayvec::ArrayVec;
use std::fmt::Display;
use thiserror::Error;

/// The MAC address of a remote VTEP, used as inner destination MAC when encapsulating
/// towards it.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouterMac(pub [u8; 6]);

/// Reasons why a string reported as router MAC is not usable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacError {
    #[error("invalid string representation of mac address: '{0}'")]
    Malformed(String),
    #[error("zero mac address")]
    Zero,
}

impl From<[u8; 6]> for RouterMac {
    fn from(value: [u8; 6]) -> Self {
        RouterMac(value)
    }
}

impl TryFrom<&str> for RouterMac {
    type Error = MacError;

    /// Parse six colon-separated, two-digit hexadecimal octets.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        const MAX_OCTETS: usize = 6;
        let malformed = || MacError::Malformed(value.to_string());
        let octets = value
            .split(':')
            .try_fold(ArrayVec::<u8, MAX_OCTETS>::new(), |mut acc, octet| {
                if octet.len() != 2 || !octet.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(malformed());
                }
                let parsed = u8::from_str_radix(octet, 16).map_err(|_| malformed())?;
                acc.try_push(parsed).map_err(|_| malformed())?;
                Ok(acc)
            })?;
        let octets = octets.into_inner().map_err(|_| malformed())?;
        Ok(RouterMac(octets))
    }
}

impl RouterMac {
    pub const ZERO: RouterMac = RouterMac([0; 6]);

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self == &RouterMac::ZERO
    }

    /// Parse a router MAC and check that it can be used for encapsulation.
    ///
    /// # Errors
    ///
    /// Fails if the string is not a MAC address or if it is the zero MAC, which the daemon
    /// reports for next-hops it has not resolved.
    pub fn parse_valid(value: &str) -> Result<RouterMac, MacError> {
        let mac = RouterMac::try_from(value)?;
        if mac.is_zero() {
            return Err(MacError::Zero);
        }
        Ok(mac)
    }
}

impl Display for RouterMac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}
