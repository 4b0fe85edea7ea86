// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bus address type.
//!
//! Eltako devices are identified by a 32-bit address that is unique on the
//! bus. In configuration files the address is written as four hyphenated,
//! uppercase hex octets (`00-00-10-01`), which is also how this type
//! displays and serializes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AddressParseError;

/// A 32-bit device address on the Eltako bus.
///
/// # Examples
///
/// ```
/// use eltakor_lib::types::Address;
///
/// let addr = Address::new(0x0000_1001);
/// assert_eq!(addr.to_string(), "00-00-10-01");
///
/// let parsed: Address = "FF-AA-80-01".parse().unwrap();
/// assert_eq!(parsed.raw(), 0xFFAA_8001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u32);

impl Address {
    /// The broadcast address used by bus discovery requests.
    pub const BROADCAST: u8 = 127;

    /// Creates an address from its raw 32-bit value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw 32-bit value.
    #[must_use]
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Returns the address shifted by `offset`.
    ///
    /// Used when a hardware unit occupies several consecutive bus
    /// addresses (see [`HardwareProfile::address_count`]).
    ///
    /// [`HardwareProfile::address_count`]: crate::profile::HardwareProfile
    #[must_use]
    pub const fn offset(&self, offset: u32) -> Self {
        Self(self.0.wrapping_add(offset))
    }

    /// Returns the four big-endian octets of the address.
    #[must_use]
    pub const fn octets(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Builds an address from four big-endian octets.
    #[must_use]
    pub const fn from_octets(octets: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(octets))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets();
        write!(f, "{a:02X}-{b:02X}-{c:02X}-{d:02X}")
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    /// Parses the hyphenated form (`00-00-10-01`) or a plain 8-digit hex
    /// string (`00001001`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| *c != '-').collect();
        if compact.len() != 8 || !compact.is_ascii() {
            return Err(AddressParseError::InvalidLength(s.to_string()));
        }
        let mut octets = [0u8; 4];
        for (i, octet) in octets.iter_mut().enumerate() {
            let part = &compact[i * 2..i * 2 + 2];
            *octet = u8::from_str_radix(part, 16).map_err(|_| {
                AddressParseError::InvalidOctet {
                    octet: part.to_string(),
                    input: s.to_string(),
                }
            })?;
        }
        Ok(Self::from_octets(octets))
    }
}

impl From<u32> for Address {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<Address> for u32 {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
