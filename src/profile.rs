// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hardware profile table.
//!
//! Static knowledge about the Eltako series-14 hardware families: which
//! equipment profile (EEP) a device of a given hardware type speaks, which
//! platform role it maps to, and how many consecutive bus addresses one
//! physical unit occupies (an FSR14-4x relay, for instance, answers on four
//! addresses, one per channel).
//!
//! The table may list a hardware type more than once (the FSR14 relays can
//! act as `light` or `switch`); [`find_profile`] returns the first match
//! and later rows serve as documentation of the alternate role.

use serde::{Deserialize, Serialize};

use crate::telegram::Org;

/// Platform role a discovered device is grouped under.
///
/// Roles are the top-level section keys of the generated configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A sensor with a binary state (window contact, rocker button, ...).
    BinarySensor,
    /// A sensor reporting measured values.
    Sensor,
    /// A dimmable or switchable light actuator.
    Light,
    /// A relay actuator.
    Switch,
    /// A shutter/blind actuator.
    Cover,
}

impl Role {
    /// Returns the configuration section key for this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BinarySensor => "binary_sensor",
            Self::Sensor => "sensor",
            Self::Light => "light",
            Self::Switch => "switch",
            Self::Cover => "cover",
        }
    }

    /// Returns whether devices of this role send commands to the bus and
    /// therefore need a dedicated sender address in the configuration.
    #[must_use]
    pub const fn is_actuator(&self) -> bool {
        matches!(self, Self::Light | Self::Switch | Self::Cover)
    }
}

/// Static description of one hardware family entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareProfile {
    /// Hardware type name as reported during bus enumeration.
    pub hw_type: &'static str,
    /// Equipment profile the device reports with.
    pub eep: &'static str,
    /// Equipment profile used when commanding the device, for actuators.
    pub sender_eep: Option<&'static str>,
    /// Platform role the device is grouped under.
    pub role: Role,
    /// Human-readable description.
    pub description: &'static str,
    /// Number of consecutive bus addresses one physical unit occupies.
    pub address_count: u32,
}

/// Known hardware profiles, in lookup precedence order.
pub const PROFILES: &[HardwareProfile] = &[
    HardwareProfile {
        hw_type: "FTS14EM",
        eep: "F6-02-01",
        sender_eep: None,
        role: Role::BinarySensor,
        description: "Rocker switch",
        address_count: 1,
    },
    HardwareProfile {
        hw_type: "FTS14EM",
        eep: "F6-02-02",
        sender_eep: None,
        role: Role::BinarySensor,
        description: "Rocker switch",
        address_count: 1,
    },
    HardwareProfile {
        hw_type: "FTS14EM",
        eep: "F6-10-00",
        sender_eep: None,
        role: Role::BinarySensor,
        description: "Window handle",
        address_count: 1,
    },
    HardwareProfile {
        hw_type: "FTS14EM",
        eep: "D5-00-01",
        sender_eep: None,
        role: Role::BinarySensor,
        description: "Contact sensor",
        address_count: 1,
    },
    HardwareProfile {
        hw_type: "FTS14EM",
        eep: "A5-08-01",
        sender_eep: None,
        role: Role::BinarySensor,
        description: "Occupancy sensor",
        address_count: 1,
    },
    HardwareProfile {
        hw_type: "FWG14",
        eep: "A5-13-01",
        sender_eep: None,
        role: Role::Sensor,
        description: "Weather station",
        address_count: 1,
    },
    HardwareProfile {
        hw_type: "FTS14EM",
        eep: "A5-12-01",
        sender_eep: None,
        role: Role::Sensor,
        description: "Window handle",
        address_count: 1,
    },
    HardwareProfile {
        hw_type: "FSDG14",
        eep: "A5-12-02",
        sender_eep: None,
        role: Role::Sensor,
        description: "Automated meter reading - electricity",
        address_count: 1,
    },
    HardwareProfile {
        hw_type: "F3Z14D",
        eep: "A5-13-01",
        sender_eep: None,
        role: Role::Sensor,
        description: "Automated meter reading - gas",
        address_count: 1,
    },
    HardwareProfile {
        hw_type: "F3Z14D",
        eep: "A5-12-03",
        sender_eep: None,
        role: Role::Sensor,
        description: "Automated meter reading - water",
        address_count: 1,
    },
    HardwareProfile {
        hw_type: "FUD14",
        eep: "A5-38-08",
        sender_eep: Some("A5-38-08"),
        role: Role::Light,
        description: "Central command - gateway",
        address_count: 1,
    },
    HardwareProfile {
        hw_type: "FSR14_1x",
        eep: "M5-38-08",
        sender_eep: Some("A5-38-08"),
        role: Role::Light,
        description: "Eltako relay",
        address_count: 1,
    },
    HardwareProfile {
        hw_type: "FSR14_x2",
        eep: "M5-38-08",
        sender_eep: Some("A5-38-08"),
        role: Role::Light,
        description: "Eltako relay",
        address_count: 2,
    },
    HardwareProfile {
        hw_type: "FSR14_4x",
        eep: "M5-38-08",
        sender_eep: Some("A5-38-08"),
        role: Role::Light,
        description: "Eltako relay",
        address_count: 4,
    },
    HardwareProfile {
        hw_type: "FSR14_1x",
        eep: "M5-38-08",
        sender_eep: Some("A5-38-08"),
        role: Role::Switch,
        description: "Eltako relay",
        address_count: 1,
    },
    HardwareProfile {
        hw_type: "FSR14_x2",
        eep: "M5-38-08",
        sender_eep: Some("A5-38-08"),
        role: Role::Switch,
        description: "Eltako relay",
        address_count: 2,
    },
    HardwareProfile {
        hw_type: "FSR14_4x",
        eep: "M5-38-08",
        sender_eep: Some("A5-38-08"),
        role: Role::Switch,
        description: "Eltako relay",
        address_count: 4,
    },
    HardwareProfile {
        hw_type: "FSB14",
        eep: "G5-3F-7F",
        sender_eep: Some("H5-3F-7F"),
        role: Role::Cover,
        description: "Eltako cover",
        address_count: 1,
    },
];

/// Looks up the profile for a hardware type name.
///
/// The first matching row wins; unknown names return `None`.
///
/// # Examples
///
/// ```
/// use eltakor_lib::profile::{find_profile, Role};
///
/// let profile = find_profile("FSR14_x2").unwrap();
/// assert_eq!(profile.role, Role::Light);
/// assert_eq!(profile.address_count, 2);
///
/// assert!(find_profile("FXX99").is_none());
/// ```
#[must_use]
pub fn find_profile(hw_type: &str) -> Option<&'static HardwareProfile> {
    PROFILES.iter().find(|p| p.hw_type == hw_type)
}

/// Per-organization display name and profile template for telegrams that
/// did not come from an enumerated device.
///
/// The EEP templates carry `??` wildcard segments where the telegram alone
/// cannot pin down the profile; the renderer flags those for the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgProfile {
    /// Display name of the encoding family.
    pub name: &'static str,
    /// Role the sensor record is grouped under.
    pub role: Role,
    /// Profile code, possibly with wildcard segments.
    pub eep: &'static str,
}

/// Returns the sensor profile template for an organization.
#[must_use]
pub const fn org_profile(org: Org) -> OrgProfile {
    match org {
        Org::Rps => OrgProfile {
            name: "Switch",
            role: Role::BinarySensor,
            eep: "F6-02-01",
        },
        Org::OneBs => OrgProfile {
            name: "1 Byte Communication",
            role: Role::Sensor,
            eep: "D5-??-??",
        },
        Org::FourBs => OrgProfile {
            name: "4 Byte Communication",
            role: Role::Sensor,
            eep: "A5-??-??",
        },
    }
}
