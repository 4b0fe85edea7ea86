// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bus device discovery.
//!
//! The [`DiscoveryAccumulator`] is fed two kinds of input by the bus
//! reader: enumerated hardware units (devices that answered the bus scan
//! with their hardware type) and raw telegrams from sensors that only ever
//! transmit. It grows one configuration record per distinct device and is
//! drained once, at the end of a discovery run, by the renderer.
//!
//! Discovery is a best-effort aid for the operator: unknown hardware
//! types, non-sensor telegrams and unclassifiable addresses are silently
//! skipped or flagged in the output, never raised as errors.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::classify::classify;
use crate::profile::{find_profile, org_profile, Role};
use crate::telegram::Message;
use crate::types::Address;

/// Default closing time written into cover records, in seconds.
///
/// A placeholder the operator must tune to the physical shutter.
pub const DEFAULT_TIME_CLOSES: u16 = 24;

/// Default opening time written into cover records, in seconds.
pub const DEFAULT_TIME_OPENS: u16 = 25;

/// Device class placeholder for binary sensors whose kind cannot be told
/// from the telegram alone.
const UNKNOWN_BINARY_CLASS: &str = "window / door / smoke / motion / ?";

/// A hardware unit reported by bus enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareUnit {
    /// Hardware type name (e.g. `FSR14_x2`).
    pub hw_type: String,
    /// Base bus address of the unit.
    pub address: Address,
}

impl HardwareUnit {
    /// Creates a hardware unit descriptor.
    #[must_use]
    pub fn new(hw_type: impl Into<String>, address: Address) -> Self {
        Self {
            hw_type: hw_type.into(),
            address,
        }
    }
}

/// Sender sub-record of an actuator: the address and profile the
/// home-automation platform uses to command the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderRef {
    /// Derived sender address.
    pub id: Address,
    /// Equipment profile used for commands.
    pub eep: String,
}

/// One entry of the generated device configuration.
///
/// A hardware unit spanning several bus addresses expands into one record
/// per address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Bus address, the record's identity.
    pub id: Address,
    /// Equipment profile; may contain `??` wildcard segments the operator
    /// has to complete.
    pub eep: String,
    /// Display name.
    pub name: String,
    /// Sender sub-record, present for actuator roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<SenderRef>,
    /// Device class annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_class: Option<String>,
    /// Closing duration in seconds, for covers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_closes: Option<u16>,
    /// Opening duration in seconds, for covers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_opens: Option<u16>,
    /// Free-text provenance note. Rendered as a trailing comment line, not
    /// as a structured field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Stateful registry of discovered devices for one discovery run.
///
/// Records are grouped by [`Role`] in first-use order, which is also the
/// order the renderer writes them in. Sensor records are deduplicated by
/// source address for the lifetime of the accumulator.
///
/// # Examples
///
/// ```
/// use eltakor_lib::discovery::{DiscoveryAccumulator, HardwareUnit};
/// use eltakor_lib::types::Address;
///
/// let mut acc = DiscoveryAccumulator::new(Address::new(0x200));
/// acc.add_device(&HardwareUnit::new("FSR14_x2", Address::new(0x100)));
/// assert_eq!(acc.record_count(), 2);
/// ```
#[derive(Debug)]
pub struct DiscoveryAccumulator {
    records: IndexMap<Role, Vec<DeviceRecord>>,
    seen_sensors: HashSet<Address>,
    sender_base: Address,
}

impl DiscoveryAccumulator {
    /// Creates an empty accumulator.
    ///
    /// `sender_base` is the base address from which actuator sender
    /// addresses are derived (`sender_base + device address + offset`).
    #[must_use]
    pub fn new(sender_base: Address) -> Self {
        Self {
            records: IndexMap::new(),
            seen_sensors: HashSet::new(),
            sender_base,
        }
    }

    /// Returns the configured sender base address.
    #[must_use]
    pub const fn sender_base(&self) -> Address {
        self.sender_base
    }

    /// Records an enumerated hardware unit.
    ///
    /// Unknown hardware types are skipped silently. A unit whose profile
    /// spans several addresses expands into one record per address. This
    /// entry point never deduplicates: a device may legitimately be
    /// re-announced during a scan.
    pub fn add_device(&mut self, unit: &HardwareUnit) {
        let Some(profile) = find_profile(&unit.hw_type) else {
            tracing::debug!(hw_type = %unit.hw_type, "Ignoring unknown hardware type");
            return;
        };

        for offset in 0..profile.address_count {
            let id = unit.address.offset(offset);
            let sender = if profile.role.is_actuator() {
                Some(SenderRef {
                    id: self.sender_base.offset(id.raw()),
                    eep: profile.sender_eep.unwrap_or(profile.eep).to_string(),
                })
            } else {
                None
            };

            let (device_class, time_closes, time_opens) = if profile.role == Role::Cover {
                (
                    Some("shutter".to_string()),
                    Some(DEFAULT_TIME_CLOSES),
                    Some(DEFAULT_TIME_OPENS),
                )
            } else {
                (None, None, None)
            };

            let record = DeviceRecord {
                id,
                eep: profile.eep.to_string(),
                name: format!("{} - {}", unit.hw_type, id.raw()),
                sender,
                device_class,
                time_closes,
                time_opens,
                comment: None,
            };

            tracing::info!(
                role = profile.role.as_str(),
                id = %record.id,
                eep = %record.eep,
                name = %record.name,
                "Add device"
            );
            self.records.entry(profile.role).or_default().push(record);
        }
    }

    /// Records a sensor from a received bus message.
    ///
    /// Only telegrams carrying the outgoing marker are live sensor
    /// emissions; polling traffic and already-seen addresses are ignored.
    /// A broadcast discovery request is recognized purely to tell the
    /// operator that the scan phase is over and sensor recording has
    /// begun.
    pub fn add_sensor(&mut self, message: &Message) {
        match message {
            Message::Telegram(telegram) if telegram.outgoing => {
                if self.seen_sensors.contains(&telegram.address) {
                    tracing::trace!(address = %telegram.address, "Sensor already recorded");
                    return;
                }

                let info = org_profile(telegram.org);
                let guess = classify(telegram);
                let comment = format!(
                    "Sensor Type: {}, Derived from Msg Type: {}",
                    guess.label(),
                    telegram.org.telegram_type()
                );

                let record = DeviceRecord {
                    id: telegram.address,
                    eep: info.eep.to_string(),
                    name: format!("{} {}", info.name, telegram.address),
                    sender: None,
                    device_class: (info.role == Role::BinarySensor)
                        .then(|| UNKNOWN_BINARY_CLASS.to_string()),
                    time_closes: None,
                    time_opens: None,
                    comment: Some(comment),
                };

                tracing::info!(
                    role = info.role.as_str(),
                    id = %record.id,
                    msg_type = telegram.org.telegram_type(),
                    sensor_type = guess.label(),
                    "Add sensor"
                );
                self.records.entry(info.role).or_default().push(record);
                self.seen_sensors.insert(telegram.address);
            }
            Message::Telegram(telegram) => {
                tracing::debug!(address = %telegram.address, "Ignoring non-outgoing telegram");
            }
            Message::DiscoveryRequest { address } if *address == Address::BROADCAST => {
                tracing::info!(
                    "Waiting for incoming sensor signals. Press Ctrl+C once all \
                     sensors have been recorded to write the configuration file."
                );
            }
            Message::DiscoveryRequest { .. } | Message::Other { .. } => {
                tracing::trace!("Ignoring bus-internal message");
            }
        }
    }

    /// Returns the discovered records grouped by role, in insertion order.
    #[must_use]
    pub fn records(&self) -> &IndexMap<Role, Vec<DeviceRecord>> {
        &self.records
    }

    /// Returns the total number of records across all roles.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Returns whether nothing has been discovered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.values().all(Vec::is_empty)
    }
}
