// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `EltakoR` Lib - A Rust library to discover Eltako EnOcean bus devices.
//!
//! This library decodes ESP2 telegrams from an Eltako series-14 bus,
//! classifies the devices and sensors behind them, and generates the YAML
//! configuration a home-automation integration consumes. It powers the
//! standalone `eltako-discovery` tool shipped with this crate.
//!
//! # How Discovery Works
//!
//! - Devices that answer the bus scan are matched against a static table
//!   of known hardware profiles and expanded into one configuration record
//!   per occupied bus address.
//! - Sensors that only ever transmit are recorded from their live
//!   telegrams, deduplicated by address; a heuristic classifier guesses
//!   their subtype from address ranges and payload shape and leaves the
//!   guess as a comment in the generated file.
//! - Anything the discovery cannot fully resolve is emitted with wildcard
//!   segments and flagged for the operator to complete by hand.
//!
//! # Quick Start
//!
//! ## Accumulating Records
//!
//! ```
//! use eltakor_lib::{Address, DiscoveryAccumulator, HardwareUnit, render};
//!
//! let mut acc = DiscoveryAccumulator::new(Address::new(0x200));
//!
//! // A relay reported by bus enumeration: two channels, two records.
//! acc.add_device(&HardwareUnit::new("FSR14_x2", Address::new(0x100)));
//! assert_eq!(acc.record_count(), 2);
//!
//! let document = render(&acc);
//! assert!(document.contains("eep: M5-38-08"));
//! ```
//!
//! ## Listening on the Bus
//!
//! ```no_run
//! use eltakor_lib::bus::{open_serial, DEFAULT_BAUD};
//! use eltakor_lib::{Address, DiscoveryAccumulator, write_config};
//!
//! #[tokio::main]
//! async fn main() -> eltakor_lib::Result<()> {
//!     let mut reader = open_serial("/dev/ttyUSB0", DEFAULT_BAUD)?;
//!     let mut acc = DiscoveryAccumulator::new(Address::new(0x0000_B000));
//!
//!     while let Some(message) = reader.next_message().await? {
//!         acc.add_sensor(&message);
//!     }
//!
//!     write_config(&acc, "discovered_eltako.yml")?;
//!     Ok(())
//! }
//! ```

#[cfg(feature = "serial")]
pub mod bus;
pub mod classify;
pub mod discovery;
pub mod error;
pub mod profile;
pub mod render;
pub mod telegram;
pub mod types;

pub use classify::{classify, Classification};
pub use discovery::{DeviceRecord, DiscoveryAccumulator, HardwareUnit, SenderRef};
pub use error::{AddressParseError, Error, FrameError, Result};
pub use profile::{find_profile, org_profile, HardwareProfile, OrgProfile, Role};
pub use render::{render, write_config};
pub use telegram::{Message, Org, Telegram};
pub use types::Address;
