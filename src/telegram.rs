// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ESP2 telegram model.
//!
//! Eltako series-14 devices speak the ESP2 serial protocol: fixed 14-byte
//! frames consisting of a two-byte sync sequence (`A5 5A`), an eleven-byte
//! body and a one-byte checksum. The body carries a header byte (transfer
//! direction and length), the organization code identifying the payload
//! encoding family, four data bytes, the four-octet device address and a
//! status byte.
//!
//! This module decodes frames into typed [`Message`]s. Sensor-bearing
//! organizations (RPS, 1BS, 4BS) become [`Telegram`]s; the bus-internal
//! discovery request is recognized separately because the discovery tool
//! reacts to it; everything else (mostly poll traffic) is passed through as
//! [`Message::Other`] and ignored downstream.

use crate::error::FrameError;
use crate::types::Address;

/// Fixed length of an ESP2 frame in bytes.
pub const FRAME_LEN: usize = 14;

/// ESP2 sync sequence preceding every frame body.
pub const SYNC: [u8; 2] = [0xA5, 0x5A];

/// Length nibble carried by the header byte of a well-formed frame.
const BODY_LEN: u8 = 11;

/// Header sequence nibble marking a transmitted (outgoing) frame.
const H_SEQ_TRANSMIT: u8 = 3;

/// Organization code of bus discovery requests.
const ORG_DISCOVERY: u8 = 0xF0;

/// Organization code of a telegram's payload encoding family.
///
/// The organization determines how the four data bytes are to be
/// interpreted, independent of the device's equipment profile (EEP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Org {
    /// Rocker/push-button switch telegrams (RORG F6).
    Rps,
    /// One-byte communication (RORG D5).
    OneBs,
    /// Four-byte communication (RORG A5).
    FourBs,
}

impl Org {
    /// Returns the organization matching a raw ESP2 code, if it is one of
    /// the sensor-bearing organizations.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x05 => Some(Self::Rps),
            0x06 => Some(Self::OneBs),
            0x07 => Some(Self::FourBs),
            _ => None,
        }
    }

    /// Returns the raw ESP2 organization code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Rps => 0x05,
            Self::OneBs => 0x06,
            Self::FourBs => 0x07,
        }
    }

    /// Returns the EnOcean RORG byte equivalent, as used in EEP codes.
    #[must_use]
    pub const fn rorg(&self) -> &'static str {
        match self {
            Self::Rps => "F6",
            Self::OneBs => "D5",
            Self::FourBs => "A5",
        }
    }

    /// Returns the telegram type name used in provenance comments.
    #[must_use]
    pub const fn telegram_type(&self) -> &'static str {
        match self {
            Self::Rps => "RPS",
            Self::OneBs => "1BS",
            Self::FourBs => "4BS",
        }
    }
}

/// A decoded sensor-bearing bus telegram.
///
/// # Examples
///
/// ```
/// use eltakor_lib::telegram::{Message, Org, Telegram};
/// use eltakor_lib::types::Address;
///
/// let telegram = Telegram {
///     org: Org::Rps,
///     address: Address::new(0xFEDB_0001),
///     data: [0x70, 0, 0, 0],
///     status: 0x30,
///     outgoing: true,
/// };
/// let frame = telegram.encode();
/// assert_eq!(Message::parse(&frame).unwrap(), Message::Telegram(telegram));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Telegram {
    /// Payload encoding family.
    pub org: Org,
    /// Originating device address.
    pub address: Address,
    /// The four data bytes (DATA3..DATA0 wire order).
    pub data: [u8; 4],
    /// Status byte (repeater count, button release flags).
    pub status: u8,
    /// Whether the frame was marked as a live transmission rather than
    /// bus-internal polling traffic.
    pub outgoing: bool,
}

impl Telegram {
    /// Encodes the telegram back into a 14-byte ESP2 frame.
    #[must_use]
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut frame = [0u8; FRAME_LEN];
        frame[0] = SYNC[0];
        frame[1] = SYNC[1];
        frame[2] = if self.outgoing {
            (H_SEQ_TRANSMIT << 5) | BODY_LEN
        } else {
            BODY_LEN
        };
        frame[3] = self.org.code();
        frame[4..8].copy_from_slice(&self.data);
        frame[8..12].copy_from_slice(&self.address.octets());
        frame[12] = self.status;
        frame[13] = checksum(&frame[2..13]);
        frame
    }
}

/// A message received from the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// A sensor-bearing telegram (RPS, 1BS or 4BS organization).
    Telegram(Telegram),
    /// A bus discovery request. Address 127 is the broadcast poll the
    /// master emits while scanning.
    DiscoveryRequest {
        /// The polled bus address.
        address: u8,
    },
    /// Any other organization (poll and status traffic).
    Other {
        /// The raw organization code.
        org: u8,
    },
}

impl Message {
    /// Decodes a 14-byte ESP2 frame.
    ///
    /// # Errors
    ///
    /// Returns a [`FrameError`] if the sync bytes, header length nibble or
    /// checksum do not check out.
    pub fn parse(frame: &[u8]) -> Result<Self, FrameError> {
        if frame.len() < FRAME_LEN {
            return Err(FrameError::Truncated(frame.len()));
        }
        if frame[0..2] != SYNC {
            return Err(FrameError::BadSync);
        }
        let header = frame[2];
        if header & 0x1F != BODY_LEN {
            return Err(FrameError::BadHeader(header));
        }
        let expected = checksum(&frame[2..13]);
        let actual = frame[13];
        if expected != actual {
            return Err(FrameError::ChecksumMismatch { expected, actual });
        }

        let org_code = frame[3];
        if let Some(org) = Org::from_code(org_code) {
            let mut data = [0u8; 4];
            data.copy_from_slice(&frame[4..8]);
            let mut octets = [0u8; 4];
            octets.copy_from_slice(&frame[8..12]);
            return Ok(Self::Telegram(Telegram {
                org,
                address: Address::from_octets(octets),
                data,
                status: frame[12],
                outgoing: header >> 5 == H_SEQ_TRANSMIT,
            }));
        }

        if org_code == ORG_DISCOVERY {
            // Discovery requests address a single bus participant; the
            // address rides in the last ID octet.
            return Ok(Self::DiscoveryRequest { address: frame[11] });
        }

        Ok(Self::Other { org: org_code })
    }
}

/// Computes the ESP2 body checksum: the byte sum modulo 256.
#[must_use]
pub fn checksum(body: &[u8]) -> u8 {
    body.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}
