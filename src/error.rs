// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `EltakoR` library.
//!
//! This module provides the error hierarchy for failures across the library:
//! bus address parsing, ESP2 frame decoding, and bus I/O.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while parsing a bus address string.
    #[error("address error: {0}")]
    Address(#[from] AddressParseError),

    /// Error occurred while decoding an ESP2 frame.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Error occurred on the bus transport.
    #[error("bus I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The serial port could not be opened.
    #[cfg(feature = "serial")]
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),
}

/// Errors related to parsing bus address strings.
///
/// These occur when converting the hyphenated 4-octet form
/// (`FF-AA-80-01`) back into a numeric address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    /// The string does not have four octets / eight hex digits.
    #[error("invalid address length: expected 4 octets, got {0:?}")]
    InvalidLength(String),

    /// An octet is not valid hexadecimal.
    #[error("invalid hex octet {octet:?} in address {input:?}")]
    InvalidOctet {
        /// The octet that failed to parse.
        octet: String,
        /// The full input string.
        input: String,
    },
}

/// Errors related to decoding ESP2 frames from the bus.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The frame does not start with the `A5 5A` sync sequence.
    #[error("missing A5 5A sync bytes")]
    BadSync,

    /// The frame is shorter than the fixed 14-byte ESP2 length.
    #[error("truncated frame: expected 14 bytes, got {0}")]
    Truncated(usize),

    /// The length nibble of the header byte is not 11.
    #[error("unexpected header byte {0:#04x}")]
    BadHeader(u8),

    /// The trailing checksum does not match the body sum.
    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch {
        /// Checksum computed over the frame body.
        expected: u8,
        /// Checksum byte carried by the frame.
        actual: u8,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_error_display() {
        let err = FrameError::ChecksumMismatch {
            expected: 0x42,
            actual: 0x43,
        };
        assert_eq!(err.to_string(), "checksum mismatch: expected 0x42, got 0x43");
    }

    #[test]
    fn error_from_frame_error() {
        let err: Error = FrameError::BadSync.into();
        assert!(matches!(err, Error::Frame(FrameError::BadSync)));
    }

    #[test]
    fn address_error_display() {
        let err = AddressParseError::InvalidLength("00-00".to_string());
        assert_eq!(
            err.to_string(),
            "invalid address length: expected 4 octets, got \"00-00\""
        );
    }
}
